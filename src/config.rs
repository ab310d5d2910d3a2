use glam::UVec2;

use crate::error::{ConfigError, ConfigResult};
use crate::geometry::Rect;
use crate::spatial::Grid;
use crate::species::TypeTable;

/// Setup-time simulation parameters. Supplied once before the first step.
#[derive(Debug, Clone)]
pub struct SimConfig {
    pub bounds: Rect,
    /// Sensing radius for neighbor counting and left/right tallies.
    pub radius: f64,
    /// Secondary radius for the close-neighbor tally.
    pub close_radius: f64,
    pub population: usize,
    pub types: TypeTable,
    pub seed: u64,
    /// Explicit grid size; derived from bounds and radius when `None`.
    pub grid_dims: Option<UVec2>,
}

impl Default for SimConfig {
    /// Classic single-species primordial swarm.
    fn default() -> Self {
        Self {
            bounds: Rect::from_size(100.0, 100.0),
            radius: 5.0,
            close_radius: 1.3,
            population: 800,
            types: TypeTable::primordial(),
            seed: 0,
            grid_dims: None,
        }
    }
}

impl SimConfig {
    /// Multi-species setup with a species table drawn from `seed`.
    pub fn random_species(count: usize, seed: u64) -> ConfigResult<Self> {
        let mut rng = fastrand::Rng::with_seed(seed);
        Ok(Self {
            bounds: Rect::from_size(400.0, 400.0),
            radius: 8.0,
            close_radius: 2.0,
            population: 6000,
            types: TypeTable::random(count, &mut rng)?,
            seed,
            grid_dims: None,
        })
    }

    pub fn grid_dims(&self) -> UVec2 {
        self.grid_dims
            .unwrap_or_else(|| Grid::dims_for(&self.bounds, self.radius))
    }

    /// Return the first violated constraint.
    pub fn validate(&self) -> ConfigResult<()> {
        let Rect { min, max } = self.bounds;
        for (axis, lo, hi) in [('x', min.x, max.x), ('y', min.y, max.y)] {
            if !lo.is_finite() || !hi.is_finite() {
                return Err(ConfigError::NonFiniteBounds { axis });
            }
            if hi <= lo {
                return Err(ConfigError::InvertedBounds {
                    axis,
                    min: lo,
                    max: hi,
                });
            }
        }

        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(ConfigError::NonPositiveRadius(self.radius));
        }
        if !(self.close_radius >= 0.0 && self.close_radius <= self.radius) {
            return Err(ConfigError::CloseRadiusOutOfRange {
                close: self.close_radius,
                radius: self.radius,
            });
        }

        let dims = self.grid_dims();
        let size = self.bounds.size();
        for (axis, cells, extent) in [('x', dims.x, size.x), ('y', dims.y, size.y)] {
            if cells > 0 && self.radius > extent / cells as f64 {
                return Err(ConfigError::RadiusExceedsCell {
                    axis,
                    radius: self.radius,
                    cell: extent / cells as f64,
                });
            }
            if cells < 3 {
                return Err(ConfigError::GridTooSmall { axis, cells });
            }
        }
        // Cells are addressed with i32 coordinates.
        let max_cells = i32::MAX as usize;
        let fits = (dims.x as usize)
            .checked_mul(dims.y as usize)
            .is_some_and(|count| count <= max_cells);
        if dims.x as usize > max_cells || dims.y as usize > max_cells || !fits {
            return Err(ConfigError::GridTooLarge {
                x: dims.x,
                y: dims.y,
            });
        }

        self.types.validate()?;

        // Integration wraps once per step, so no species may cross the
        // whole domain in one step.
        let max_travel = self.types.max_travel();
        let min_extent = size.min_element();
        if max_travel >= min_extent {
            let species = self
                .types
                .iter()
                .position(|t| t.travel_distance.abs() == max_travel)
                .unwrap_or(0);
            return Err(ConfigError::InvalidTypeConstant {
                species,
                field: "travel distance",
                value: max_travel,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::species::TypeInfo;
    use glam::DVec2;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(SimConfig::default().validate(), Ok(()));
        assert_eq!(SimConfig::default().grid_dims(), UVec2::new(20, 20));
        assert_eq!(SimConfig::random_species(6, 1).unwrap().validate(), Ok(()));
    }

    #[test]
    fn reports_inverted_bounds_axis() {
        let cfg = SimConfig {
            bounds: Rect::new(DVec2::new(0.0, 10.0), DVec2::new(50.0, 10.0)),
            ..SimConfig::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::InvertedBounds {
                axis: 'y',
                min: 10.0,
                max: 10.0
            })
        );
    }

    #[test]
    fn reports_radius_larger_than_cell() {
        let cfg = SimConfig {
            radius: 10.0,
            grid_dims: Some(UVec2::new(20, 5)),
            ..SimConfig::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::RadiusExceedsCell {
                axis: 'x',
                radius: 10.0,
                cell: 5.0
            })
        );
    }

    #[test]
    fn reports_bad_radii() {
        let cfg = SimConfig {
            radius: 0.0,
            ..SimConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::NonPositiveRadius(0.0)));

        let cfg = SimConfig {
            close_radius: 6.0,
            ..SimConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::CloseRadiusOutOfRange { .. })
        ));
    }

    #[test]
    fn coarse_grid_is_rejected() {
        let cfg = SimConfig {
            radius: 40.0,
            close_radius: 1.0,
            ..SimConfig::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::GridTooSmall { axis: 'x', cells: 2 })
        );
    }

    #[test]
    fn huge_grid_is_rejected() {
        let cfg = SimConfig {
            bounds: Rect::from_size(100_000.0, 100_000.0),
            radius: 1.0,
            close_radius: 0.5,
            ..SimConfig::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::GridTooLarge {
                x: 100_000,
                y: 100_000
            })
        );
        assert!(matches!(
            crate::Simulation::new(cfg),
            Err(ConfigError::GridTooLarge { .. })
        ));

        // Long and thin is fine while the total still fits.
        let cfg = SimConfig {
            bounds: Rect::from_size(100_000.0, 30.0),
            radius: 10.0,
            close_radius: 1.0,
            ..SimConfig::default()
        };
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn reports_travel_longer_than_domain() {
        let cfg = SimConfig {
            types: TypeTable::new(vec![TypeInfo {
                travel_distance: 150.0,
                ..TypeInfo::primordial()
            }])
            .unwrap(),
            ..SimConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidTypeConstant {
                field: "travel distance",
                ..
            })
        ));
    }
}
