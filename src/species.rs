use std::f64::consts::PI;

use crate::error::{ConfigError, ConfigResult};

/// Per-species behavioral constants. Immutable after setup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypeInfo {
    /// Radians/step, always applied.
    pub fixed_rotation: f64,
    /// Radians/step per unit of neighbor mass, signed by left/right imbalance.
    pub rotation_gain: f64,
    /// World units travelled per step.
    pub travel_distance: f64,
    /// Weight this species contributes when counted as someone's neighbor.
    pub mass: f64,
    /// Relative spawn frequency.
    pub ratio: f64,
}

impl TypeInfo {
    /// Constants from the published primordial particle system:
    /// α = 180°, β = 17°, v = 0.67.
    pub fn primordial() -> Self {
        Self {
            fixed_rotation: PI,
            rotation_gain: 17f64.to_radians(),
            travel_distance: 0.67,
            mass: 1.0,
            ratio: 1.0,
        }
    }
}

/// Species ids are `u16`, so a table holds at most this many species.
pub const MAX_SPECIES: usize = u16::MAX as usize + 1;

/// Fixed-size species lookup table, indexed by species id.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeTable {
    types: Vec<TypeInfo>,
    ratio_sum: f64,
}

impl TypeTable {
    pub fn new(types: Vec<TypeInfo>) -> ConfigResult<Self> {
        let table = Self {
            ratio_sum: types.iter().map(|t| t.ratio).sum(),
            types,
        };
        table.validate()?;
        Ok(table)
    }

    /// Single-species classic table.
    pub fn primordial() -> Self {
        Self {
            types: vec![TypeInfo::primordial()],
            ratio_sum: 1.0,
        }
    }

    /// Random table of `count` species drawn around the classic constants.
    pub fn random(count: usize, rng: &mut fastrand::Rng) -> ConfigResult<Self> {
        let types = (0..count)
            .map(|_| TypeInfo {
                fixed_rotation: PI * (0.5 + rng.f64()),
                rotation_gain: (5.0 + rng.f64() * 25.0).to_radians(),
                travel_distance: 0.3 + rng.f64() * 0.7,
                mass: 0.5 + rng.f64() * 1.5,
                ratio: 0.2 + rng.f64(),
            })
            .collect();
        Self::new(types)
    }

    /// Check every per-species constraint. Called by `new` and again by
    /// configuration validation.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.types.is_empty() {
            return Err(ConfigError::EmptyTypeTable);
        }
        if self.types.len() > MAX_SPECIES {
            return Err(ConfigError::TooManySpecies {
                count: self.types.len(),
                max: MAX_SPECIES,
            });
        }
        for (species, t) in self.types.iter().enumerate() {
            if t.ratio < 0.0 {
                return Err(ConfigError::NegativeRatio {
                    species,
                    ratio: t.ratio,
                });
            }
            let fields = [
                ("spawn ratio", t.ratio),
                ("fixed rotation", t.fixed_rotation),
                ("rotation gain", t.rotation_gain),
                ("travel distance", t.travel_distance),
                ("mass", t.mass),
            ];
            for (field, value) in fields {
                if !value.is_finite() {
                    return Err(ConfigError::InvalidTypeConstant {
                        species,
                        field,
                        value,
                    });
                }
            }
        }
        if self.ratio_sum <= 0.0 {
            return Err(ConfigError::ZeroRatioSum);
        }
        Ok(())
    }

    #[inline]
    pub fn resolve(&self, species: u16) -> &TypeInfo {
        &self.types[species as usize]
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TypeInfo> {
        self.types.iter()
    }

    /// Largest per-step travel distance of any species.
    pub fn max_travel(&self) -> f64 {
        self.types
            .iter()
            .map(|t| t.travel_distance.abs())
            .fold(0.0, f64::max)
    }

    /// Ratio-weighted species draw. Walks species in id order subtracting
    /// each span; the first species whose span covers the draw wins.
    pub fn sample(&self, rng: &mut fastrand::Rng) -> u16 {
        self.pick(rng.f64() * self.ratio_sum)
    }

    fn pick(&self, mut t: f64) -> u16 {
        let mut last = 0;
        for (species, info) in self.types.iter().enumerate() {
            if info.ratio <= 0.0 {
                continue;
            }
            if t <= info.ratio {
                return species as u16;
            }
            t -= info.ratio;
            last = species;
        }
        // Rounding residue past the final span.
        last as u16
    }
}

impl Default for TypeTable {
    fn default() -> Self {
        Self::primordial()
    }
}
