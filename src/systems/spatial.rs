use crate::error::{StepError, StepResult};
use crate::particle::Particle;
use crate::spatial::Grid;

/// Rebuild the grid from current positions. Sequential: appends from
/// different particles may target the same cell.
///
/// A non-finite position or one outside the domain means an earlier phase
/// produced garbage. It is reported, never clamped into a cell.
pub fn rebuild(particles: &[Particle], grid: &mut Grid) -> StepResult<()> {
    grid.clear();
    for (index, p) in particles.iter().enumerate() {
        if !p.position.is_finite() {
            return Err(StepError::NonFinitePosition { index });
        }
        if !grid.bounds().contains(p.position) {
            return Err(StepError::OutsideDomain {
                index,
                x: p.position.x,
                y: p.position.y,
            });
        }
        let cell = grid.cell_index_for(p.position);
        grid.insert(cell, index as u32);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use glam::{DVec2, IVec2, UVec2};

    use super::*;
    use crate::geometry::Rect;

    fn grid() -> Grid {
        Grid::new(Rect::from_size(100.0, 100.0), UVec2::new(10, 10))
    }

    #[test]
    fn files_every_particle_once() {
        let mut g = grid();
        let particles = [
            Particle::new(DVec2::new(5.0, 5.0), 0.0, 0),
            Particle::new(DVec2::new(7.0, 2.0), 0.0, 0),
            Particle::new(DVec2::new(99.0, 51.0), 0.0, 0),
        ];
        rebuild(&particles, &mut g).unwrap();
        assert_eq!(g.cell(IVec2::new(0, 0)), &[0, 1]);
        assert_eq!(g.cell(IVec2::new(9, 5)), &[2]);

        // Second rebuild replaces, never accumulates.
        rebuild(&particles[..1], &mut g).unwrap();
        assert_eq!(g.cell(IVec2::new(0, 0)), &[0]);
        assert!(g.cell(IVec2::new(9, 5)).is_empty());
    }

    #[test]
    fn rejects_nan_position() {
        let mut g = grid();
        let particles = [
            Particle::new(DVec2::new(5.0, 5.0), 0.0, 0),
            Particle::new(DVec2::new(f64::NAN, 5.0), 0.0, 0),
        ];
        assert_eq!(
            rebuild(&particles, &mut g),
            Err(StepError::NonFinitePosition { index: 1 })
        );
    }

    #[test]
    fn rejects_position_far_outside_domain() {
        let mut g = grid();
        let particles = [Particle::new(DVec2::new(50.0, -300.0), 0.0, 0)];
        assert!(matches!(
            rebuild(&particles, &mut g),
            Err(StepError::OutsideDomain { index: 0, .. })
        ));
    }

    #[test]
    fn rejects_position_past_far_edge() {
        // The cell clamp alone would file these in the last column or row.
        let mut g = grid();
        let particles = [
            Particle::new(DVec2::new(51.0, 50.0), 0.0, 0),
            Particle::new(DVec2::new(250.0, 50.0), 0.0, 0),
        ];
        assert_eq!(
            rebuild(&particles, &mut g),
            Err(StepError::OutsideDomain {
                index: 1,
                x: 250.0,
                y: 50.0
            })
        );

        let on_edge = [Particle::new(DVec2::new(20.0, 100.0), 0.0, 0)];
        assert!(matches!(
            rebuild(&on_edge, &mut g),
            Err(StepError::OutsideDomain { index: 0, .. })
        ));
    }
}
