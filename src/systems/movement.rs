#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::geometry::{heading_vector, normalize_heading, Rect};
use crate::particle::Particle;
use crate::species::TypeTable;

/// Advance every particle one step along its current heading, then turn
/// by the pending delta and wrap back into the domain.
pub fn integrate(particles: &mut [Particle], types: &TypeTable, bounds: &Rect) {
    #[cfg(feature = "parallel")]
    {
        particles
            .par_iter_mut()
            .for_each(|p| advance(p, types, bounds));
    }
    #[cfg(not(feature = "parallel"))]
    {
        for p in particles.iter_mut() {
            advance(p, types, bounds);
        }
    }
}

#[inline]
fn advance(p: &mut Particle, types: &TypeTable, bounds: &Rect) {
    let info = types.resolve(p.species);

    // Move along the heading sensed this step, then turn.
    p.position += heading_vector(p.heading) * info.travel_distance;
    p.heading = normalize_heading(p.heading + p.pending_heading_delta);
    p.pending_heading_delta = 0.0;

    p.position = bounds.wrap(p.position);
}

#[cfg(test)]
mod tests {
    use std::f64::consts::{FRAC_PI_2, PI, TAU};

    use glam::DVec2;

    use super::*;
    use crate::species::TypeInfo;

    fn types() -> TypeTable {
        TypeTable::new(vec![TypeInfo {
            travel_distance: 2.0,
            ..TypeInfo::primordial()
        }])
        .unwrap()
    }

    fn bounds() -> Rect {
        Rect::from_size(100.0, 100.0)
    }

    #[test]
    fn moves_along_heading_before_turning() {
        let mut particles = [Particle::new(DVec2::new(10.0, 10.0), FRAC_PI_2, 0)];
        particles[0].pending_heading_delta = PI;
        integrate(&mut particles, &types(), &bounds());

        let p = particles[0];
        assert!((p.position - DVec2::new(10.0, 12.0)).length() < 1e-12);
        assert!((p.heading - 3.0 * FRAC_PI_2).abs() < 1e-12);
        assert_eq!(p.pending_heading_delta, 0.0);
    }

    #[test]
    fn heading_stays_normalized_for_huge_deltas() {
        for delta in [1000.0, -1000.0, 1e6, -1e6, -TAU, TAU] {
            let mut particles = [Particle::new(DVec2::new(50.0, 50.0), 0.3, 0)];
            particles[0].pending_heading_delta = delta;
            integrate(&mut particles, &types(), &bounds());
            let h = particles[0].heading;
            assert!((0.0..TAU).contains(&h), "delta {delta} gave heading {h}");
        }
    }

    #[test]
    fn wraps_through_each_edge() {
        let mut particles = [
            Particle::new(DVec2::new(99.5, 50.0), 0.0, 0),
            Particle::new(DVec2::new(0.5, 50.0), PI, 0),
            Particle::new(DVec2::new(50.0, 99.5), FRAC_PI_2, 0),
            Particle::new(DVec2::new(50.0, 0.5), 3.0 * FRAC_PI_2, 0),
        ];
        integrate(&mut particles, &types(), &bounds());
        let b = bounds();
        for p in &particles {
            assert!(b.contains(p.position), "{:?}", p.position);
        }
        assert!((particles[0].position.x - 1.5).abs() < 1e-9);
        assert!((particles[1].position.x - 98.5).abs() < 1e-9);
        assert!((particles[2].position.y - 1.5).abs() < 1e-9);
        assert!((particles[3].position.y - 98.5).abs() < 1e-9);
    }
}
