use std::f64::consts::TAU;

use crate::geometry::Rect;
use crate::particle::Particle;
use crate::species::TypeTable;

/// Spawn `count` particles with uniform positions and headings and
/// ratio-weighted species. Draw order per particle is x, y, heading,
/// species, so a given seed always yields the same population.
pub fn seed_population(
    count: usize,
    bounds: &Rect,
    types: &TypeTable,
    rng: &mut fastrand::Rng,
) -> Vec<Particle> {
    let mut particles = Vec::with_capacity(count);
    for _ in 0..count {
        let position = bounds.random_point(rng);
        let heading = rng.f64() * TAU;
        let species = types.sample(rng);
        particles.push(Particle::new(position, heading, species));
    }
    log::debug!("Seeded {} particles across {} species", count, types.len());
    particles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::species::TypeInfo;

    fn table(ratios: &[f64]) -> TypeTable {
        TypeTable::new(
            ratios
                .iter()
                .map(|&ratio| TypeInfo {
                    ratio,
                    ..TypeInfo::primordial()
                })
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn produces_exactly_count_inside_domain() {
        let bounds = Rect::from_size(30.0, 70.0);
        let types = table(&[1.0, 2.0]);
        for count in [0, 1, 17, 1000] {
            let mut rng = fastrand::Rng::with_seed(count as u64);
            let ps = seed_population(count, &bounds, &types, &mut rng);
            assert_eq!(ps.len(), count);
            for p in &ps {
                assert!(bounds.contains(p.position));
                assert!((0.0..TAU).contains(&p.heading));
                assert_eq!(p.pending_heading_delta, 0.0);
                assert!((p.species as usize) < types.len());
            }
        }
    }

    #[test]
    fn species_mix_converges_to_ratios() {
        let ratios = [1.0, 3.0, 0.0, 6.0];
        let types = table(&ratios);
        let bounds = Rect::from_size(100.0, 100.0);
        let mut rng = fastrand::Rng::with_seed(0xC0FFEE);
        let n = 200_000;
        let ps = seed_population(n, &bounds, &types, &mut rng);

        let mut counts = [0usize; 4];
        for p in &ps {
            counts[p.species as usize] += 1;
        }
        let sum: f64 = ratios.iter().sum();
        for (species, &ratio) in ratios.iter().enumerate() {
            let observed = counts[species] as f64 / n as f64;
            let expected = ratio / sum;
            assert!(
                (observed - expected).abs() < 0.01,
                "species {species}: {observed} vs {expected}"
            );
        }
        assert_eq!(counts[2], 0);
    }

    #[test]
    fn same_seed_same_population() {
        let bounds = Rect::from_size(100.0, 100.0);
        let types = table(&[1.0, 1.0]);
        let a = seed_population(500, &bounds, &types, &mut fastrand::Rng::with_seed(42));
        let b = seed_population(500, &bounds, &types, &mut fastrand::Rng::with_seed(42));
        let c = seed_population(500, &bounds, &types, &mut fastrand::Rng::with_seed(43));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
