#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::geometry::{right_axis, sign};
use crate::particle::Particle;
use crate::spatial::Grid;
use crate::species::{TypeInfo, TypeTable};

/// Sensing thresholds shared by every particle.
#[derive(Debug, Clone, Copy)]
pub struct Radii {
    pub sensing: f64,
    pub close: f64,
}

/// What one particle saw this step.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Tally {
    pub neighbors: u32,
    pub close: u32,
    /// Summed neighbor mass left of the direction of travel.
    pub left: f64,
    /// Summed neighbor mass right of (or on) the direction of travel.
    pub right: f64,
}

impl Tally {
    pub fn total(&self) -> f64 {
        self.left + self.right
    }

    /// Left minus right. Negative when the right side is heavier.
    pub fn imbalance(&self) -> f64 {
        self.left - self.right
    }

    /// Fixed bias plus gain scaled by total neighbor mass, signed by which
    /// side is heavier.
    pub fn heading_delta(&self, info: &TypeInfo) -> f64 {
        info.fixed_rotation + info.rotation_gain * self.total() * sign(self.imbalance())
    }
}

// ---------------------------------------------------------------------------
// Buffers (pre-allocated, reused each step)
// ---------------------------------------------------------------------------

pub struct InteractionBuffers {
    tallies: Vec<Tally>,
}

impl InteractionBuffers {
    pub fn new(capacity: usize) -> Self {
        Self {
            tallies: Vec::with_capacity(capacity),
        }
    }

    /// Tallies from the most recent pass, indexed like the particles.
    pub fn tallies(&self) -> &[Tally] {
        &self.tallies
    }
}

// ---------------------------------------------------------------------------
// Main entry point
// ---------------------------------------------------------------------------

/// Interaction pass. Must run right after the grid rebuild for the same
/// positions.
pub fn update(
    particles: &mut [Particle],
    grid: &Grid,
    types: &TypeTable,
    radii: Radii,
    bufs: &mut InteractionBuffers,
) {
    // Phase A: read-only sensing, one tally per particle.
    phase_read(particles, grid, types, radii, bufs);

    // Phase B: each particle absorbs its own tally.
    phase_write(particles, types, bufs);
}

fn phase_read(
    particles: &[Particle],
    grid: &Grid,
    types: &TypeTable,
    radii: Radii,
    bufs: &mut InteractionBuffers,
) {
    bufs.tallies.clear();
    bufs.tallies.resize(particles.len(), Tally::default());

    #[cfg(feature = "parallel")]
    {
        bufs.tallies
            .par_iter_mut()
            .enumerate()
            .for_each(|(i, tally)| *tally = sense(i, particles, grid, types, radii));
    }
    #[cfg(not(feature = "parallel"))]
    {
        for (i, tally) in bufs.tallies.iter_mut().enumerate() {
            *tally = sense(i, particles, grid, types, radii);
        }
    }
}

fn phase_write(particles: &mut [Particle], types: &TypeTable, bufs: &InteractionBuffers) {
    #[cfg(feature = "parallel")]
    {
        particles
            .par_iter_mut()
            .zip(bufs.tallies.par_iter())
            .for_each(|(p, tally)| absorb(p, tally, types));
    }
    #[cfg(not(feature = "parallel"))]
    {
        for (p, tally) in particles.iter_mut().zip(bufs.tallies.iter()) {
            absorb(p, tally, types);
        }
    }
}

#[inline]
fn absorb(p: &mut Particle, tally: &Tally, types: &TypeTable) {
    p.neighbor_count = tally.neighbors;
    p.close_neighbor_count = tally.close;
    p.pending_heading_delta += tally.heading_delta(types.resolve(p.species));
}

/// Scan the 3x3 cell block around particle `index` and tally its
/// neighbors. Reads only; safe to call for many particles at once.
pub fn sense(
    index: usize,
    particles: &[Particle],
    grid: &Grid,
    types: &TypeTable,
    radii: Radii,
) -> Tally {
    let me = &particles[index];
    let cell = grid.cell_index_for(me.position);
    let right = right_axis(me.heading);
    let radius = radii.sensing;
    let radius_sq = radius * radius;
    let close_sq = radii.close * radii.close;

    let mut tally = Tally::default();
    for (members, offset) in grid.neighborhood(cell) {
        for &other_index in members {
            let oi = other_index as usize;
            if oi == index {
                continue;
            }
            let other = &particles[oi];
            let axis = other.position - me.position + offset;

            // Coarse box check before the exact distance.
            if axis.x.abs() > radius || axis.y.abs() > radius {
                continue;
            }
            let dist_sq = axis.length_squared();
            if dist_sq > radius_sq {
                continue;
            }

            tally.neighbors += 1;
            if dist_sq < close_sq {
                tally.close += 1;
            }
            let mass = types.resolve(other.species).mass;
            if axis.dot(right) >= 0.0 {
                tally.right += mass;
            } else {
                tally.left += mass;
            }
        }
    }
    tally
}
