pub mod interaction;
pub mod movement;
pub mod spatial;

use crate::debug::{PhaseTimers, StepPhase};
use crate::error::StepResult;
use crate::geometry::Rect;
use crate::particle::Particle;
use crate::spatial::Grid;
use crate::species::TypeTable;
use interaction::{InteractionBuffers, Radii};

/// Run the three phases of one step, in order. Interaction reads the grid
/// built from the same positions, so the order is fixed.
pub fn tick(
    particles: &mut [Particle],
    grid: &mut Grid,
    types: &TypeTable,
    bounds: &Rect,
    radii: Radii,
    interaction_bufs: &mut InteractionBuffers,
    timers: &mut PhaseTimers,
) -> StepResult<()> {
    // 1. Rebuild spatial grid
    timers.begin();
    spatial::rebuild(particles, grid)?;
    timers.end(StepPhase::GridRebuild);

    // 2. Neighbor tallies -> pending heading deltas
    timers.begin();
    interaction::update(particles, grid, types, radii, interaction_bufs);
    timers.end(StepPhase::Interaction);

    // 3. Move, turn, wrap
    timers.begin();
    movement::integrate(particles, types, bounds);
    timers.end(StepPhase::Integration);

    Ok(())
}
