use glam::DVec2;

/// Mutable per-agent state. Owned by the simulation, indexed by `u32`
/// from the spatial grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: DVec2,
    /// Radians in `[0, 2π)`.
    pub heading: f64,
    /// Accumulated this step, applied and cleared by integration.
    pub pending_heading_delta: f64,
    /// Neighbors within the sensing radius, recomputed every step.
    pub neighbor_count: u32,
    /// Neighbors within the close radius, recomputed every step.
    pub close_neighbor_count: u32,
    pub species: u16,
}

impl Particle {
    pub fn new(position: DVec2, heading: f64, species: u16) -> Self {
        Self {
            position,
            heading,
            pending_heading_delta: 0.0,
            neighbor_count: 0,
            close_neighbor_count: 0,
            species,
        }
    }

    pub fn view(&self) -> ParticleView {
        ParticleView {
            position: self.position,
            heading: self.heading,
            species: self.species,
            neighbor_count: self.neighbor_count,
            close_neighbor_count: self.close_neighbor_count,
        }
    }
}

/// Read-only copy of the state a renderer needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleView {
    pub position: DVec2,
    pub heading: f64,
    pub species: u16,
    pub neighbor_count: u32,
    pub close_neighbor_count: u32,
}
