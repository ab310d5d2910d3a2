//! Primordial particle swarm: self-propelled agents on a toroidal plane that
//! turn by a fixed bias plus a gain on the left/right balance of nearby
//! neighbor mass.
//!
//! One [`Simulation::step`] rebuilds the spatial grid, tallies neighbors for
//! every particle (in parallel with the `parallel` feature), then moves and
//! turns every particle.

pub mod config;
pub mod debug;
pub mod error;
pub mod geometry;
pub mod particle;
pub mod seed;
pub mod sim;
pub mod spatial;
pub mod species;
pub mod systems;

pub use config::SimConfig;
pub use error::{ConfigError, StepError};
pub use geometry::Rect;
pub use particle::{Particle, ParticleView};
pub use sim::{Census, Simulation};
pub use species::{TypeInfo, TypeTable};
