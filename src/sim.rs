use crate::config::SimConfig;
use crate::debug::PhaseTimers;
use crate::error::{ConfigError, ConfigResult, StepError, StepResult};
use crate::particle::{Particle, ParticleView};
use crate::seed::seed_population;
use crate::spatial::Grid;
use crate::species::TypeTable;
use crate::systems;
use crate::systems::interaction::{InteractionBuffers, Radii};

/// Per-species population and mean neighbor tallies after a step.
#[derive(Debug, Clone, PartialEq)]
pub struct Census {
    pub per_species: Vec<usize>,
    pub mean_neighbors: f64,
    pub mean_close_neighbors: f64,
}

/// Owns the particles and the grid and advances them one step at a time.
pub struct Simulation {
    config: SimConfig,
    particles: Vec<Particle>,
    grid: Grid,
    // RNG (seeded from config, used for population seeding)
    rng: fastrand::Rng,
    // Interaction buffers (pre-allocated, reused each step)
    interaction_bufs: InteractionBuffers,
    timers: PhaseTimers,
    steps: u64,
    /// Set once a step fails; no further steps run.
    halted: bool,
}

impl Simulation {
    /// Validate `config` and seed `config.population` particles from
    /// `config.seed`.
    pub fn new(config: SimConfig) -> ConfigResult<Self> {
        let mut sim = Self::empty(config)?;
        let count = sim.config.population;
        sim.particles = seed_population(
            count,
            &sim.config.bounds,
            &sim.config.types,
            &mut sim.rng,
        );
        if log::log_enabled!(log::Level::Debug) {
            log::debug!("Census at seed: {:?}", sim.census().per_species);
        }
        Ok(sim)
    }

    /// Validate `config` and start from the given particles instead of a
    /// seeded population. Every particle must sit inside the domain and use
    /// a known species.
    pub fn with_particles(config: SimConfig, particles: Vec<Particle>) -> ConfigResult<Self> {
        let mut sim = Self::empty(config)?;
        let types = sim.config.types.len();
        for (index, p) in particles.iter().enumerate() {
            if p.species as usize >= types {
                return Err(ConfigError::UnknownSpecies {
                    index,
                    species: p.species,
                    types,
                });
            }
            if !sim.config.bounds.contains(p.position) {
                return Err(ConfigError::ParticleOutsideDomain {
                    index,
                    x: p.position.x,
                    y: p.position.y,
                });
            }
        }
        sim.particles = particles;
        Ok(sim)
    }

    fn empty(config: SimConfig) -> ConfigResult<Self> {
        config.validate()?;
        let dims = config.grid_dims();
        let grid = Grid::new(config.bounds, dims);
        log::info!(
            "Simulation ready: domain {:?}..{:?}, grid {}x{} (cell {:.2}x{:.2}), radius {} / {}, {} species, seed {}",
            config.bounds.min,
            config.bounds.max,
            dims.x,
            dims.y,
            grid.cell_size().x,
            grid.cell_size().y,
            config.radius,
            config.close_radius,
            config.types.len(),
            config.seed,
        );
        Ok(Self {
            rng: fastrand::Rng::with_seed(config.seed),
            interaction_bufs: InteractionBuffers::new(config.population),
            particles: Vec::new(),
            grid,
            timers: PhaseTimers::new(),
            steps: 0,
            halted: false,
            config,
        })
    }

    /// One full grid-rebuild / interaction / integration cycle.
    pub fn step(&mut self) -> StepResult<()> {
        if self.halted {
            return Err(StepError::Halted);
        }
        let radii = Radii {
            sensing: self.config.radius,
            close: self.config.close_radius,
        };
        let result = systems::tick(
            &mut self.particles,
            &mut self.grid,
            &self.config.types,
            &self.config.bounds,
            radii,
            &mut self.interaction_bufs,
            &mut self.timers,
        );
        match result {
            Ok(()) => {
                self.steps += 1;
                Ok(())
            }
            Err(e) => {
                log::error!("Step {} failed, halting: {e}", self.steps + 1);
                self.halted = true;
                Err(e)
            }
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Read-only copy of the renderer-facing state.
    pub fn snapshot(&self) -> Vec<ParticleView> {
        self.particles.iter().map(Particle::view).collect()
    }

    pub fn census(&self) -> Census {
        let mut per_species = vec![0usize; self.config.types.len()];
        let mut neighbors = 0u64;
        let mut close = 0u64;
        for p in &self.particles {
            per_species[p.species as usize] += 1;
            neighbors += p.neighbor_count as u64;
            close += p.close_neighbor_count as u64;
        }
        let n = self.particles.len().max(1) as f64;
        Census {
            per_species,
            mean_neighbors: neighbors as f64 / n,
            mean_close_neighbors: close as f64 / n,
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn types(&self) -> &TypeTable {
        &self.config.types
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn timers(&self) -> &PhaseTimers {
        &self.timers
    }

    /// Completed steps.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }
}
