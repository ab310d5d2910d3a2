use std::error::Error;
use std::str::FromStr;

use instant::Instant;
use ppswarm::debug::StepPhase;
use ppswarm::{SimConfig, Simulation};

/// Steps to run when `PPSWARM_STEPS` is unset.
const DEFAULT_STEPS: u64 = 5000;
/// Species count when `PPSWARM_SPECIES` is unset. One means the classic
/// single-species swarm.
const DEFAULT_SPECIES: usize = 1;
/// How often to log step stats (seconds).
const STATS_LOG_INTERVAL: f64 = 5.0;

// ---------------------------------------------------------------------------
// Run configuration
// ---------------------------------------------------------------------------

struct RunConfig {
    seed: u64,
    steps: u64,
    species: usize,
    particles: Option<usize>,
}

impl RunConfig {
    fn from_env() -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            // No seed given: draw one and log it so the run can be replayed.
            seed: env_var("PPSWARM_SEED")?.unwrap_or_else(|| fastrand::u64(..)),
            steps: env_var("PPSWARM_STEPS")?.unwrap_or(DEFAULT_STEPS),
            species: env_var("PPSWARM_SPECIES")?.unwrap_or(DEFAULT_SPECIES),
            particles: env_var("PPSWARM_PARTICLES")?,
        })
    }

    fn sim_config(&self) -> Result<SimConfig, Box<dyn Error>> {
        let mut config = if self.species <= 1 {
            SimConfig {
                seed: self.seed,
                ..SimConfig::default()
            }
        } else {
            SimConfig::random_species(self.species, self.seed)?
        };
        if let Some(n) = self.particles {
            config.population = n;
        }
        Ok(config)
    }
}

fn env_var<T>(name: &str) -> Result<Option<T>, Box<dyn Error>>
where
    T: FromStr,
    T::Err: Error + 'static,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| format!("{name}={raw:?}: {e}").into()),
        Err(_) => Ok(None),
    }
}

// ---------------------------------------------------------------------------
// Step timing
// ---------------------------------------------------------------------------

struct StepStats {
    step_count: u64,
    last_log_time: Instant,
    step_time_sum: f64,
    step_time_min: f64,
    step_time_max: f64,
    steps_since_log: u32,
}

impl StepStats {
    fn new() -> Self {
        Self {
            step_count: 0,
            last_log_time: Instant::now(),
            step_time_sum: 0.0,
            step_time_min: f64::MAX,
            step_time_max: 0.0,
            steps_since_log: 0,
        }
    }

    fn record_step(&mut self, dt: f64, sim: &Simulation) {
        self.step_count += 1;
        self.steps_since_log += 1;
        self.step_time_sum += dt;
        self.step_time_min = self.step_time_min.min(dt);
        self.step_time_max = self.step_time_max.max(dt);

        let elapsed = self.last_log_time.elapsed().as_secs_f64();
        if elapsed >= STATS_LOG_INTERVAL {
            let avg_ms = (self.step_time_sum / self.steps_since_log as f64) * 1000.0;
            let rate = self.steps_since_log as f64 / elapsed;
            let timers = sim.timers();
            let phases = StepPhase::ALL
                .iter()
                .map(|&p| format!("{} {:.0}us", p.label(), timers.get(p)))
                .collect::<Vec<_>>()
                .join(", ");
            let census = sim.census();
            log::info!(
                "Steps/s: {:.0} | avg: {:.2}ms | min: {:.2}ms | max: {:.2}ms | {} | neighbors: {:.2} (close {:.2}) | total steps: {}",
                rate,
                avg_ms,
                self.step_time_min * 1000.0,
                self.step_time_max * 1000.0,
                phases,
                census.mean_neighbors,
                census.mean_close_neighbors,
                self.step_count,
            );
            self.last_log_time = Instant::now();
            self.step_time_sum = 0.0;
            self.step_time_min = f64::MAX;
            self.step_time_max = 0.0;
            self.steps_since_log = 0;
        }
    }
}

/// Build the simulation from the environment and step it.
pub fn run() -> Result<(), Box<dyn Error>> {
    let run = RunConfig::from_env()?;
    log::info!("Seed: {}", run.seed);

    let mut sim = Simulation::new(run.sim_config()?)?;
    log::info!(
        "Spawned {} particles, running {} steps",
        sim.particles().len(),
        run.steps
    );

    let mut stats = StepStats::new();
    for _ in 0..run.steps {
        let start = Instant::now();
        sim.step()?;
        stats.record_step(start.elapsed().as_secs_f64(), &sim);
    }

    let census = sim.census();
    log::info!(
        "Done after {} steps: species {:?}, mean neighbors {:.2}, mean close {:.2}, occupied cells {}",
        sim.steps(),
        census.per_species,
        census.mean_neighbors,
        census.mean_close_neighbors,
        sim.grid().occupied(),
    );
    Ok(())
}
