use instant::Instant;

/// Which phase of the simulation step is being timed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum StepPhase {
    GridRebuild = 0,
    Interaction = 1,
    Integration = 2,
}

impl StepPhase {
    pub const ALL: [StepPhase; 3] = [Self::GridRebuild, Self::Interaction, Self::Integration];

    pub fn label(self) -> &'static str {
        match self {
            Self::GridRebuild => "Grid",
            Self::Interaction => "Interaction",
            Self::Integration => "Integration",
        }
    }
}

/// Per-phase timing with exponential moving average smoothing.
pub struct PhaseTimers {
    /// EMA-smoothed duration in microseconds per phase.
    pub durations_us: [f64; 3],
    /// Timestamp when `begin()` was called.
    start: Instant,
}

const EMA_ALPHA: f64 = 0.1;

impl PhaseTimers {
    pub fn new() -> Self {
        Self {
            durations_us: [0.0; 3],
            start: Instant::now(),
        }
    }

    /// Call before a phase runs.
    pub fn begin(&mut self) {
        self.start = Instant::now();
    }

    /// Call after a phase finishes. Records elapsed time for `phase`.
    pub fn end(&mut self, phase: StepPhase) {
        let elapsed_us = self.start.elapsed().as_secs_f64() * 1_000_000.0;
        let idx = phase as usize;
        self.durations_us[idx] =
            self.durations_us[idx] * (1.0 - EMA_ALPHA) + elapsed_us * EMA_ALPHA;
    }

    pub fn get(&self, phase: StepPhase) -> f64 {
        self.durations_us[phase as usize]
    }

    /// Sum of all phase durations (microseconds).
    pub fn total_us(&self) -> f64 {
        self.durations_us.iter().sum()
    }
}

impl Default for PhaseTimers {
    fn default() -> Self {
        Self::new()
    }
}
