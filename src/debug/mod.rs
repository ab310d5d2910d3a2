pub mod timer;

pub use timer::{PhaseTimers, StepPhase};
