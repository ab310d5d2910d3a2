/// Setup-time configuration failures. Each variant names the constraint that
/// failed so the caller can report it before refusing to run.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("domain bounds on {axis} axis are not finite")]
    NonFiniteBounds { axis: char },
    #[error("domain bounds on {axis} axis are inverted or empty: min {min} >= max {max}")]
    InvertedBounds { axis: char, min: f64, max: f64 },
    #[error("sensing radius must be positive and finite, got {0}")]
    NonPositiveRadius(f64),
    #[error("close radius {close} must lie in [0, {radius}]")]
    CloseRadiusOutOfRange { close: f64, radius: f64 },
    #[error("sensing radius {radius} exceeds cell size {cell} on {axis} axis")]
    RadiusExceedsCell { axis: char, radius: f64, cell: f64 },
    #[error("grid needs at least 3 cells on {axis} axis, got {cells}")]
    GridTooSmall { axis: char, cells: u32 },
    #[error("grid of {x}x{y} cells is too large to index")]
    GridTooLarge { x: u32, y: u32 },
    #[error("type table is empty")]
    EmptyTypeTable,
    #[error("type table has {count} species, at most {max} fit a species id")]
    TooManySpecies { count: usize, max: usize },
    #[error("species {species} has negative spawn ratio {ratio}")]
    NegativeRatio { species: usize, ratio: f64 },
    #[error("spawn ratios sum to zero")]
    ZeroRatioSum,
    #[error("particle {index} uses species {species}, table has {types}")]
    UnknownSpecies {
        index: usize,
        species: u16,
        types: usize,
    },
    #[error("particle {index} at ({x}, {y}) lies outside the domain")]
    ParticleOutsideDomain { index: usize, x: f64, y: f64 },
    #[error("species {species} has invalid {field}: {value}")]
    InvalidTypeConstant {
        species: usize,
        field: &'static str,
        value: f64,
    },
}

/// Invariant violations detected while stepping. These are defects, never
/// retried: the simulation refuses further steps once one is raised.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StepError {
    #[error("particle {index} has a non-finite position")]
    NonFinitePosition { index: usize },
    #[error("particle {index} at ({x}, {y}) left the domain")]
    OutsideDomain { index: usize, x: f64, y: f64 },
    #[error("simulation halted after an earlier step failure")]
    Halted,
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
pub type StepResult<T> = std::result::Result<T, StepError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_failed_constraint() {
        let e = ConfigError::NegativeRatio {
            species: 2,
            ratio: -0.5,
        };
        assert_eq!(e.to_string(), "species 2 has negative spawn ratio -0.5");

        let e = ConfigError::RadiusExceedsCell {
            axis: 'x',
            radius: 12.0,
            cell: 10.0,
        };
        assert!(e.to_string().contains("x axis"));
    }
}
