use arena_core::{BoundsError, Coordinate};

/// Configuration rejected at construction time.
///
/// Malformed weights and radii are programming errors; they are caught
/// when a controller is built, never during a tick.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("threat radii must be positive (critical={critical}, warning={warning})")]
    ZeroRadius { critical: u32, warning: u32 },

    #[error("critical radius {critical} exceeds warning radius {warning}")]
    InvertedRadii { critical: u32, warning: u32 },

    #[error("base step cost must be positive")]
    ZeroStepCost,

    #[error("hysteresis requires at least one calm tick")]
    ZeroCalmTicks,

    #[error("{name} must be a positive finite factor, got {value}")]
    NonPositiveFactor { name: &'static str, value: f64 },
}

/// Failures inside the per-tick decision pipeline.
///
/// These never reach the engine: the tick boundary converts any of them
/// into a safe scanning turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DecisionError {
    #[error("no match in progress; on_match_reset was not called")]
    NotReset,

    #[error("observation window is missing the agent's own cell at {0}")]
    MissingSelfTile(Coordinate),

    #[error("observation window has no actor record on the agent's cell at {0}")]
    MissingSelfActor(Coordinate),

    #[error(transparent)]
    OutOfBounds(#[from] BoundsError),
}
