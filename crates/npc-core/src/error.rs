use thiserror::Error;

/// Configuration validation failures.
///
/// Inside a tick, bad configuration never raises an error; leaves
/// return `Failure` instead. This type only surfaces from
/// constructors that accept whole configuration bundles, where
/// rejecting early is cheaper than limping.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("wake distance {wake} must be below sleep distance {sleep}")]
    ActivationBands { wake: f64, sleep: f64 },

    #[error("sleep distance {sleep} must not exceed max active distance {max_active}")]
    SleepBeyondActive { sleep: f64, max_active: f64 },

    #[error("{field} must be non-negative, got {value}")]
    NegativeDistance { field: &'static str, value: f64 },
}
