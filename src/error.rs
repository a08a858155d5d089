//! Errors raised by the emission model.
use thiserror::Error;

/// Result type for emission model operations
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors that can occur while simulating emissions
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    /// The supply configuration is invalid
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A parameter of the inflation schedule is invalid
    #[error("Invalid schedule parameter: {0}")]
    InvalidParameter(String),

    /// A price scenario cannot be simulated
    #[error("Invalid price scenario: {0}")]
    InvalidScenario(String),

    /// The inflation schedule type is not recognised
    #[error("Unsupported schedule type: {0}")]
    UnsupportedScheduleType(String),
}

impl ModelError {
    /// Whether the error only affects a single price scenario.
    ///
    /// All other errors stem from the config or schedule and so affect every scenario in a batch.
    pub fn is_scenario_specific(&self) -> bool {
        matches!(self, Self::InvalidScenario(_))
    }
}
