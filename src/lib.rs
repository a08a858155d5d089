//! Common functionality for tokensim, a simulator for token-supply inflation schedules.
//!
//! The core entry points are [`compute`], which simulates a single price scenario, and
//! [`run_all`], which simulates a batch of scenarios against the same config and schedule.
#![warn(missing_docs)]
use std::path::PathBuf;

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod log;
pub mod metrics;
pub mod model;
pub mod output;
pub mod runner;
pub mod scenario;
pub mod schedule;
pub mod settings;
pub mod simulation;
pub mod units;

#[cfg(test)]
mod fixture;

pub use config::TokenomicsConfig;
pub use error::{ModelError, ModelResult};
pub use runner::{ScenarioRunner, run_all};
pub use scenario::PriceScenario;
pub use schedule::InflationSchedule;
pub use simulation::{EmissionDataPoint, EmissionModel, ModelResults, compute};

/// Get the config dir for the program.
///
/// If the platform has no config directory, an empty path is returned, so files will be looked
/// for in the current working directory.
pub fn get_tokensim_config_dir() -> PathBuf {
    let Some(mut dir) = dirs::config_dir() else {
        return PathBuf::new();
    };
    dir.push("tokensim");

    dir
}
