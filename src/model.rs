//! Code for loading emission models from `model.toml`.
use crate::config::TokenomicsConfig;
use crate::input::{ScheduleInput, input_err_msg, read_toml};
use crate::scenario::{DEFAULT_SEED, PriceScenario, seeded_default_price_scenarios};
use crate::schedule::InflationSchedule;
use crate::simulation::EmissionModel;
use anyhow::{Context, Result, ensure};
use chrono::NaiveDate;
use log::warn;
use serde::Deserialize;
use std::path::Path;

/// The name of the model file within a model directory
pub const MODEL_FILE_NAME: &str = "model.toml";

/// Represents the contents of the entire model file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ModelFile {
    /// Number of days to simulate
    horizon_days: Option<u32>,
    /// Calendar date of day zero
    start_date: Option<NaiveDate>,
    /// Seed for generating the demo price scenarios
    seed: Option<u64>,
    #[serde(default)]
    config: TokenomicsConfig,
    schedule: ScheduleInput,
    scenarios: Option<Vec<PriceScenario>>,
}

/// A model which is ready to be simulated
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    /// The token supply config
    pub config: TokenomicsConfig,
    /// The inflation schedule
    pub schedule: InflationSchedule,
    /// Number of days to simulate, if specified in the model file
    pub horizon_days: Option<u32>,
    /// Calendar date of day zero, if specified in the model file
    pub start_date: Option<NaiveDate>,
    /// Seed for generating demo price scenarios
    pub seed: u64,
    /// Price scenarios given in the model file
    scenarios: Option<Vec<PriceScenario>>,
}

/// Warn about scenarios which will be skipped when the model is run
fn check_scenarios(scenarios: &[PriceScenario]) -> Result<()> {
    ensure!(!scenarios.is_empty(), "`scenarios` cannot be empty");

    for scenario in scenarios {
        if let Err(err) = scenario.validate() {
            warn!("{err}. This scenario will be skipped.");
        }
    }

    Ok(())
}

impl Model {
    /// Read a model from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `model_dir` - Folder containing model configuration files
    pub fn from_path<P: AsRef<Path>>(model_dir: P) -> Result<Model> {
        let file_path = model_dir.as_ref().join(MODEL_FILE_NAME);
        let model_file: ModelFile = read_toml(&file_path)?;

        model_file
            .config
            .validate()
            .with_context(|| input_err_msg(&file_path))?;
        let schedule = model_file
            .schedule
            .into_schedule()
            .with_context(|| input_err_msg(&file_path))?;
        if let Some(scenarios) = &model_file.scenarios {
            check_scenarios(scenarios).with_context(|| input_err_msg(&file_path))?;
        }

        Ok(Model {
            config: model_file.config,
            schedule,
            horizon_days: model_file.horizon_days,
            start_date: model_file.start_date,
            seed: model_file.seed.unwrap_or(DEFAULT_SEED),
            scenarios: model_file.scenarios,
        })
    }

    /// The price scenarios to simulate.
    ///
    /// If the model file does not list any, the demo scenarios are generated from `seed` (or the
    /// model's own seed if `None`).
    pub fn price_scenarios(&self, seed: Option<u64>) -> Vec<PriceScenario> {
        match &self.scenarios {
            Some(scenarios) => scenarios.clone(),
            None => seeded_default_price_scenarios(seed.unwrap_or(self.seed)),
        }
    }

    /// Whether the model file provides its own price scenarios
    pub fn has_explicit_scenarios(&self) -> bool {
        self.scenarios.is_some()
    }

    /// Create the emission model to simulate
    pub fn emission_model(&self) -> Result<EmissionModel> {
        let model = EmissionModel::new(self.config, self.schedule)?;
        Ok(match self.start_date {
            Some(start_date) => model.with_start_date(start_date),
            None => model,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::assert_error;
    use crate::schedule::{LinearParams, ScheduleKind};
    use crate::units::{Dimensionless, Tokens};
    use std::fs::File;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::{TempDir, tempdir};

    fn write_model(contents: &str) -> TempDir {
        let dir = tempdir().unwrap();
        let mut file = File::create(dir.path().join(MODEL_FILE_NAME)).unwrap();
        write!(file, "{contents}").unwrap();
        dir
    }

    #[test]
    fn test_from_path_minimal() {
        let dir = write_model("[schedule]\ntype = \"linear\"\n");
        let model = Model::from_path(dir.path()).unwrap();

        assert_eq!(model.config, TokenomicsConfig::default());
        assert_eq!(
            model.schedule,
            InflationSchedule::Linear(LinearParams::default())
        );
        assert_eq!(model.horizon_days, None);
        assert_eq!(model.seed, DEFAULT_SEED);
        assert!(!model.has_explicit_scenarios());
        assert_eq!(
            model.price_scenarios(None),
            seeded_default_price_scenarios(DEFAULT_SEED)
        );
        assert_eq!(model.price_scenarios(Some(3)), seeded_default_price_scenarios(3));
    }

    #[test]
    fn test_from_path_full() {
        let dir = write_model(
            "horizon_days = 100
start_date = \"2025-06-01\"
seed = 7

[config]
total_supply = 21_000_000
tge_percentage = 0

[schedule]
type = \"halving\"
initial_rate = 0.5

[[scenarios]]
name = \"Moon\"
multipliers = [1, 10, 100]
color = \"#ffffff\"
",
        );
        let model = Model::from_path(dir.path()).unwrap();

        assert_eq!(model.config.total_supply, Tokens(21_000_000.0));
        assert_eq!(model.config.tge_percentage, 0.0);
        assert_eq!(model.config.inflation_period_years, 6.0);
        assert_eq!(model.schedule.kind(), ScheduleKind::Halving);
        assert_eq!(model.horizon_days, Some(100));
        assert_eq!(model.start_date, NaiveDate::from_ymd_opt(2025, 6, 1));
        assert_eq!(model.seed, 7);

        let scenarios = model.price_scenarios(Some(1));
        assert_eq!(scenarios.len(), 1);
        assert_eq!(scenarios[0].name, "Moon");
        assert_eq!(scenarios[0].colour, "#ffffff");
        assert_eq!(scenarios[0].multipliers[2], Dimensionless(100.0));

        let emission_model = model.emission_model().unwrap();
        assert_eq!(emission_model.start_date(), NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
    }

    #[test]
    fn test_from_path_invalid_config() {
        let dir = write_model("[config]\ntge_percentage = 120\n\n[schedule]\ntype = \"linear\"\n");
        let result = Model::from_path(dir.path());
        assert_error!(result, input_err_msg(dir.path().join(MODEL_FILE_NAME)));
    }

    #[test]
    fn test_from_path_unsupported_schedule() {
        let dir = write_model("[schedule]\ntype = \"sigmoid\"\n");
        let err = Model::from_path(dir.path()).unwrap_err();
        assert_eq!(
            err.chain().nth(1).unwrap().to_string(),
            "Unsupported schedule type: sigmoid"
        );
    }

    #[test]
    fn test_from_path_no_scenarios() {
        let dir = write_model("scenarios = []\n\n[schedule]\ntype = \"linear\"\n");
        let err = Model::from_path(dir.path()).unwrap_err();
        assert_eq!(
            err.chain().nth(1).unwrap().to_string(),
            "`scenarios` cannot be empty"
        );
    }

    #[test]
    fn test_from_path_invalid_scenario_is_kept() {
        // Invalid scenarios are skipped at run time rather than rejected
        let dir = write_model(
            "[schedule]\ntype = \"linear\"\n\n[[scenarios]]\nname = \"empty\"\nmultipliers = []\n",
        );
        let model = Model::from_path(dir.path()).unwrap();
        assert_eq!(model.price_scenarios(None).len(), 1);
    }

    #[test]
    fn test_from_path_missing() {
        assert!(Model::from_path(PathBuf::from("does/not/exist")).is_err());
    }
}
