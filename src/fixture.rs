//! Fixtures for tests

use crate::config::TokenomicsConfig;
use crate::scenario::PriceScenario;
use crate::schedule::{InflationSchedule, LinearParams};
use crate::simulation::EmissionModel;
use crate::units::Dimensionless;
use chrono::NaiveDate;
use rstest::fixture;

/// Assert that an error with the given message occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {
        assert_eq!(
            $result.unwrap_err().chain().next().unwrap().to_string(),
            $msg
        );
    };
}
pub(crate) use assert_error;

#[fixture]
pub fn config() -> TokenomicsConfig {
    TokenomicsConfig::default()
}

#[fixture]
pub fn linear_schedule() -> InflationSchedule {
    InflationSchedule::Linear(LinearParams {
        max_rate: Dimensionless(0.15),
        min_rate: Dimensionless(0.02),
    })
}

#[fixture]
pub fn flat_scenario() -> PriceScenario {
    PriceScenario::flat("Flat", 73)
}

#[fixture]
pub fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
}

#[fixture]
pub fn model(
    config: TokenomicsConfig,
    linear_schedule: InflationSchedule,
    start_date: NaiveDate,
) -> EmissionModel {
    EmissionModel::new(config, linear_schedule)
        .unwrap()
        .with_start_date(start_date)
}
