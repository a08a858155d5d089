//! Metrics derived from simulation results.
use crate::config::TokenomicsConfig;
use crate::simulation::ModelResults;
use crate::units::{Dimensionless, Hours, Money, MoneyPerHour, Tokens};
use anyhow::{Result, ensure};

/// Hours in a simulated day
const HOURS_PER_DAY: Hours = Hours::new(24.0);

/// The default hourly cost of running one unit of hardware
pub const DEFAULT_UNIT_COST_PER_HOUR: MoneyPerHour = MoneyPerHour::new(2.0);

/// Headline figures for a single scenario
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioSummary {
    /// Name of the scenario
    pub scenario: String,
    /// Total tokens emitted
    pub total_tokens_emitted: Tokens,
    /// Total value of emitted tokens
    pub total_usd_value: Money,
    /// Inflation rate on the last simulated day (percent)
    pub final_inflation_rate: f64,
    /// Number of years covered, rounded up
    pub duration_years: usize,
    /// Change in token price between the first and last day (percent)
    pub price_change_percent: Option<f64>,
    /// Fraction of the post-TGE supply which has been emitted
    pub emitted_share: Dimensionless,
}

impl ScenarioSummary {
    /// Summarise the results of a scenario
    pub fn new(results: &ModelResults, config: &TokenomicsConfig) -> Self {
        let points = results.data_points();
        let price_change_percent = match (points.first(), points.last()) {
            (Some(first), Some(last)) if first.token_price.value() > 0.0 => {
                Some(((last.token_price / first.token_price).value() - 1.0) * 100.0)
            }
            _ => None,
        };

        let remaining_supply = config.remaining_supply();
        let emitted_share = if remaining_supply > Tokens(0.0) {
            results.total_tokens_emitted() / remaining_supply
        } else {
            Dimensionless(0.0)
        };

        Self {
            scenario: results.scenario().to_string(),
            total_tokens_emitted: results.total_tokens_emitted(),
            total_usd_value: results.total_usd_value(),
            final_inflation_rate: results.final_inflation_rate(),
            duration_years: points.len().div_ceil(365),
            price_change_percent,
            emitted_share,
        }
    }
}

/// Check that an hourly hardware cost can be used to calculate capacity
pub fn check_unit_cost(unit_cost_per_hour: MoneyPerHour) -> Result<()> {
    ensure!(
        unit_cost_per_hour.is_finite() && unit_cost_per_hour > MoneyPerHour(0.0),
        "unit_cost_per_hour must be a finite number greater than zero"
    );

    Ok(())
}

/// The number of hardware units whose running costs could be paid for by a day's emissions
pub fn hardware_capacity(usd_value_emitted: Money, unit_cost_per_hour: MoneyPerHour) -> f64 {
    (usd_value_emitted / (unit_cost_per_hour * HOURS_PER_DAY)).value()
}

/// Calculate the hardware capacity for every day of a scenario
pub fn hardware_capacity_series(
    results: &ModelResults,
    unit_cost_per_hour: MoneyPerHour,
) -> Result<Vec<f64>> {
    check_unit_cost(unit_cost_per_hour)?;

    Ok(results
        .data_points()
        .iter()
        .map(|p| hardware_capacity(p.usd_value_emitted, unit_cost_per_hour))
        .collect())
}
