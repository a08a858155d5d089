//! Functionality for simulating daily token emissions.
use crate::config::{DAYS_PER_YEAR, TokenomicsConfig};
use crate::error::{ModelError, ModelResult};
use crate::scenario::PriceScenario;
use crate::schedule::InflationSchedule;
use crate::units::{Dimensionless, Money, MoneyPerToken, Tokens};
use chrono::{Days, Local, NaiveDate};
use log::debug;
use serde::Serialize;

/// The default number of days to simulate (six years)
pub const DEFAULT_HORIZON_DAYS: u32 = 365 * 6;

/// The state of the token supply on a single simulated day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmissionDataPoint {
    /// Days since the token generation event
    pub day: u32,
    /// Calendar date of the day
    pub date: NaiveDate,
    /// Tokens emitted on this day
    pub tokens_emitted: Tokens,
    /// Tokens emitted since the token generation event, including this day
    pub cumulative_tokens: Tokens,
    /// Token price on this day
    pub token_price: MoneyPerToken,
    /// Value of the tokens emitted on this day
    pub usd_value_emitted: Money,
    /// Value of all tokens emitted so far
    pub cumulative_usd_value: Money,
    /// Annualised inflation rate, as a percentage
    pub inflation_rate: f64,
}

/// The outcome of simulating a single price scenario
#[derive(Debug, Clone, PartialEq)]
pub struct ModelResults {
    scenario: String,
    data_points: Vec<EmissionDataPoint>,
}

impl ModelResults {
    /// Create results from a series of data points in increasing day order
    pub fn new(scenario: impl Into<String>, data_points: Vec<EmissionDataPoint>) -> Self {
        debug_assert!(data_points.windows(2).all(|w| w[0].day < w[1].day));

        Self {
            scenario: scenario.into(),
            data_points,
        }
    }

    /// Name of the simulated scenario
    pub fn scenario(&self) -> &str {
        &self.scenario
    }

    /// The daily data points
    pub fn data_points(&self) -> &[EmissionDataPoint] {
        &self.data_points
    }

    /// Total tokens emitted over the simulation
    pub fn total_tokens_emitted(&self) -> Tokens {
        self.data_points
            .last()
            .map_or(Tokens(0.0), |p| p.cumulative_tokens)
    }

    /// Total value of tokens emitted over the simulation
    pub fn total_usd_value(&self) -> Money {
        self.data_points
            .last()
            .map_or(Money(0.0), |p| p.cumulative_usd_value)
    }

    /// Inflation rate on the last simulated day (percent), or zero if nothing was simulated
    pub fn final_inflation_rate(&self) -> f64 {
        self.data_points.last().map_or(0.0, |p| p.inflation_rate)
    }
}

/// A validated combination of supply config and inflation schedule
#[derive(Debug, Clone, PartialEq)]
pub struct EmissionModel {
    config: TokenomicsConfig,
    schedule: InflationSchedule,
    start_date: NaiveDate,
}

impl EmissionModel {
    /// Create a new model, starting from today's date.
    ///
    /// Fails if either the config or the schedule is invalid.
    pub fn new(config: TokenomicsConfig, schedule: InflationSchedule) -> ModelResult<Self> {
        config.validate()?;
        schedule.validate()?;

        Ok(Self {
            config,
            schedule,
            start_date: Local::now().date_naive(),
        })
    }

    /// Use the given date for day zero
    pub fn with_start_date(mut self, start_date: NaiveDate) -> Self {
        self.start_date = start_date;
        self
    }

    /// The supply config
    pub fn config(&self) -> &TokenomicsConfig {
        &self.config
    }

    /// The inflation schedule
    pub fn schedule(&self) -> &InflationSchedule {
        &self.schedule
    }

    /// The date of day zero
    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    /// Simulate daily emissions for a price scenario.
    ///
    /// Emissions are proportional to the circulating supply and are capped so that the total never
    /// exceeds the supply left after the token generation event. The simulation stops early once
    /// that supply has been exhausted, so fewer than `horizon_days` data points may be returned.
    ///
    /// # Arguments
    ///
    /// * `scenario` - The price trajectory to use
    /// * `horizon_days` - The maximum number of days to simulate
    pub fn simulate(
        &self,
        scenario: &PriceScenario,
        horizon_days: u32,
    ) -> ModelResult<ModelResults> {
        scenario.validate()?;

        let tge_supply = self.config.tge_supply();
        let remaining_supply = self.config.remaining_supply();
        let days_per_year = Dimensionless(DAYS_PER_YEAR);

        let mut cumulative_tokens = Tokens(0.0);
        let mut cumulative_usd_value = Money(0.0);
        // The supply cap can end the run long before the horizon
        let mut data_points =
            Vec::with_capacity(horizon_days.min(DEFAULT_HORIZON_DAYS) as usize);
        for day in 0..horizon_days {
            let t = self.config.normalised_time(day);
            let annual_rate = self
                .schedule
                .annual_rate(t, self.config.inflation_period_years)?;
            let daily_rate = annual_rate / days_per_year;

            let circulating_supply = tge_supply + cumulative_tokens;
            let headroom = (remaining_supply - cumulative_tokens).max(Tokens(0.0));
            let tokens_emitted = (circulating_supply * daily_rate).min(headroom);
            cumulative_tokens += tokens_emitted;

            let multiplier = scenario.multiplier_for_day(day).ok_or_else(|| {
                ModelError::InvalidScenario(format!("{}: no price multipliers", scenario.name))
            })?;
            let token_price = self.config.initial_price * multiplier;
            let usd_value_emitted = tokens_emitted * token_price;
            cumulative_usd_value += usd_value_emitted;

            let date = self
                .start_date
                .checked_add_days(Days::new(u64::from(day)))
                .ok_or_else(|| {
                    ModelError::InvalidConfig(format!(
                        "day {day} is beyond the supported calendar range"
                    ))
                })?;

            data_points.push(EmissionDataPoint {
                day,
                date,
                tokens_emitted,
                cumulative_tokens,
                token_price,
                usd_value_emitted,
                cumulative_usd_value,
                inflation_rate: annual_rate.value() * 100.0,
            });

            if cumulative_tokens >= remaining_supply {
                debug!(
                    "{}: supply exhausted after {} days",
                    scenario.name,
                    day + 1
                );
                break;
            }
        }

        Ok(ModelResults::new(scenario.name.clone(), data_points))
    }
}

/// Simulate a single price scenario.
///
/// If `horizon_days` is `None`, [`DEFAULT_HORIZON_DAYS`] is used.
pub fn compute(
    config: &TokenomicsConfig,
    schedule: &InflationSchedule,
    scenario: &PriceScenario,
    horizon_days: Option<u32>,
) -> ModelResult<ModelResults> {
    EmissionModel::new(*config, *schedule)?
        .simulate(scenario, horizon_days.unwrap_or(DEFAULT_HORIZON_DAYS))
}
