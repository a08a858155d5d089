//! The token supply configuration.
use crate::error::{ModelError, ModelResult};
use crate::units::{Dimensionless, MoneyPerToken, Tokens};
use serde::{Deserialize, Serialize};

/// The number of days in a simulated year
pub const DAYS_PER_YEAR: f64 = 365.0;

const DEFAULT_TOTAL_SUPPLY: Tokens = Tokens::new(1_000_000_000.0);
const DEFAULT_TGE_PERCENTAGE: f64 = 40.8;
const DEFAULT_INFLATION_PERIOD_YEARS: f64 = 6.0;
const DEFAULT_INITIAL_PRICE: MoneyPerToken = MoneyPerToken::new(1.0);

/// Describes the supply of a token and its price at launch
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TokenomicsConfig {
    /// The maximum number of tokens that will ever exist
    pub total_supply: Tokens,
    /// The percentage of the total supply unlocked at the token generation event (0-100)
    pub tge_percentage: f64,
    /// The length of the inflation period in years
    pub inflation_period_years: f64,
    /// The price of a token on day zero
    pub initial_price: MoneyPerToken,
}

impl Default for TokenomicsConfig {
    fn default() -> Self {
        Self {
            total_supply: DEFAULT_TOTAL_SUPPLY,
            tge_percentage: DEFAULT_TGE_PERCENTAGE,
            inflation_period_years: DEFAULT_INFLATION_PERIOD_YEARS,
            initial_price: DEFAULT_INITIAL_PRICE,
        }
    }
}

/// Check that a config value is finite and strictly positive
fn check_positive(value: f64, name: &str) -> ModelResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ModelError::InvalidConfig(format!(
            "{name} must be a finite number greater than zero"
        )))
    }
}

impl TokenomicsConfig {
    /// Check that the config can be simulated
    pub fn validate(&self) -> ModelResult<()> {
        check_positive(self.total_supply.value(), "total_supply")?;

        if !(0.0..=100.0).contains(&self.tge_percentage) {
            return Err(ModelError::InvalidConfig(
                "tge_percentage must be between 0 and 100".into(),
            ));
        }

        check_positive(self.inflation_period_years, "inflation_period_years")?;
        check_positive(self.initial_price.value(), "initial_price")?;

        Ok(())
    }

    /// The fraction of the total supply unlocked at the token generation event
    fn tge_fraction(&self) -> Dimensionless {
        Dimensionless(self.tge_percentage / 100.0)
    }

    /// Tokens in circulation from day zero
    pub fn tge_supply(&self) -> Tokens {
        self.total_supply * self.tge_fraction()
    }

    /// Tokens which can still be emitted after the token generation event
    pub fn remaining_supply(&self) -> Tokens {
        self.total_supply - self.tge_supply()
    }

    /// The length of the inflation period in days
    pub fn inflation_period_days(&self) -> f64 {
        DAYS_PER_YEAR * self.inflation_period_years
    }

    /// Elapsed time on the given day as a fraction of the inflation period.
    ///
    /// Exceeds 1 once the inflation period is over.
    pub fn normalised_time(&self, day: u32) -> f64 {
        f64::from(day) / self.inflation_period_days()
    }
}
