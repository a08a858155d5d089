//! Price scenarios describing how the token price evolves over time.
use crate::error::{ModelError, ModelResult};
use crate::units::Dimensionless;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// The number of days covered by each price multiplier
pub const DAYS_PER_PRICE_PERIOD: u32 = 30;

/// The seed used for the default demo scenarios when none is provided
pub const DEFAULT_SEED: u64 = 42;

/// Number of monthly periods covered by the demo scenarios
const DEMO_PERIODS: u32 = 72;

/// Relative width of the uniform noise applied to generated multipliers
const VOLATILITY: f64 = 0.2;

/// Generated multipliers are never allowed to fall below this value
const MIN_MULTIPLIER: f64 = 0.01;

fn default_colour() -> String {
    "#6b7280".into()
}

/// A trajectory for the token price, expressed as multiples of the initial price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PriceScenario {
    /// Name of the scenario
    pub name: String,
    /// Price multiplier for each month, starting from day zero
    pub multipliers: Vec<Dimensionless>,
    /// Colour used when displaying the scenario
    #[serde(default = "default_colour", alias = "color")]
    pub colour: String,
}

impl PriceScenario {
    /// Create a new scenario with the default display colour
    pub fn new(name: impl Into<String>, multipliers: Vec<Dimensionless>) -> Self {
        Self {
            name: name.into(),
            multipliers,
            colour: default_colour(),
        }
    }

    /// A scenario where the price stays at its initial value for the given number of months
    pub fn flat(name: impl Into<String>, months: usize) -> Self {
        Self::new(name, vec![Dimensionless(1.0); months])
    }

    /// Check that the scenario can be simulated
    pub fn validate(&self) -> ModelResult<()> {
        if self.multipliers.is_empty() {
            return Err(ModelError::InvalidScenario(format!(
                "{}: no price multipliers provided",
                self.name
            )));
        }

        if let Some(index) = self
            .multipliers
            .iter()
            .position(|m| !(m.is_finite() && *m >= Dimensionless(0.0)))
        {
            return Err(ModelError::InvalidScenario(format!(
                "{}: multiplier {index} must be a finite number greater than or equal to zero",
                self.name
            )));
        }

        Ok(())
    }

    /// Get the price multiplier in effect on the given day.
    ///
    /// Each multiplier covers [`DAYS_PER_PRICE_PERIOD`] days. Once the multipliers run out, the
    /// last one is used for all later days. Returns `None` if there are no multipliers.
    pub fn multiplier_for_day(&self, day: u32) -> Option<Dimensionless> {
        let last = self.multipliers.len().checked_sub(1)?;
        let period = usize::try_from(day / DAYS_PER_PRICE_PERIOD).unwrap_or(usize::MAX);
        self.multipliers.get(period.min(last)).copied()
    }
}

/// Generate monthly price multipliers following an exponential trend with random noise.
///
/// The trend runs from `start` to `end` over `periods` months, giving `periods + 1` values. Each
/// value is perturbed by up to ±10% and floored at 0.01.
pub fn generate_price_multipliers<R: Rng + ?Sized>(
    rng: &mut R,
    start: f64,
    end: f64,
    periods: u32,
) -> Vec<Dimensionless> {
    let growth_rate = (end / start).powf(1.0 / f64::from(periods.max(1)));

    (0..=periods)
        .map(|i| {
            let trend = start * growth_rate.powf(f64::from(i));
            let noise = 1.0 + rng.gen_range(-0.5..0.5) * VOLATILITY;
            Dimensionless((trend * noise).max(MIN_MULTIPLIER))
        })
        .collect()
}

/// The bear, base and bull demo scenarios, with multipliers drawn from `rng`
pub fn default_price_scenarios<R: Rng + ?Sized>(rng: &mut R) -> Vec<PriceScenario> {
    [
        ("Bear Case", "#ef4444", 0.5),
        ("Base Case", "#3b82f6", 2.0),
        ("Bull Case", "#10b981", 5.0),
    ]
    .into_iter()
    .map(|(name, colour, end)| PriceScenario {
        name: name.into(),
        multipliers: generate_price_multipliers(&mut *rng, 1.0, end, DEMO_PERIODS),
        colour: colour.into(),
    })
    .collect()
}

/// The demo scenarios generated from a fixed seed
pub fn seeded_default_price_scenarios(seed: u64) -> Vec<PriceScenario> {
    let mut rng = StdRng::seed_from_u64(seed);
    default_price_scenarios(&mut rng)
}
