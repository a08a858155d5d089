//! Inflation schedules and the curves they describe.
//!
//! An inflation schedule maps normalised time (the fraction of the inflation period which has
//! elapsed) onto an annualised inflation rate. Four decay shapes are supported, each with its own
//! set of parameters. Parameters which are not provided take the defaults documented on each
//! parameter struct.
use crate::error::{ModelError, ModelResult};
use crate::units::Dimensionless;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

macro_rules! define_param_default {
    ($name:ident, $value: expr) => {
        fn $name() -> Dimensionless {
            Dimensionless($value)
        }
    };
}

define_param_default!(default_max_rate, 0.2);
define_param_default!(default_min_rate, 0.01);
define_param_default!(default_initial_rate, 0.2);
define_param_default!(default_halving_period, 1.0);
define_param_default!(default_log_base, 0.1);
define_param_default!(default_log_scale, 0.2);
define_param_default!(default_decay_rate, 2.0);
define_param_default!(default_exp_scale, 0.2);

/// The shape of an inflation schedule
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum ScheduleKind {
    /// Straight-line decay between a maximum and minimum rate
    Linear,
    /// The rate halves at fixed intervals
    Halving,
    /// Decay following `scale * exp(-t / base)`
    Logarithmic,
    /// Decay following `scale * (1 - t)^decay_rate`
    Exponential,
}

impl ScheduleKind {
    /// Parse a schedule type name
    pub fn parse(name: &str) -> ModelResult<Self> {
        name.trim()
            .parse()
            .map_err(|_| ModelError::UnsupportedScheduleType(name.to_string()))
    }
}

/// Parameters for a [`ScheduleKind::Linear`] schedule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LinearParams {
    /// Rate at the start of the inflation period (default 0.2)
    #[serde(default = "default_max_rate")]
    pub max_rate: Dimensionless,
    /// Rate at the end of the inflation period (default 0.01)
    #[serde(default = "default_min_rate")]
    pub min_rate: Dimensionless,
}

impl Default for LinearParams {
    fn default() -> Self {
        Self {
            max_rate: default_max_rate(),
            min_rate: default_min_rate(),
        }
    }
}

/// Parameters for a [`ScheduleKind::Halving`] schedule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HalvingParams {
    /// Rate before the first halving (default 0.2)
    #[serde(default = "default_initial_rate")]
    pub initial_rate: Dimensionless,
    /// Years between halvings (default 1)
    #[serde(default = "default_halving_period")]
    pub halving_period: Dimensionless,
}

impl Default for HalvingParams {
    fn default() -> Self {
        Self {
            initial_rate: default_initial_rate(),
            halving_period: default_halving_period(),
        }
    }
}

/// Parameters for a [`ScheduleKind::Logarithmic`] schedule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogarithmicParams {
    /// Time constant of the decay, as a fraction of the inflation period (default 0.1)
    #[serde(default = "default_log_base")]
    pub log_base: Dimensionless,
    /// Rate at the start of the inflation period (default 0.2)
    #[serde(default = "default_log_scale")]
    pub log_scale: Dimensionless,
}

impl Default for LogarithmicParams {
    fn default() -> Self {
        Self {
            log_base: default_log_base(),
            log_scale: default_log_scale(),
        }
    }
}

/// Parameters for a [`ScheduleKind::Exponential`] schedule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExponentialParams {
    /// Exponent applied to the remaining fraction of the period (default 2)
    #[serde(default = "default_decay_rate")]
    pub decay_rate: Dimensionless,
    /// Rate at the start of the inflation period (default 0.2)
    #[serde(default = "default_exp_scale")]
    pub exp_scale: Dimensionless,
}

impl Default for ExponentialParams {
    fn default() -> Self {
        Self {
            decay_rate: default_decay_rate(),
            exp_scale: default_exp_scale(),
        }
    }
}

/// An inflation schedule together with its parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InflationSchedule {
    /// See [`ScheduleKind::Linear`]
    Linear(LinearParams),
    /// See [`ScheduleKind::Halving`]
    Halving(HalvingParams),
    /// See [`ScheduleKind::Logarithmic`]
    Logarithmic(LogarithmicParams),
    /// See [`ScheduleKind::Exponential`]
    Exponential(ExponentialParams),
}

/// Check that a rate-like parameter is finite and not negative
fn check_non_negative(value: Dimensionless, name: &str) -> ModelResult<()> {
    if value.is_finite() && value >= Dimensionless(0.0) {
        Ok(())
    } else {
        Err(ModelError::InvalidParameter(format!(
            "{name} must be a finite number greater than or equal to zero"
        )))
    }
}

/// Check that a parameter used as a divisor is finite and strictly positive
fn check_positive(value: Dimensionless, name: &str) -> ModelResult<()> {
    if value.is_finite() && value > Dimensionless(0.0) {
        Ok(())
    } else {
        Err(ModelError::InvalidParameter(format!(
            "{name} must be a finite number greater than zero"
        )))
    }
}

impl InflationSchedule {
    /// A schedule of the given kind where every parameter takes its default value
    pub fn with_defaults(kind: ScheduleKind) -> Self {
        match kind {
            ScheduleKind::Linear => Self::Linear(LinearParams::default()),
            ScheduleKind::Halving => Self::Halving(HalvingParams::default()),
            ScheduleKind::Logarithmic => Self::Logarithmic(LogarithmicParams::default()),
            ScheduleKind::Exponential => Self::Exponential(ExponentialParams::default()),
        }
    }

    /// The recommended starting point for each kind of schedule
    pub fn preset(kind: ScheduleKind) -> Self {
        match kind {
            ScheduleKind::Linear => Self::Linear(LinearParams {
                max_rate: Dimensionless(0.15),
                min_rate: Dimensionless(0.02),
            }),
            ScheduleKind::Halving => Self::Halving(HalvingParams {
                initial_rate: Dimensionless(0.12),
                halving_period: Dimensionless(2.0),
            }),
            ScheduleKind::Logarithmic => Self::Logarithmic(LogarithmicParams {
                log_base: Dimensionless(0.3),
                log_scale: Dimensionless(0.15),
            }),
            ScheduleKind::Exponential => Self::Exponential(ExponentialParams {
                decay_rate: Dimensionless(1.5),
                exp_scale: Dimensionless(0.15),
            }),
        }
    }

    /// The kind of schedule
    pub fn kind(&self) -> ScheduleKind {
        match self {
            Self::Linear(_) => ScheduleKind::Linear,
            Self::Halving(_) => ScheduleKind::Halving,
            Self::Logarithmic(_) => ScheduleKind::Logarithmic,
            Self::Exponential(_) => ScheduleKind::Exponential,
        }
    }

    /// Check that the parameters describe a non-negative, well-defined curve
    pub fn validate(&self) -> ModelResult<()> {
        match self {
            Self::Linear(p) => {
                check_non_negative(p.max_rate, "max_rate")?;
                check_non_negative(p.min_rate, "min_rate")?;
            }
            Self::Halving(p) => {
                check_non_negative(p.initial_rate, "initial_rate")?;
                check_positive(p.halving_period, "halving_period")?;
            }
            Self::Logarithmic(p) => {
                check_positive(p.log_base, "log_base")?;
                check_non_negative(p.log_scale, "log_scale")?;
            }
            Self::Exponential(p) => {
                check_non_negative(p.decay_rate, "decay_rate")?;
                check_non_negative(p.exp_scale, "exp_scale")?;
            }
        }

        Ok(())
    }

    /// Calculate the annualised inflation rate at normalised time `t`.
    ///
    /// # Arguments
    ///
    /// * `t` - Fraction of the inflation period which has elapsed. Must not be negative. Linear
    ///   and exponential schedules hold their end-of-period rate for `t > 1`; halving and
    ///   logarithmic schedules keep decaying.
    /// * `inflation_period_years` - Length of the inflation period (only used by halving
    ///   schedules)
    ///
    /// # Returns
    ///
    /// The annual rate as a fraction (e.g. 0.15 for 15%)
    pub fn annual_rate(&self, t: f64, inflation_period_years: f64) -> ModelResult<Dimensionless> {
        debug_assert!(t >= 0.0, "Normalised time out of range: {t}");

        let rate = match self {
            Self::Linear(p) => p.max_rate.0 - (p.max_rate.0 - p.min_rate.0) * t.min(1.0),
            Self::Halving(p) => {
                check_positive(p.halving_period, "halving_period")?;
                let halvings = (t * inflation_period_years / p.halving_period.0).floor();
                p.initial_rate.0 / 2f64.powf(halvings)
            }
            Self::Logarithmic(p) => {
                check_positive(p.log_base, "log_base")?;
                p.log_scale.0 * (-t / p.log_base.0).exp()
            }
            Self::Exponential(p) => p.exp_scale.0 * (1.0 - t.min(1.0)).powf(p.decay_rate.0),
        };

        Ok(Dimensionless(rate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;
    use rstest::rstest;
    use strum::IntoEnumIterator;

    fn rate(schedule: &InflationSchedule, t: f64) -> f64 {
        schedule.annual_rate(t, 6.0).unwrap().value()
    }

    #[rstest]
    #[case("linear", ScheduleKind::Linear)]
    #[case("halving", ScheduleKind::Halving)]
    #[case(" logarithmic ", ScheduleKind::Logarithmic)]
    #[case("exponential", ScheduleKind::Exponential)]
    fn test_parse_kind(#[case] name: &str, #[case] expected: ScheduleKind) {
        assert_eq!(ScheduleKind::parse(name).unwrap(), expected);
    }

    #[test]
    fn test_parse_kind_unsupported() {
        assert_eq!(
            ScheduleKind::parse("sigmoid"),
            Err(ModelError::UnsupportedScheduleType("sigmoid".into()))
        );
    }

    #[test]
    fn test_kind_round_trip() {
        for kind in ScheduleKind::iter() {
            assert_eq!(ScheduleKind::parse(&kind.to_string()).unwrap(), kind);
            assert_eq!(InflationSchedule::preset(kind).kind(), kind);
            assert_eq!(InflationSchedule::with_defaults(kind).kind(), kind);
        }
    }

    #[test]
    fn test_presets_are_valid() {
        for kind in ScheduleKind::iter() {
            assert!(InflationSchedule::preset(kind).validate().is_ok());
            assert!(InflationSchedule::with_defaults(kind).validate().is_ok());
        }
    }

    #[test]
    fn test_linear_end_points() {
        let schedule = InflationSchedule::preset(ScheduleKind::Linear);
        assert_approx_eq!(f64, rate(&schedule, 0.0), 0.15);
        assert_approx_eq!(f64, rate(&schedule, 1.0), 0.02, epsilon = 1e-12);
    }

    #[test]
    fn test_linear_strictly_decreasing() {
        let schedule = InflationSchedule::preset(ScheduleKind::Linear);
        let rates: Vec<_> = (0..=100).map(|i| rate(&schedule, f64::from(i) / 100.0)).collect();
        assert!(rates.windows(2).all(|w| w[1] < w[0]));
    }

    #[rstest]
    #[case(0.0, 0.12)]
    #[case(0.2, 0.12)]
    #[case(1.0 / 3.0, 0.06)]
    #[case(0.5, 0.06)]
    #[case(2.0 / 3.0, 0.03)]
    #[case(1.0, 0.015)]
    fn test_halving(#[case] t: f64, #[case] expected: f64) {
        let schedule = InflationSchedule::preset(ScheduleKind::Halving);
        assert_approx_eq!(f64, rate(&schedule, t), expected);
    }

    #[rstest]
    #[case(0.0, 0.15)]
    #[case(0.3, 0.15 * (-1.0f64).exp())]
    #[case(0.6, 0.15 * (-2.0f64).exp())]
    fn test_logarithmic(#[case] t: f64, #[case] expected: f64) {
        let schedule = InflationSchedule::preset(ScheduleKind::Logarithmic);
        assert_approx_eq!(f64, rate(&schedule, t), expected, epsilon = 1e-12);
    }

    #[rstest]
    #[case(0.0, 0.15)]
    #[case(0.75, 0.15 * 0.125)]
    #[case(1.0, 0.0)]
    fn test_exponential(#[case] t: f64, #[case] expected: f64) {
        let schedule = InflationSchedule::preset(ScheduleKind::Exponential);
        assert_approx_eq!(f64, rate(&schedule, t), expected, epsilon = 1e-12);
    }

    #[rstest]
    #[case(InflationSchedule::preset(ScheduleKind::Linear), 0.02)]
    #[case(InflationSchedule::preset(ScheduleKind::Exponential), 0.0)]
    fn test_rate_held_after_period(#[case] schedule: InflationSchedule, #[case] expected: f64) {
        for t in [1.0, 1.5, 3.0] {
            assert_approx_eq!(f64, rate(&schedule, t), expected, epsilon = 1e-12);
        }
    }

    #[rstest]
    #[case(1.0, 0.12 / 4.0)]
    #[case(2.0, 0.12 / 16.0)]
    fn test_halving_after_period(#[case] t: f64, #[case] expected: f64) {
        let schedule = InflationSchedule::Halving(HalvingParams {
            initial_rate: Dimensionless(0.12),
            halving_period: Dimensionless(0.5),
        });
        // Four halvings per year
        assert_approx_eq!(f64, schedule.annual_rate(t, 1.0).unwrap().value(), expected);
    }

    #[test]
    fn test_logarithmic_after_period() {
        let schedule = InflationSchedule::preset(ScheduleKind::Logarithmic);
        assert_approx_eq!(
            f64,
            rate(&schedule, 2.0),
            0.15 * (-2.0f64 / 0.3).exp(),
            epsilon = 1e-15
        );
        assert!(rate(&schedule, 2.0) < rate(&schedule, 1.0));
    }

    #[test]
    fn test_defaults() {
        let schedule = InflationSchedule::with_defaults(ScheduleKind::Linear);
        assert_approx_eq!(f64, rate(&schedule, 0.0), 0.2);
        assert_approx_eq!(f64, rate(&schedule, 1.0), 0.01, epsilon = 1e-12);

        // One halving per year by default
        let schedule = InflationSchedule::with_defaults(ScheduleKind::Halving);
        assert_approx_eq!(f64, rate(&schedule, 0.5), 0.2 / 8.0);
    }

    #[rstest]
    #[case(
        InflationSchedule::Halving(HalvingParams {
            initial_rate: Dimensionless(0.1),
            halving_period: Dimensionless(0.0),
        }),
        "halving_period must be a finite number greater than zero"
    )]
    #[case(
        InflationSchedule::Logarithmic(LogarithmicParams {
            log_base: Dimensionless(-1.0),
            log_scale: Dimensionless(0.1),
        }),
        "log_base must be a finite number greater than zero"
    )]
    fn test_annual_rate_invalid(#[case] schedule: InflationSchedule, #[case] msg: &str) {
        let expected = Err(ModelError::InvalidParameter(msg.into()));
        assert_eq!(schedule.annual_rate(0.5, 6.0), expected);
        assert_eq!(schedule.validate(), expected.map(|_| ()));
    }

    #[rstest]
    #[case(
        InflationSchedule::Linear(LinearParams {
            max_rate: Dimensionless(0.1),
            min_rate: Dimensionless(-0.01),
        }),
        "min_rate must be a finite number greater than or equal to zero"
    )]
    #[case(
        InflationSchedule::Linear(LinearParams {
            max_rate: Dimensionless(f64::INFINITY),
            min_rate: Dimensionless(0.01),
        }),
        "max_rate must be a finite number greater than or equal to zero"
    )]
    #[case(
        InflationSchedule::Halving(HalvingParams {
            initial_rate: Dimensionless(f64::NAN),
            halving_period: Dimensionless(1.0),
        }),
        "initial_rate must be a finite number greater than or equal to zero"
    )]
    #[case(
        InflationSchedule::Exponential(ExponentialParams {
            decay_rate: Dimensionless(-2.0),
            exp_scale: Dimensionless(0.1),
        }),
        "decay_rate must be a finite number greater than or equal to zero"
    )]
    fn test_validate_invalid(#[case] schedule: InflationSchedule, #[case] msg: &str) {
        assert_eq!(
            schedule.validate(),
            Err(ModelError::InvalidParameter(msg.into()))
        );
    }
}
