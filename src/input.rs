//! Common routines for handling input data.
use crate::error::{ModelError, ModelResult};
use crate::schedule::{InflationSchedule, ScheduleKind};
use anyhow::{Context, Result};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

/// Format an error message to include the file path. To be used with `anyhow::Context`.
pub fn input_err_msg<P: AsRef<Path>>(file_path: P) -> String {
    format!("Error reading {}", file_path.as_ref().display())
}

/// Parse a TOML file at the specified path.
///
/// # Arguments
///
/// * `file_path` - Path to the TOML file
///
/// # Returns
///
/// * The deserialised TOML data or an error if the file could not be read or parsed.
pub fn read_toml<T: DeserializeOwned>(file_path: &Path) -> Result<T> {
    let toml_str = fs::read_to_string(file_path).with_context(|| input_err_msg(file_path))?;
    let toml_data = toml::from_str(&toml_str).with_context(|| input_err_msg(file_path))?;
    Ok(toml_data)
}

/// An inflation schedule as it appears in an input file, before its type has been checked
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScheduleInput {
    /// The name of the schedule type
    #[serde(rename = "type")]
    pub kind: String,
    /// All other keys, which are the parameters for this type of schedule
    #[serde(flatten)]
    pub parameters: toml::Table,
}

/// Deserialise the parameters for a particular kind of schedule
fn parse_params<T: DeserializeOwned>(
    kind: ScheduleKind,
    parameters: toml::Table,
) -> ModelResult<T> {
    toml::Value::Table(parameters)
        .try_into()
        .map_err(|err| ModelError::InvalidParameter(format!("{kind} schedule: {err}")))
}

impl ScheduleInput {
    /// Convert into a typed [`InflationSchedule`], checking the type and parameters.
    ///
    /// Parameters which are not provided take their default values.
    pub fn into_schedule(self) -> ModelResult<InflationSchedule> {
        let kind = ScheduleKind::parse(&self.kind)?;
        let schedule = match kind {
            ScheduleKind::Linear => InflationSchedule::Linear(parse_params(kind, self.parameters)?),
            ScheduleKind::Halving => {
                InflationSchedule::Halving(parse_params(kind, self.parameters)?)
            }
            ScheduleKind::Logarithmic => {
                InflationSchedule::Logarithmic(parse_params(kind, self.parameters)?)
            }
            ScheduleKind::Exponential => {
                InflationSchedule::Exponential(parse_params(kind, self.parameters)?)
            }
        };
        schedule.validate()?;

        Ok(schedule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{ExponentialParams, HalvingParams, LinearParams, LogarithmicParams};
    use crate::units::Dimensionless;
    use rstest::rstest;
    use serde::Deserialize;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Record {
        id: String,
        value: u32,
    }

    #[test]
    fn test_read_toml() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test.toml");
        {
            let mut file = File::create(&file_path).unwrap();
            writeln!(file, "id = \"hello\"\nvalue = 1").unwrap();
        }

        assert_eq!(
            read_toml::<Record>(&file_path).unwrap(),
            Record {
                id: "hello".to_string(),
                value: 1,
            }
        );

        {
            let mut file = File::create(&file_path).unwrap();
            writeln!(file, "bad toml syntax").unwrap();
        }

        assert!(read_toml::<Record>(&file_path).is_err());
    }

    #[test]
    fn test_read_toml_missing_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("missing.toml");
        let err = read_toml::<Record>(&file_path).unwrap_err();
        assert_eq!(err.to_string(), input_err_msg(&file_path));
    }

    fn schedule_input(toml_str: &str) -> ScheduleInput {
        toml::from_str(toml_str).unwrap()
    }

    #[rstest]
    #[case(
        "type = \"linear\"\nmax_rate = 0.15\nmin_rate = 0.02",
        InflationSchedule::Linear(LinearParams {
            max_rate: Dimensionless(0.15),
            min_rate: Dimensionless(0.02),
        })
    )]
    #[case(
        "type = \"halving\"\ninitial_rate = 0.12\nhalving_period = 2",
        InflationSchedule::Halving(HalvingParams {
            initial_rate: Dimensionless(0.12),
            halving_period: Dimensionless(2.0),
        })
    )]
    #[case(
        "type = \"logarithmic\"",
        InflationSchedule::Logarithmic(LogarithmicParams::default())
    )]
    #[case(
        "type = \"exponential\"\ndecay_rate = 1.5",
        InflationSchedule::Exponential(ExponentialParams {
            decay_rate: Dimensionless(1.5),
            ..ExponentialParams::default()
        })
    )]
    fn test_into_schedule(#[case] toml_str: &str, #[case] expected: InflationSchedule) {
        assert_eq!(schedule_input(toml_str).into_schedule().unwrap(), expected);
    }

    #[test]
    fn test_into_schedule_unsupported() {
        assert_eq!(
            schedule_input("type = \"sigmoid\"").into_schedule(),
            Err(ModelError::UnsupportedScheduleType("sigmoid".into()))
        );
    }

    #[rstest]
    #[case("type = \"linear\"\nmax_rat = 0.15")] // Typo in parameter name
    #[case("type = \"halving\"\nhalving_period = 0")]
    #[case("type = \"logarithmic\"\nlog_base = \"big\"")]
    fn test_into_schedule_invalid_parameter(#[case] toml_str: &str) {
        assert!(matches!(
            schedule_input(toml_str).into_schedule(),
            Err(ModelError::InvalidParameter(_))
        ));
    }
}
