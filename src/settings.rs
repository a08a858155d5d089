//! Code for loading program settings.
use crate::get_tokensim_config_dir;
use crate::input::{input_err_msg, read_toml};
use crate::log::{DEFAULT_LOG_LEVEL, parse_log_level};
use crate::simulation::DEFAULT_HORIZON_DAYS;
use anyhow::{Context, Result, ensure};
use documented::DocumentedFields;
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::path::{Path, PathBuf};

const SETTINGS_FILE_NAME: &str = "settings.toml";

const DEFAULT_SETTINGS_FILE_HEADER: &str = "# This file contains the program settings for tokensim
";

/// Default log level for program
fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

/// Default number of days to simulate
fn default_horizon_days() -> u32 {
    DEFAULT_HORIZON_DAYS
}

/// Get the path to where the settings file will be read from
pub fn get_settings_file_path() -> PathBuf {
    let mut path = get_tokensim_config_dir();
    path.push(SETTINGS_FILE_NAME);

    path
}

/// Program settings from config file
#[derive(Debug, DocumentedFields, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// The default program log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Number of days to simulate when a model does not specify its own horizon
    #[serde(default = "default_horizon_days")]
    pub default_horizon_days: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            default_horizon_days: default_horizon_days(),
        }
    }
}

impl Settings {
    /// Read the settings file from the program's config directory.
    ///
    /// If the file is not present, default values are used.
    pub fn load() -> Result<Settings> {
        Self::load_from_path(&get_settings_file_path())
    }

    /// Read and check settings from the specified path, falling back to defaults if the file
    /// doesn't exist
    pub fn load_from_path(file_path: &Path) -> Result<Settings> {
        if !file_path.is_file() {
            return Ok(Settings::default());
        }

        let settings: Settings = read_toml(file_path)?;
        settings
            .validate()
            .with_context(|| input_err_msg(file_path))?;

        Ok(settings)
    }

    /// Check that the settings can be used
    pub fn validate(&self) -> Result<()> {
        parse_log_level(&self.log_level)?;
        ensure!(
            self.default_horizon_days > 0,
            "default_horizon_days must be greater than zero"
        );

        Ok(())
    }

    /// The contents of the default settings file.
    ///
    /// Every setting is commented out, preceded by its documentation.
    pub fn default_file_contents() -> String {
        let defaults =
            toml::Value::try_from(Settings::default()).expect("Could not convert settings to TOML");
        let fields = defaults.as_table().expect("Settings are not a TOML table");

        let mut out = DEFAULT_SETTINGS_FILE_HEADER.to_string();
        for (field, value) in fields {
            let docs = Settings::get_field_docs(field).expect("Missing doc comment for field");
            for line in docs.lines() {
                write!(&mut out, "\n# # {}\n", line.trim()).unwrap();
            }
            writeln!(&mut out, "# {field} = {value}").unwrap();
        }

        out
    }
}
