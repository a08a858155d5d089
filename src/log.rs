//! Logging for tokensim, built on `fern`.
//!
//! Informational messages go to stdout alongside the summary table, while warnings (e.g. skipped
//! scenarios) and errors go to stderr so they never end up in CSV output piped to a file.
use anyhow::{Context, Result};
use chrono::Local;
use fern::Dispatch;
use fern::colors::{Color, ColoredLevelConfig};
use log::{Level, LevelFilter};
use std::env;
use std::io::IsTerminal;
use std::str::FromStr;
use std::sync::OnceLock;

/// A flag indicating whether the logger has been initialised
static LOGGER_INIT: OnceLock<()> = OnceLock::new();

/// The log level used if neither the environment nor the settings file specify one
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// The environment variable used to override the log level
const LOG_LEVEL_ENV_VAR: &str = "TOKENSIM_LOG_LEVEL";

/// Setting this environment variable (to anything) disables coloured output
const NO_COLOUR_ENV_VAR: &str = "NO_COLOR";

/// Whether the program logger has been initialised
pub fn is_logger_initialised() -> bool {
    LOGGER_INIT.get().is_some()
}

/// Convert a log level name (`off`, `error`, `warn`, `info`, `debug` or `trace`) into a
/// [`LevelFilter`]. Case is ignored.
pub fn parse_log_level(log_level: &str) -> Result<LevelFilter> {
    LevelFilter::from_str(log_level.trim())
        .ok()
        .with_context(|| format!("Unknown log level: {log_level}"))
}

/// Choose the log level, giving the environment variable precedence over the settings file
fn resolve_log_level(
    from_env: Option<String>,
    from_settings: Option<&str>,
) -> Result<LevelFilter> {
    let name = from_env
        .as_deref()
        .or(from_settings)
        .unwrap_or(DEFAULT_LOG_LEVEL);
    parse_log_level(name)
}

/// A dispatcher writing to one output stream, colouring level names if `use_colour` is set
fn stream_dispatch(use_colour: bool) -> Dispatch {
    let colours = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Blue)
        .trace(Color::Magenta);

    Dispatch::new().format(move |out, message, record| {
        let timestamp = Local::now().format("%H:%M:%S");
        let target = record.target();
        if use_colour {
            let level = colours.color(record.level());
            out.finish(format_args!("[{timestamp} {level} {target}] {message}"));
        } else {
            let level = record.level();
            out.finish(format_args!("[{timestamp} {level} {target}] {message}"));
        }
    })
}

/// Initialise the program logger.
///
/// The level is taken from the `TOKENSIM_LOG_LEVEL` environment variable if set, otherwise from
/// `log_level_from_settings`, otherwise [`DEFAULT_LOG_LEVEL`]. Colour is used for terminals unless
/// `NO_COLOR` is set.
///
/// Fails if the level is not recognised or if a logger has already been set.
pub fn init(log_level_from_settings: Option<&str>) -> Result<()> {
    let log_level = resolve_log_level(env::var(LOG_LEVEL_ENV_VAR).ok(), log_level_from_settings)?;
    let allow_colour = env::var_os(NO_COLOUR_ENV_VAR).is_none();

    let stdout = stream_dispatch(allow_colour && std::io::stdout().is_terminal())
        .filter(|metadata| metadata.level() > Level::Warn)
        .level(log_level)
        .chain(std::io::stdout());
    let stderr = stream_dispatch(allow_colour && std::io::stderr().is_terminal())
        .level(log_level.min(LevelFilter::Warn))
        .chain(std::io::stderr());

    Dispatch::new()
        .chain(stdout)
        .chain(stderr)
        .apply()
        .context("Logger already initialised")?;

    LOGGER_INIT.get_or_init(|| ());

    Ok(())
}
