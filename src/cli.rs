//! The command line interface for the simulator.
use crate::log;
use crate::metrics::{DEFAULT_UNIT_COST_PER_HOUR, ScenarioSummary, check_unit_cost};
use crate::model::Model;
use crate::output::{write_emissions_csv, write_summary_table};
use crate::runner::ScenarioRunner;
use crate::settings::Settings;
use crate::units::MoneyPerHour;
use ::log::{info, warn};
use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

pub mod example;
use example::ExampleSubcommands;
pub mod settings;
use settings::SettingsSubcommands;

/// The command line interface for the simulator.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// The available commands.
    #[command(subcommand)]
    command: Option<Commands>,
    /// Flag to provide the CLI docs as markdown
    #[arg(long, hide = true)]
    markdown_help: bool,
}

/// Options for the run command
#[derive(Args, Clone, Default)]
pub struct RunOpts {
    /// Number of days to simulate (overrides the model file and settings)
    #[arg(long)]
    pub horizon_days: Option<u32>,
    /// Seed for generating the demo price scenarios
    #[arg(long)]
    pub seed: Option<u64>,
    /// Write the daily results as CSV to stdout
    #[arg(long)]
    pub csv: bool,
    /// Hourly cost of one hardware unit, used to calculate hardware capacity
    #[arg(long)]
    pub unit_cost_per_hour: Option<f64>,
}

/// The available commands.
#[derive(Subcommand)]
enum Commands {
    /// Run a simulation model.
    Run {
        /// Path to the model directory.
        model_dir: PathBuf,
        /// Other run options
        #[command(flatten)]
        opts: RunOpts,
    },
    /// Manage example models.
    Example {
        /// The available subcommands for managing example models.
        #[command(subcommand)]
        subcommand: ExampleSubcommands,
    },
    /// Validate a model.
    Validate {
        /// The path to the model directory.
        model_dir: PathBuf,
    },
    /// Manage settings file.
    Settings {
        /// The subcommands for managing the settings file.
        #[command(subcommand)]
        subcommand: SettingsSubcommands,
    },
}

impl Commands {
    /// Execute the supplied CLI command
    fn execute(self) -> Result<()> {
        match self {
            Self::Run { model_dir, opts } => handle_run_command(&model_dir, &opts, None),
            Self::Example { subcommand } => subcommand.execute(),
            Self::Validate { model_dir } => handle_validate_command(&model_dir, None),
            Self::Settings { subcommand } => subcommand.execute(),
        }
    }
}

/// Parse CLI arguments and start tokensim
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    // Invoked as: `$ tokensim --markdown-help`
    if cli.markdown_help {
        clap_markdown::print_help_markdown::<Cli>();
        return Ok(());
    }

    let Some(command) = cli.command else {
        let help_str = Cli::command().render_long_help().to_string();
        println!("{help_str}");
        return Ok(());
    };

    command.execute()
}

/// Load program settings, if not provided
fn load_settings(settings: Option<Settings>) -> Result<Settings> {
    match settings {
        Some(settings) => Ok(settings),
        None => Settings::load().context("Failed to load settings."),
    }
}

/// Handle the `run` command.
pub fn handle_run_command(
    model_path: &Path,
    opts: &RunOpts,
    settings: Option<Settings>,
) -> Result<()> {
    let settings = load_settings(settings)?;

    // Initialise program logger
    log::init(Some(&settings.log_level)).context("Failed to initialise logging.")?;

    // Load the model to run
    let model = Model::from_path(model_path).context("Failed to load model.")?;
    info!("Loaded model from {}", model_path.display());

    if opts.seed.is_some() && model.has_explicit_scenarios() {
        warn!("Model provides its own price scenarios; --seed will be ignored");
    }

    // The horizon can be set on the command line, in the model file or in the settings
    let horizon_days = opts
        .horizon_days
        .or(model.horizon_days)
        .unwrap_or(settings.default_horizon_days);
    let unit_cost_per_hour = opts
        .unit_cost_per_hour
        .map_or(DEFAULT_UNIT_COST_PER_HOUR, MoneyPerHour);
    check_unit_cost(unit_cost_per_hour)?;

    let emission_model = model.emission_model()?;
    let scenarios = model.price_scenarios(opts.seed);
    info!(
        "Simulating {} scenario(s) over {horizon_days} days with a {} schedule",
        scenarios.len(),
        model.schedule.kind()
    );

    let runner = ScenarioRunner::new();
    let batch = runner
        .run(&emission_model, &scenarios, horizon_days)?
        .context("Simulation results were superseded")?;

    let summaries: Vec<_> = batch
        .results
        .iter()
        .map(|results| ScenarioSummary::new(results, &model.config))
        .collect();

    let mut stdout = io::stdout().lock();
    if opts.csv {
        write_emissions_csv(&mut stdout, &batch.results, unit_cost_per_hour)?;
    } else {
        write_summary_table(&mut stdout, &summaries)?;
    }
    stdout.flush()?;
    info!("Simulation complete!");

    Ok(())
}

/// Handle the `validate` command.
pub fn handle_validate_command(model_path: &Path, settings: Option<Settings>) -> Result<()> {
    let settings = load_settings(settings)?;

    // Initialise program logger
    log::init(Some(&settings.log_level)).context("Failed to initialise logging.")?;

    // Load/validate the model
    Model::from_path(model_path).context("Failed to validate model.")?;
    info!("Model validation successful!");

    Ok(())
}
