//! Integration tests for the `run` command.
use std::path::PathBuf;
use tokensim::cli::{RunOpts, handle_run_command};
use tokensim::settings::Settings;

/// Get the path to the example model.
fn get_model_dir() -> PathBuf {
    PathBuf::from("demos/linear")
}

/// An integration test for the `run` command.
#[test]
fn test_handle_run_command() {
    unsafe { std::env::set_var("TOKENSIM_LOG_LEVEL", "off") };

    let opts = RunOpts {
        horizon_days: Some(90),
        seed: Some(1),
        ..RunOpts::default()
    };
    handle_run_command(&get_model_dir(), &opts, Some(Settings::default())).unwrap();

    // Second time will fail because the logging is already initialised
    assert_eq!(
        handle_run_command(&get_model_dir(), &opts, Some(Settings::default()))
            .unwrap_err()
            .chain()
            .next()
            .unwrap()
            .to_string(),
        "Failed to initialise logging."
    );
}
