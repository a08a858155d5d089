//! Code for running a batch of price scenarios against the same model.
use crate::config::TokenomicsConfig;
use crate::error::ModelResult;
use crate::scenario::PriceScenario;
use crate::schedule::InflationSchedule;
use crate::simulation::{DEFAULT_HORIZON_DAYS, EmissionModel, ModelResults};
use log::{debug, warn};
use rayon::prelude::*;
use std::sync::atomic::{AtomicU64, Ordering};

/// Simulate every scenario in parallel, returning results in the same order as `scenarios`.
///
/// A scenario which cannot be simulated is skipped with a warning. Errors which would affect every
/// scenario (i.e. problems with the config or schedule) abort the whole batch.
pub fn run_scenarios(
    model: &EmissionModel,
    scenarios: &[PriceScenario],
    horizon_days: u32,
) -> ModelResult<Vec<ModelResults>> {
    let outcomes: Vec<_> = scenarios
        .par_iter()
        .map(|scenario| model.simulate(scenario, horizon_days))
        .collect();

    let mut results = Vec::with_capacity(outcomes.len());
    for (scenario, outcome) in scenarios.iter().zip(outcomes) {
        match outcome {
            Ok(result) => results.push(result),
            Err(err) if err.is_scenario_specific() => {
                warn!("Skipping scenario '{}': {err}", scenario.name);
            }
            Err(err) => return Err(err),
        }
    }

    Ok(results)
}

/// Simulate every scenario over [`DEFAULT_HORIZON_DAYS`].
///
/// See [`run_scenarios`] for how errors are handled.
pub fn run_all(
    config: &TokenomicsConfig,
    schedule: &InflationSchedule,
    scenarios: &[PriceScenario],
) -> ModelResult<Vec<ModelResults>> {
    let model = EmissionModel::new(*config, *schedule)?;
    run_scenarios(&model, scenarios, DEFAULT_HORIZON_DAYS)
}

/// Identifies a batch of scenario runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(pub u64);

/// The results of a batch which was still current when it finished
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    /// The generation the batch was started with
    pub generation: Generation,
    /// Results for each valid scenario, in input order
    pub results: Vec<ModelResults>,
}

/// Runs batches of scenarios, discarding any batch superseded while it was being computed.
///
/// Each call to [`ScenarioRunner::next_generation`] (including the one made by
/// [`ScenarioRunner::run`]) invalidates all batches started before it.
#[derive(Debug, Default)]
pub struct ScenarioRunner {
    latest: AtomicU64,
}

impl ScenarioRunner {
    /// Create a new runner
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new generation, making all earlier ones stale
    pub fn next_generation(&self) -> Generation {
        Generation(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether no newer generation has been started since `generation`
    pub fn is_current(&self, generation: Generation) -> bool {
        self.latest.load(Ordering::SeqCst) == generation.0
    }

    /// Run a batch in a new generation.
    ///
    /// Returns `None` if another batch was started before this one finished.
    pub fn run(
        &self,
        model: &EmissionModel,
        scenarios: &[PriceScenario],
        horizon_days: u32,
    ) -> ModelResult<Option<Batch>> {
        let generation = self.next_generation();
        self.run_for_generation(generation, model, scenarios, horizon_days)
    }

    /// Run a batch for a generation obtained from [`ScenarioRunner::next_generation`]
    pub fn run_for_generation(
        &self,
        generation: Generation,
        model: &EmissionModel,
        scenarios: &[PriceScenario],
        horizon_days: u32,
    ) -> ModelResult<Option<Batch>> {
        let results = run_scenarios(model, scenarios, horizon_days)?;

        if !self.is_current(generation) {
            debug!("Discarding results for stale generation {}", generation.0);
            return Ok(None);
        }

        Ok(Some(Batch {
            generation,
            results,
        }))
    }
}
