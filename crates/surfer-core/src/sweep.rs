//! Independent runs over many configurations.
//!
//! Each scenario gets its own [`SimRng`] seeded from the scenario, and runs
//! share nothing mutable. A scenario may bring its own [`Pipeline`]; the
//! rest use the one the sweep was given. With the `parallel` feature the
//! runs are spread over the rayon thread pool; results always come back in
//! input order.

use std::sync::Arc;

use crate::config::SimConfig;
use crate::driver::run_with;
use crate::error::SimError;
use crate::log_sink::LogCrateSink;
use crate::pipeline::Pipeline;
use crate::rng::SimRng;
use crate::trajectory::Trajectory;

/// One configuration to run, with the seed for its random source.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: String,
    pub config: SimConfig,
    pub seed: u64,
    /// Sub-models for this scenario only. `None` uses the sweep's pipeline.
    pub pipeline: Option<Arc<Pipeline>>,
}

impl Scenario {
    pub fn new(name: impl Into<String>, config: SimConfig, seed: u64) -> Self {
        Self {
            name: name.into(),
            config,
            seed,
            pipeline: None,
        }
    }

    /// Run this scenario through its own sub-models.
    pub fn with_pipeline(mut self, pipeline: Arc<Pipeline>) -> Self {
        self.pipeline = Some(pipeline);
        self
    }
}

/// Outcome of one scenario in a sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepResult {
    pub name: String,
    pub seed: u64,
    pub outcome: Result<Trajectory, SimError>,
}

/// Run every scenario, using the default sub-models where a scenario has
/// none of its own.
pub fn run_sweep(scenarios: &[Scenario]) -> Vec<SweepResult> {
    run_sweep_with(&Pipeline::default(), scenarios)
}

/// Run every scenario through its own pipeline, or `pipeline` if it has
/// none. Debug messages go to the `log` facade.
pub fn run_sweep_with(pipeline: &Pipeline, scenarios: &[Scenario]) -> Vec<SweepResult> {
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;

        scenarios
            .par_iter()
            .map(|scenario| run_one(pipeline, scenario))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        scenarios
            .iter()
            .map(|scenario| run_one(pipeline, scenario))
            .collect()
    }
}

fn run_one(fallback: &Pipeline, scenario: &Scenario) -> SweepResult {
    let pipeline = scenario.pipeline.as_deref().unwrap_or(fallback);
    let mut rng = SimRng::new(scenario.seed);
    let outcome = run_with(&scenario.config, pipeline, &mut rng, &mut LogCrateSink);
    SweepResult {
        name: scenario.name.clone(),
        seed: scenario.seed,
        outcome,
    }
}
