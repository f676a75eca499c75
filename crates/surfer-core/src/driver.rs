//! The simulation driver.
//!
//! A run is a single call: validate the configuration, seed step 0 from it,
//! then ask the [`Pipeline`] for the next step until a step's date reaches
//! `date_max`. Nothing survives between calls, so the same [`Planner`] can
//! be started any number of times.

use crate::config::SimConfig;
use crate::error::SimError;
use crate::log_sink::LogSink;
use crate::pipeline::Pipeline;
use crate::rng::RandomSource;
use crate::step::Step;
use crate::trajectory::Trajectory;

/// Upper bound on the trajectory's up-front allocation.
const MAX_PREALLOCATED_STEPS: u64 = 1 << 16;

/// A configuration paired with the sub-models that simulate it.
#[derive(Debug)]
pub struct Planner {
    config: SimConfig,
    pipeline: Pipeline,
}

impl Planner {
    /// A planner using the default sub-models.
    pub fn new(config: SimConfig) -> Self {
        Self {
            config,
            pipeline: Pipeline::default(),
        }
    }

    /// Swap in custom sub-models.
    pub fn with_pipeline(mut self, pipeline: Pipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Run the simulation from step 0 to `date_max`.
    ///
    /// Returns either the complete trajectory or the first error; partial
    /// trajectories are never returned. Configuration errors are reported
    /// before any step is computed.
    pub fn start(
        &self,
        rng: &mut dyn RandomSource,
        logger: &mut dyn LogSink,
    ) -> Result<Trajectory, SimError> {
        run_with(&self.config, &self.pipeline, rng, logger)
    }
}

/// Run `config` with the default sub-models.
pub fn run(
    config: &SimConfig,
    rng: &mut dyn RandomSource,
    logger: &mut dyn LogSink,
) -> Result<Trajectory, SimError> {
    run_with(config, &Pipeline::default(), rng, logger)
}

/// Run `config` through `pipeline`.
pub fn run_with(
    config: &SimConfig,
    pipeline: &Pipeline,
    rng: &mut dyn RandomSource,
    logger: &mut dyn LogSink,
) -> Result<Trajectory, SimError> {
    config.validate()?;

    if config.debug {
        logger.log(&format!(
            "planning route {} -> {} from {} until {}, {} s per step",
            config.loc_start,
            config.loc_end,
            config.date_start.to_rfc3339(),
            config.date_max.to_rfc3339(),
            config.delta_seconds(),
        ));
    }

    let capacity = config.expected_steps().min(MAX_PREALLOCATED_STEPS) as usize;
    let mut trajectory = Trajectory::with_capacity(capacity);
    let mut previous = Step::origin(config);

    while previous.date < config.date_max {
        if config.debug {
            logger.log(&format!(
                "calculating step {} after {}",
                previous.step + 1,
                previous.date.to_rfc3339(),
            ));
        }
        let next = pipeline.calculate(&previous, config, rng)?;
        trajectory.push(next.clone());
        previous = next;
    }

    if config.debug {
        logger.log(&format!(
            "planning complete: {} steps, {:.1} from start, {} storms",
            trajectory.len(),
            previous.distance_from_start,
            trajectory.storm_count(),
        ));
    }

    Ok(trajectory)
}
