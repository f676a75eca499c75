//! Surfer Core -- step simulator for a solar-powered surface vehicle.
//!
//! Given a start date, a step interval, a time bound and a route, the engine
//! produces the vehicle's full trajectory: solar output, electrical state,
//! sea current, thrust, velocity and position at every step.
//!
//! # Step Pipeline
//!
//! Each call to [`pipeline::Pipeline::calculate`] builds step `n + 1` from
//! step `n` through six sub-models, in order:
//!
//! 1. **Solar** -- panel power and voltage from the hour of day.
//! 2. **Battery** -- bus voltage from the solar output.
//! 3. **Sea** -- current vector acting on the hull.
//! 4. **Drag** -- optional drag force.
//! 5. **Thrust** -- thruster force proportional to solar power.
//! 6. **Movement** -- velocity (coasting or powered), new position and
//!    distance from start.
//!
//! Every physical value is a [`quantity::Quantity`]; mixing incompatible
//! dimensions is an error, never a silent coercion.
//!
//! # Running
//!
//! ```rust,ignore
//! let config = SimConfig::starting_at(start).with_route(from, to);
//! let trajectory = driver::run(&config, &mut SimRng::new(42), &mut LogCrateSink)?;
//! ```
//!
//! The only randomness is the storm draw, taken from the injected
//! [`rng::RandomSource`]; the same configuration and source sequence always
//! produce the same trajectory.
//!
//! # Key Types
//!
//! - [`driver::Planner`] -- Configuration plus sub-models; `start()` runs.
//! - [`config::SimConfig`] -- Dates, step interval, route and debug flag.
//! - [`step::Step`] -- One instant's full physical state.
//! - [`trajectory::Trajectory`] -- Ordered steps with hashing and snapshots.
//! - [`geodesy`] -- Spherical heading, offset and distance.
//! - [`sweep`] -- Independent runs over many scenarios.

pub mod battery;
pub mod config;
pub mod drag;
pub mod driver;
pub mod error;
pub mod geodesy;
pub mod log_sink;
pub mod movement;
pub mod pipeline;
pub mod quantity;
pub mod rng;
pub mod sea;
pub mod solar;
pub mod step;
pub mod sweep;
pub mod thrust;
pub mod trajectory;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::SimConfig;
pub use driver::{Planner, run, run_with};
pub use error::SimError;
pub use log_sink::{LogCrateSink, LogSink, NullSink};
pub use pipeline::Pipeline;
pub use quantity::{Quantity, Unit, UnitMismatch, units};
pub use rng::{FixedSequence, RandomSource, SimRng};
pub use step::{Step, StepContext, VectorQuantity};
pub use trajectory::Trajectory;
