//! Scenario files for the Surfer simulator.
//!
//! Loads run configurations from RON, TOML or JSON and resolves them into a
//! validated [`surfer_core::config::SimConfig`] and
//! [`surfer_core::pipeline::Pipeline`].

pub mod loader;
pub mod schema;

pub use loader::{DataLoadError, load_scenario, load_scenario_dir};
pub use schema::{ModelOverrides, ResolvedScenario, ScenarioFile};
