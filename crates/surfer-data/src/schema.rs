//! Serde data file structs for simulation scenarios.
//!
//! A scenario file names a run: dates, step interval, route, and optional
//! overrides for sub-model parameters. Every field is optional; anything
//! missing falls back to the engine defaults. Resolution turns the file into
//! a validated [`SimConfig`] plus the [`Pipeline`] that should run it.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use surfer_core::config::{DEFAULT_HORIZON_WEEKS, SimConfig};
use surfer_core::geodesy::LatLng;
use surfer_core::movement::PowerThresholdMovement;
use surfer_core::pipeline::Pipeline;
use surfer_core::quantity::{Quantity, units};
use surfer_core::sea::ConstantCurrent;
use surfer_core::solar::SinusoidalSun;
use surfer_core::sweep::Scenario;

use crate::loader::DataLoadError;

/// Seed used when a scenario file does not set one.
pub const DEFAULT_SEED: u64 = 0;

// ===========================================================================
// On-disk format
// ===========================================================================

/// A scenario as written in a RON, TOML or JSON file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScenarioFile {
    /// Display name. Defaults to the file stem.
    pub name: Option<String>,
    /// RFC 3339 timestamp. Defaults to now.
    pub date_start: Option<String>,
    /// A time quantity such as `"1 h"` or `"30 min"`.
    pub date_delta: Option<String>,
    /// RFC 3339 timestamp. Defaults to ten weeks after `date_start`.
    pub date_max: Option<String>,
    pub loc_start: Option<LatLng>,
    pub loc_end: Option<LatLng>,
    pub debug: Option<bool>,
    pub seed: Option<u64>,
    pub models: ModelOverrides,
}

/// Sub-model parameters a scenario may override.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelOverrides {
    /// A speed quantity such as `"0.2 m/s"` or `"0.5 kn"`.
    pub sea_current_speed: Option<String>,
    /// An angle quantity such as `"230 deg"`.
    pub sea_current_bearing: Option<String>,
    /// Chance of a storm per coasting step, in `[0, 1]`.
    pub storm_probability: Option<f64>,
    /// Hours east of UTC used to read the hour of day for solar output.
    pub solar_utc_offset_hours: Option<f64>,
}

// ===========================================================================
// Resolved form
// ===========================================================================

/// A scenario ready to run.
#[derive(Debug)]
pub struct ResolvedScenario {
    pub name: String,
    pub config: SimConfig,
    pub seed: u64,
    /// Default sub-models with the file's overrides applied.
    pub pipeline: Arc<Pipeline>,
}

impl ResolvedScenario {
    /// The scenario as a sweep entry, overrides included.
    pub fn to_sweep_scenario(&self) -> Scenario {
        Scenario::new(self.name.clone(), self.config.clone(), self.seed)
            .with_pipeline(Arc::clone(&self.pipeline))
    }
}

impl ScenarioFile {
    /// Resolve into a validated configuration and pipeline. `fallback_name`
    /// is used when the file does not name itself.
    pub fn resolve(&self, fallback_name: &str) -> Result<ResolvedScenario, DataLoadError> {
        let date_start = match &self.date_start {
            Some(raw) => parse_date("date_start", raw)?,
            None => Utc::now(),
        };
        let mut config = SimConfig::starting_at(date_start);
        if let Some(raw) = &self.date_delta {
            config.date_delta = parse_delta("date_delta", raw)?;
        }
        config.date_max = match &self.date_max {
            Some(raw) => parse_date("date_max", raw)?,
            None => date_start + TimeDelta::weeks(DEFAULT_HORIZON_WEEKS),
        };
        if let Some(loc) = self.loc_start {
            config.loc_start = loc;
        }
        if let Some(loc) = self.loc_end {
            config.loc_end = loc;
        }
        if let Some(debug) = self.debug {
            config.debug = debug;
        }
        config.validate()?;

        Ok(ResolvedScenario {
            name: self
                .name
                .clone()
                .unwrap_or_else(|| fallback_name.to_string()),
            config,
            seed: self.seed.unwrap_or(DEFAULT_SEED),
            pipeline: Arc::new(self.models.pipeline()?),
        })
    }
}

impl ModelOverrides {
    /// The default pipeline with these overrides applied.
    pub fn pipeline(&self) -> Result<Pipeline, DataLoadError> {
        let mut pipeline = Pipeline::default();

        if self.sea_current_speed.is_some() || self.sea_current_bearing.is_some() {
            let defaults = ConstantCurrent::default().current;
            let speed = match &self.sea_current_speed {
                Some(raw) => parse_quantity("sea_current_speed", raw)?,
                None => defaults.magnitude,
            };
            let bearing = match &self.sea_current_bearing {
                Some(raw) => parse_quantity("sea_current_bearing", raw)?,
                None => defaults.direction,
            };
            pipeline = pipeline.with_sea(ConstantCurrent::new(speed, bearing)?);
        }

        if let Some(p) = self.storm_probability {
            if !(0.0..=1.0).contains(&p) {
                return Err(DataLoadError::OutOfRange {
                    field: "storm_probability",
                    value: p,
                });
            }
            pipeline = pipeline.with_movement(PowerThresholdMovement::default().with_storm_probability(p));
        }

        if let Some(hours) = self.solar_utc_offset_hours {
            let offset = FixedOffset::east_opt((hours * 3600.0).round() as i32).ok_or(
                DataLoadError::OutOfRange {
                    field: "solar_utc_offset_hours",
                    value: hours,
                },
            )?;
            pipeline = pipeline.with_solar(SinusoidalSun::default().with_utc_offset(offset));
        }

        Ok(pipeline)
    }
}

// ===========================================================================
// Field parsers
// ===========================================================================

fn parse_date(field: &'static str, raw: &str) -> Result<DateTime<Utc>, DataLoadError> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|d| d.with_timezone(&Utc))
        .map_err(|_| DataLoadError::InvalidDate {
            field,
            value: raw.to_string(),
        })
}

fn parse_quantity(field: &'static str, raw: &str) -> Result<Quantity, DataLoadError> {
    raw.parse::<Quantity>()
        .map_err(|e| DataLoadError::Quantity {
            field,
            detail: e.to_string(),
        })
}

/// Parse a time quantity into a step interval, rounded to the millisecond.
fn parse_delta(field: &'static str, raw: &str) -> Result<TimeDelta, DataLoadError> {
    let ms = parse_quantity(field, raw)?
        .value_in(&units::MILLISECOND)
        .map_err(|e| DataLoadError::Quantity {
            field,
            detail: e.to_string(),
        })?;
    let out_of_range = DataLoadError::OutOfRange { field, value: ms };
    if !ms.is_finite() || ms.abs() >= i64::MAX as f64 {
        return Err(out_of_range);
    }
    TimeDelta::try_milliseconds(ms.round() as i64).ok_or(out_of_range)
}
