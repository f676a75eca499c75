//! Fixtures for runs: fixed dates, short equator routes, scripted weather,
//! and a logger that remembers what it was told.
//!
//! Compiled for unit tests and, through the `test-utils` feature, for the
//! integration tests and benches.

use chrono::{DateTime, TimeDelta, TimeZone, Utc};

use crate::config::SimConfig;
use crate::geodesy::LatLng;
use crate::log_sink::LogSink;
use crate::rng::FixedSequence;

// ===========================================================================
// Dates and routes
// ===========================================================================

/// Noon UTC on 2024-06-01.
pub fn noon() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

/// Midnight UTC on 2024-06-01.
pub fn midnight() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
}

pub fn equator_origin() -> LatLng {
    LatLng::new(0.0, 0.0)
}

/// Ten degrees due east of [`equator_origin`].
pub fn equator_east() -> LatLng {
    LatLng::new(0.0, 10.0)
}

// ===========================================================================
// Configurations
// ===========================================================================

/// Two hourly steps from noon along the equator, heading east.
pub fn scenario_config() -> SimConfig {
    equator_run(noon(), TimeDelta::hours(2))
}

/// Hourly steps along the equator from `start` for `span`.
pub fn equator_run(start: DateTime<Utc>, span: TimeDelta) -> SimConfig {
    SimConfig::starting_at(start)
        .with_max(start + span)
        .with_route(equator_origin(), equator_east())
}

/// The default route for `weeks` weeks from midnight, without logging.
pub fn long_run(weeks: i64) -> SimConfig {
    SimConfig::starting_at(midnight())
        .with_max(midnight() + TimeDelta::weeks(weeks))
        .with_debug(false)
}

// ===========================================================================
// Random sources
// ===========================================================================

/// Never triggers a storm.
pub fn calm() -> FixedSequence {
    FixedSequence::constant(0.0)
}

/// Triggers a storm on every coasting step.
pub fn stormy() -> FixedSequence {
    FixedSequence::constant(0.99)
}

// ===========================================================================
// Logging
// ===========================================================================

/// Collects every message it receives.
#[derive(Debug, Default, Clone)]
pub struct RecordingLogger {
    pub messages: Vec<String>,
}

impl RecordingLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl LogSink for RecordingLogger {
    fn log(&mut self, message: &str) {
        self.messages.push(message.to_owned());
    }
}
