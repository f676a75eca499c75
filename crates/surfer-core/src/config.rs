//! Run configuration.

use chrono::{DateTime, TimeDelta, Utc};

use crate::error::SimError;
use crate::geodesy::LatLng;

/// Hermosa Beach, California: the default launch point.
pub const DEFAULT_LOC_START: LatLng = LatLng::new(33.8823163, -118.4123013);

/// Hawaii: the default destination.
pub const DEFAULT_LOC_END: LatLng = LatLng::new(19.1205301, -155.5010251);

/// Default simulated horizon after `date_start`.
pub const DEFAULT_HORIZON_WEEKS: i64 = 10;

/// Immutable configuration for one simulation run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    pub date_start: DateTime<Utc>,
    /// Simulated time between consecutive steps. Must be positive.
    pub date_delta: TimeDelta,
    /// The run stops once a step's date reaches this bound.
    pub date_max: DateTime<Utc>,
    pub loc_start: LatLng,
    pub loc_end: LatLng,
    /// Gates every message sent to the log sink.
    pub debug: bool,
}

impl SimConfig {
    /// Defaults anchored at `date_start` instead of the wall clock.
    pub fn starting_at(date_start: DateTime<Utc>) -> Self {
        Self {
            date_start,
            date_delta: TimeDelta::hours(1),
            date_max: date_start + TimeDelta::weeks(DEFAULT_HORIZON_WEEKS),
            loc_start: DEFAULT_LOC_START,
            loc_end: DEFAULT_LOC_END,
            debug: true,
        }
    }

    /// Replace the step interval.
    pub fn with_delta(mut self, date_delta: TimeDelta) -> Self {
        self.date_delta = date_delta;
        self
    }

    /// Replace the time bound.
    pub fn with_max(mut self, date_max: DateTime<Utc>) -> Self {
        self.date_max = date_max;
        self
    }

    /// Replace both ends of the route.
    pub fn with_route(mut self, loc_start: LatLng, loc_end: LatLng) -> Self {
        self.loc_start = loc_start;
        self.loc_end = loc_end;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Check everything a run needs before the first step is computed.
    ///
    /// The time checks come first: a non-positive delta would never reach
    /// `date_max`.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.date_delta <= TimeDelta::zero() {
            return Err(SimError::NonAdvancingTime {
                delta_ms: self.date_delta.num_milliseconds(),
            });
        }
        if self.date_max <= self.date_start {
            return Err(SimError::ConfigurationRange {
                start: self.date_start,
                max: self.date_max,
            });
        }
        self.loc_start.validate()?;
        self.loc_end.validate()?;
        Ok(())
    }

    /// Number of steps a valid configuration produces.
    pub fn expected_steps(&self) -> u64 {
        let span = total_nanos(self.date_max - self.date_start);
        let delta = total_nanos(self.date_delta);
        if span <= 0 || delta <= 0 {
            return 0;
        }
        u64::try_from((span as u128).div_ceil(delta as u128)).unwrap_or(u64::MAX)
    }

    /// `date_delta` in seconds, sub-millisecond part included.
    pub fn delta_seconds(&self) -> f64 {
        let (whole, nanos) = split_seconds(self.date_delta);
        whole as f64 + nanos as f64 * 1e-9
    }
}

/// Whole seconds of `delta` and the nanoseconds left over.
fn split_seconds(delta: TimeDelta) -> (i64, i64) {
    let whole = delta.num_seconds();
    let nanos = (delta - TimeDelta::seconds(whole))
        .num_nanoseconds()
        .unwrap_or(0);
    (whole, nanos)
}

fn total_nanos(delta: TimeDelta) -> i128 {
    let (whole, nanos) = split_seconds(delta);
    i128::from(whole) * 1_000_000_000 + i128::from(nanos)
}

impl Default for SimConfig {
    /// Starts now, one-hour steps, ten-week horizon.
    fn default() -> Self {
        Self::starting_at(Utc::now())
    }
}
