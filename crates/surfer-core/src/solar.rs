//! Solar generation.
//!
//! [`SinusoidalSun`] is a coarse day/night curve driven only by the hour of
//! day. It ignores season, latitude and true sun angle; substitute another
//! [`SolarModel`] for anything more faithful.

use std::fmt::Debug;

use chrono::{FixedOffset, Offset, Timelike, Utc};

use crate::error::SimError;
use crate::quantity::{Quantity, units};
use crate::step::StepContext;

/// Rated panel output at full sun, in watts.
pub const RATED_SOLAR_POWER_W: f64 = 120.0;

/// Panel voltage at full sun, in volts.
pub const PEAK_SOLAR_VOLTAGE_V: f64 = 14.0;

/// Solar sub-model output for one step.
#[derive(Debug, Clone, PartialEq)]
pub struct SolarOutput {
    pub power: Quantity,
    pub voltage: Quantity,
}

/// Computes panel power and voltage for the step being built.
pub trait SolarModel: Debug + Send + Sync {
    fn name(&self) -> &str;

    fn generate(&self, ctx: &StepContext<'_>) -> Result<SolarOutput, SimError>;
}

/// Dimensionless irradiance proxy in `[0, 1]` for a (possibly fractional)
/// hour of day.
///
/// `sin((5/6) * (hour - 7) / pi) * 0.9 + 0.1`, clamped at zero. Positive
/// from 07:00 through 19:00, zero overnight.
pub fn sun_factor(hour_of_day: f64) -> f64 {
    let raw = ((5.0 / 6.0) * (hour_of_day - 7.0) / std::f64::consts::PI).sin() * 0.9 + 0.1;
    raw.max(0.0)
}

/// Hour-of-day sinusoid scaled to a rated power and peak voltage.
#[derive(Debug, Clone, PartialEq)]
pub struct SinusoidalSun {
    pub rated_power: Quantity,
    /// Voltage at full sun. The linear voltage curve is a placeholder, not
    /// a panel model.
    pub peak_voltage: Quantity,
    /// Local time offset used to read the hour of day.
    pub utc_offset: FixedOffset,
}

impl SinusoidalSun {
    /// Read the hour of day in this offset instead of UTC.
    pub fn with_utc_offset(mut self, utc_offset: FixedOffset) -> Self {
        self.utc_offset = utc_offset;
        self
    }
}

impl Default for SinusoidalSun {
    fn default() -> Self {
        Self {
            rated_power: Quantity::new(RATED_SOLAR_POWER_W, units::WATT),
            peak_voltage: Quantity::new(PEAK_SOLAR_VOLTAGE_V, units::VOLT),
            utc_offset: Utc.fix(),
        }
    }
}

impl SolarModel for SinusoidalSun {
    fn name(&self) -> &str {
        "sinusoidal_sun"
    }

    fn generate(&self, ctx: &StepContext<'_>) -> Result<SolarOutput, SimError> {
        let hour = ctx.date.with_timezone(&self.utc_offset).hour();
        let factor = sun_factor(hour as f64);
        Ok(SolarOutput {
            power: self.rated_power.scale(factor),
            voltage: self.peak_voltage.scale(factor),
        })
    }
}
