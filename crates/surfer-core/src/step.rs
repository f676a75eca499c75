//! The per-step state record and the context handed to sub-models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::SimConfig;
use crate::geodesy::{LatLng, wrap_360};
use crate::quantity::{Quantity, Unit, UnitMismatch, units};

// ---------------------------------------------------------------------------
// Vector quantities
// ---------------------------------------------------------------------------

/// A magnitude with a bearing, e.g. a sea current or a velocity.
///
/// The direction is always stored in degrees, clockwise from true north, in
/// `[0, 360)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorQuantity {
    pub magnitude: Quantity,
    pub direction: Quantity,
}

impl VectorQuantity {
    /// Build a vector, normalising the direction. Fails if `direction` is not
    /// an angle.
    pub fn new(magnitude: Quantity, direction: &Quantity) -> Result<Self, UnitMismatch> {
        let degrees = direction.value_in(&units::DEGREE)?;
        Ok(Self {
            magnitude,
            direction: Quantity::new(wrap_360(degrees), units::DEGREE),
        })
    }

    /// The same direction with the magnitude multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            magnitude: self.magnitude.scale(factor),
            direction: self.direction.clone(),
        }
    }

    /// A zero-magnitude vector of the given unit, pointing north.
    pub fn zero(unit: &Unit) -> Self {
        Self {
            magnitude: Quantity::new(0.0, unit.clone()),
            direction: Quantity::new(0.0, units::DEGREE),
        }
    }
}

// ---------------------------------------------------------------------------
// Step
// ---------------------------------------------------------------------------

/// One simulated instant's full physical state.
///
/// Steps are produced by value from the previous step and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// 1-based index; the seed state is step 0.
    pub step: u64,
    pub date: DateTime<Utc>,
    pub location: LatLng,
    pub solar_power: Quantity,
    pub solar_voltage: Quantity,
    pub battery_voltage: Quantity,
    pub sea_current: VectorQuantity,
    /// Drag force, when a drag model produces one.
    pub drag: Option<Quantity>,
    pub thrust: Quantity,
    /// Velocity over ground used to derive this step's displacement.
    pub velocity: VectorQuantity,
    /// Whether the storm event fired this step.
    pub storm: bool,
    /// Great-circle distance from `loc_start`.
    pub distance_from_start: Quantity,
}

impl Step {
    /// The implicit initial state: step 0 at `date_start` and `loc_start`,
    /// with every physical quantity at zero.
    pub fn origin(config: &SimConfig) -> Self {
        Self {
            step: 0,
            date: config.date_start,
            location: config.loc_start,
            solar_power: Quantity::new(0.0, units::WATT),
            solar_voltage: Quantity::new(0.0, units::VOLT),
            battery_voltage: Quantity::new(0.0, units::VOLT),
            sea_current: VectorQuantity::zero(&units::METRE_PER_SECOND),
            drag: None,
            thrust: Quantity::new(0.0, units::NEWTON),
            velocity: VectorQuantity::zero(&units::METRE_PER_SECOND),
            storm: false,
            distance_from_start: Quantity::new(0.0, units::METRE),
        }
    }
}

// ---------------------------------------------------------------------------
// Step context
// ---------------------------------------------------------------------------

/// What every sub-model sees of the step being built: its index and date,
/// the previous step and the run configuration.
#[derive(Debug, Clone, Copy)]
pub struct StepContext<'a> {
    pub step: u64,
    pub date: DateTime<Utc>,
    pub previous: &'a Step,
    pub config: &'a SimConfig,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn vector_direction_is_normalised() {
        let v = VectorQuantity::new(
            Quantity::new(0.1, units::METRE_PER_SECOND),
            &Quantity::new(-130.0, units::DEGREE),
        )
        .unwrap();
        assert_eq!(v.direction.value(), 230.0);
        assert_eq!(v.direction.unit().symbol(), "deg");
    }

    #[test]
    fn vector_direction_converts_radians() {
        let v = VectorQuantity::new(
            Quantity::new(1.0, units::KNOT),
            &Quantity::new(std::f64::consts::FRAC_PI_2, units::RADIAN),
        )
        .unwrap();
        assert!((v.direction.value() - 90.0).abs() < 1e-12);
    }

    #[test]
    fn vector_direction_must_be_an_angle() {
        let err = VectorQuantity::new(
            Quantity::new(1.0, units::METRE_PER_SECOND),
            &Quantity::new(1.0, units::METRE),
        );
        assert!(err.is_err());
    }

    #[test]
    fn scaled_keeps_direction() {
        let v = VectorQuantity::new(
            Quantity::new(0.1, units::METRE_PER_SECOND),
            &Quantity::new(230.0, units::DEGREE),
        )
        .unwrap();
        let storm = v.scaled(10.0);
        assert!((storm.magnitude.value() - 1.0).abs() < 1e-12);
        assert_eq!(storm.direction, v.direction);
    }

    #[test]
    fn origin_step_seeds_from_config() {
        let start = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let config = SimConfig::starting_at(start);
        let origin = Step::origin(&config);
        assert_eq!(origin.step, 0);
        assert_eq!(origin.date, start);
        assert_eq!(origin.location, config.loc_start);
        assert_eq!(origin.distance_from_start.value(), 0.0);
        assert!(!origin.storm);
    }
}
