//! Vehicle movement: velocity, then position, then distance from start.
//!
//! [`PowerThresholdMovement`] has two regimes:
//!
//! - **Coasting** (solar power below `coast_below`): the vehicle drifts with
//!   the sea current. One random draw per coasting step decides whether a
//!   storm multiplies the drift speed.
//! - **Powered**: speed scales linearly with solar power up to `max_speed`
//!   at rated power, heading straight for `loc_end` along the great circle.
//!   Real drag grows with the square of speed; the linear curve is a
//!   deliberate simplification.
//!
//! Displacement is `speed * date_delta` along the velocity bearing.

use std::fmt::Debug;

use crate::error::SimError;
use crate::geodesy::{self, LatLng};
use crate::quantity::{Quantity, units};
use crate::rng::RandomSource;
use crate::solar::{RATED_SOLAR_POWER_W, SolarOutput};
use crate::step::{StepContext, VectorQuantity};

/// Below this solar power the vehicle coasts, in watts.
pub const COAST_THRESHOLD_W: f64 = 20.0;

/// Speed at rated power, in feet per second.
pub const MAX_SPEED_FT_S: f64 = 4.5;

/// Chance of a storm on each coasting step.
pub const STORM_PROBABILITY: f64 = 0.1;

/// Storm drift speed as a multiple of the sea current.
pub const STORM_MULTIPLIER: f64 = 10.0;

/// Outputs of earlier sub-models that movement depends on.
#[derive(Debug, Clone, Copy)]
pub struct MovementInputs<'a> {
    pub solar: &'a SolarOutput,
    pub sea_current: &'a VectorQuantity,
    pub drag: Option<&'a Quantity>,
    pub thrust: &'a Quantity,
}

/// Where the vehicle ended the step and how it got there.
#[derive(Debug, Clone, PartialEq)]
pub struct MovementOutput {
    pub velocity: VectorQuantity,
    pub storm: bool,
    pub location: LatLng,
    pub distance_from_start: Quantity,
}

/// Moves the vehicle for the step being built.
pub trait MovementModel: Debug + Send + Sync {
    fn name(&self) -> &str;

    fn advance(
        &self,
        ctx: &StepContext<'_>,
        inputs: &MovementInputs<'_>,
        rng: &mut dyn RandomSource,
    ) -> Result<MovementOutput, SimError>;
}

/// Displace `velocity * dt` from the previous location and measure the
/// result against `loc_start`.
pub fn displace(
    ctx: &StepContext<'_>,
    velocity: &VectorQuantity,
) -> Result<(LatLng, Quantity), SimError> {
    let dt = Quantity::new(ctx.config.delta_seconds(), units::SECOND);
    let displacement = (&velocity.magnitude * &dt).to(&units::METRE)?;
    let location = geodesy::offset(&ctx.previous.location, &displacement, &velocity.direction)?;
    let distance_from_start = geodesy::distance(&ctx.config.loc_start, &location)?;
    Ok((location, distance_from_start))
}

/// Coasts with the current below a power threshold, otherwise steers for
/// `loc_end` at a speed linear in solar power.
#[derive(Debug, Clone, PartialEq)]
pub struct PowerThresholdMovement {
    pub coast_below: Quantity,
    pub rated_power: Quantity,
    pub max_speed: Quantity,
    pub storm_probability: f64,
    pub storm_multiplier: f64,
}

impl Default for PowerThresholdMovement {
    fn default() -> Self {
        Self {
            coast_below: Quantity::new(COAST_THRESHOLD_W, units::WATT),
            rated_power: Quantity::new(RATED_SOLAR_POWER_W, units::WATT),
            max_speed: Quantity::new(MAX_SPEED_FT_S, units::FOOT_PER_SECOND),
            storm_probability: STORM_PROBABILITY,
            storm_multiplier: STORM_MULTIPLIER,
        }
    }
}

impl PowerThresholdMovement {
    /// Chance of a storm on each coasting step, in `[0, 1]`.
    pub fn with_storm_probability(mut self, probability: f64) -> Self {
        self.storm_probability = probability;
        self
    }

    /// Velocity for this step and whether a storm fired.
    pub fn velocity(
        &self,
        ctx: &StepContext<'_>,
        inputs: &MovementInputs<'_>,
        rng: &mut dyn RandomSource,
    ) -> Result<(VectorQuantity, bool), SimError> {
        if inputs.solar.power.try_lt(&self.coast_below)? {
            let storm = rng.next_uniform() > 1.0 - self.storm_probability;
            let velocity = if storm {
                inputs.sea_current.scaled(self.storm_multiplier)
            } else {
                inputs.sea_current.clone()
            };
            return Ok((velocity, storm));
        }

        let fraction =
            inputs.solar.power.value_in(self.rated_power.unit())? / self.rated_power.value();
        let speed = self.max_speed.scale(fraction);
        let bearing = geodesy::heading(&ctx.previous.location, &ctx.config.loc_end)?;
        Ok((VectorQuantity::new(speed, &bearing)?, false))
    }
}

impl MovementModel for PowerThresholdMovement {
    fn name(&self) -> &str {
        "power_threshold"
    }

    fn advance(
        &self,
        ctx: &StepContext<'_>,
        inputs: &MovementInputs<'_>,
        rng: &mut dyn RandomSource,
    ) -> Result<MovementOutput, SimError> {
        let (velocity, storm) = self.velocity(ctx, inputs, rng)?;
        let (location, distance_from_start) = displace(ctx, &velocity)?;
        Ok(MovementOutput {
            velocity,
            storm,
            location,
            distance_from_start,
        })
    }
}
