//! Sea state.
//!
//! [`ConstantCurrent`] stands in for a historical current lookup keyed by
//! date and position. It ignores both and returns a fixed vector.

use std::fmt::Debug;

use crate::error::SimError;
use crate::quantity::{Quantity, units};
use crate::step::{StepContext, VectorQuantity};

/// Default current speed, in metres per second.
pub const DEFAULT_CURRENT_SPEED_MPS: f64 = 0.1;

/// Default current bearing, in degrees clockwise from north (south-west).
pub const DEFAULT_CURRENT_BEARING_DEG: f64 = 230.0;

/// Computes the sea current acting on the vehicle during the step.
pub trait SeaModel: Debug + Send + Sync {
    fn name(&self) -> &str;

    /// Current at `ctx.date` around `ctx.previous.location`.
    fn current(&self, ctx: &StepContext<'_>) -> Result<VectorQuantity, SimError>;
}

/// The same current everywhere, at all times.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantCurrent {
    pub current: VectorQuantity,
}

impl ConstantCurrent {
    /// Build from a speed and a bearing. Fails if either has the wrong
    /// dimension.
    pub fn new(speed: Quantity, bearing: Quantity) -> Result<Self, SimError> {
        let speed = speed.to(&units::METRE_PER_SECOND)?;
        Ok(Self {
            current: VectorQuantity::new(speed, &bearing)?,
        })
    }
}

impl Default for ConstantCurrent {
    fn default() -> Self {
        Self {
            current: VectorQuantity {
                magnitude: Quantity::new(DEFAULT_CURRENT_SPEED_MPS, units::METRE_PER_SECOND),
                direction: Quantity::new(DEFAULT_CURRENT_BEARING_DEG, units::DEGREE),
            },
        }
    }
}

impl SeaModel for ConstantCurrent {
    fn name(&self) -> &str {
        "constant_current"
    }

    fn current(&self, _ctx: &StepContext<'_>) -> Result<VectorQuantity, SimError> {
        Ok(self.current.clone())
    }
}
