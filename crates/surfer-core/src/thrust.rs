//! Propulsion.

use std::fmt::Debug;

use crate::error::SimError;
use crate::quantity::{Quantity, units};
use crate::solar::{RATED_SOLAR_POWER_W, SolarOutput};
use crate::step::StepContext;

/// Thrust at rated power, in newtons (two thrusters, about 3 lbf each).
pub const RATED_THRUST_N: f64 = 26.7;

/// Computes thruster force for the step being built.
pub trait ThrustModel: Debug + Send + Sync {
    fn name(&self) -> &str;

    fn thrust(&self, ctx: &StepContext<'_>, solar: &SolarOutput) -> Result<Quantity, SimError>;
}

/// Thrust proportional to solar power: `power / rated_power * rated_thrust`.
///
/// Not capped: power above the rating yields thrust above the rating.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearThrust {
    pub rated_power: Quantity,
    pub rated_thrust: Quantity,
}

impl Default for LinearThrust {
    fn default() -> Self {
        Self {
            rated_power: Quantity::new(RATED_SOLAR_POWER_W, units::WATT),
            rated_thrust: Quantity::new(RATED_THRUST_N, units::NEWTON),
        }
    }
}

impl ThrustModel for LinearThrust {
    fn name(&self) -> &str {
        "linear_thrust"
    }

    fn thrust(&self, _ctx: &StepContext<'_>, solar: &SolarOutput) -> Result<Quantity, SimError> {
        let fraction = solar.power.value_in(self.rated_power.unit())? / self.rated_power.value();
        Ok(self.rated_thrust.scale(fraction))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::step::Step;
    use chrono::{TimeZone, Utc};

    fn thrust_for(power: Quantity) -> Result<Quantity, SimError> {
        let config = SimConfig::starting_at(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap());
        let previous = Step::origin(&config);
        let ctx = StepContext {
            step: 1,
            date: config.date_start,
            previous: &previous,
            config: &config,
        };
        let solar = SolarOutput {
            power,
            voltage: Quantity::new(0.0, units::VOLT),
        };
        LinearThrust::default().thrust(&ctx, &solar)
    }

    #[test]
    fn rated_power_gives_rated_thrust() {
        let t = thrust_for(Quantity::new(120.0, units::WATT)).unwrap();
        assert!((t.value() - 26.7).abs() < 1e-12);
        assert_eq!(t.unit().symbol(), "N");
    }

    #[test]
    fn half_power_gives_half_thrust() {
        let t = thrust_for(Quantity::new(60.0, units::WATT)).unwrap();
        assert!((t.value() - 13.35).abs() < 1e-12);
    }

    #[test]
    fn thrust_is_not_capped() {
        let t = thrust_for(Quantity::new(240.0, units::WATT)).unwrap();
        assert!((t.value() - 53.4).abs() < 1e-12);
    }

    #[test]
    fn non_power_input_is_a_unit_mismatch() {
        let err = thrust_for(Quantity::new(120.0, units::VOLT)).unwrap_err();
        assert!(matches!(err, SimError::UnitMismatch(_)));
    }
}
