//! Battery state.
//!
//! [`PassThroughBattery`] has no storage: the bus sits at panel voltage. A
//! stateful charge/discharge model can replace it through [`BatteryModel`]
//! without touching the step pipeline; it receives the previous step and can
//! read the previous battery voltage from it.

use std::fmt::Debug;

use crate::error::SimError;
use crate::quantity::Quantity;
use crate::solar::SolarOutput;
use crate::step::StepContext;

/// Computes battery voltage for the step being built.
pub trait BatteryModel: Debug + Send + Sync {
    fn name(&self) -> &str;

    fn battery_voltage(
        &self,
        ctx: &StepContext<'_>,
        solar: &SolarOutput,
    ) -> Result<Quantity, SimError>;
}

/// Battery voltage equals solar voltage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassThroughBattery;

impl BatteryModel for PassThroughBattery {
    fn name(&self) -> &str {
        "pass_through"
    }

    fn battery_voltage(
        &self,
        _ctx: &StepContext<'_>,
        solar: &SolarOutput,
    ) -> Result<Quantity, SimError> {
        Ok(solar.voltage.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::quantity::units;
    use crate::step::Step;
    use chrono::{TimeZone, Utc};

    #[test]
    fn voltage_passes_straight_through() {
        let config = SimConfig::starting_at(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap());
        let previous = Step::origin(&config);
        let ctx = StepContext {
            step: 1,
            date: config.date_start,
            previous: &previous,
            config: &config,
        };
        let solar = SolarOutput {
            power: Quantity::new(60.0, units::WATT),
            voltage: Quantity::new(7.0, units::VOLT),
        };
        let v = PassThroughBattery.battery_voltage(&ctx, &solar).unwrap();
        assert_eq!(v, solar.voltage);
    }
}
