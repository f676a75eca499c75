//! The step calculator.
//!
//! [`Pipeline::calculate`] builds step `n + 1` from step `n` by running the
//! sub-models in a fixed order:
//!
//! 1. **Solar** -- panel power and voltage from the new date.
//! 2. **Battery** -- bus voltage from the solar output.
//! 3. **Sea** -- current vector.
//! 4. **Drag** -- optional drag force from the current.
//! 5. **Thrust** -- thruster force from the solar output.
//! 6. **Movement** -- velocity, new position and distance from start.
//!
//! Each stage receives only the outputs of earlier stages, so the order is
//! fixed by the argument types.

use crate::battery::{BatteryModel, PassThroughBattery};
use crate::config::SimConfig;
use crate::drag::{DragModel, NoDrag};
use crate::error::SimError;
use crate::movement::{MovementInputs, MovementModel, PowerThresholdMovement};
use crate::rng::RandomSource;
use crate::sea::{ConstantCurrent, SeaModel};
use crate::solar::{SinusoidalSun, SolarModel};
use crate::step::{Step, StepContext};
use crate::thrust::{LinearThrust, ThrustModel};

/// The six sub-model strategies, in pipeline order.
#[derive(Debug)]
pub struct Pipeline {
    solar: Box<dyn SolarModel>,
    battery: Box<dyn BatteryModel>,
    sea: Box<dyn SeaModel>,
    drag: Box<dyn DragModel>,
    thrust: Box<dyn ThrustModel>,
    movement: Box<dyn MovementModel>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self {
            solar: Box::new(SinusoidalSun::default()),
            battery: Box::new(PassThroughBattery),
            sea: Box::new(ConstantCurrent::default()),
            drag: Box::new(NoDrag),
            thrust: Box::new(LinearThrust::default()),
            movement: Box::new(PowerThresholdMovement::default()),
        }
    }
}

impl Pipeline {
    /// The default sub-models.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_solar(mut self, model: impl SolarModel + 'static) -> Self {
        self.solar = Box::new(model);
        self
    }

    pub fn with_battery(mut self, model: impl BatteryModel + 'static) -> Self {
        self.battery = Box::new(model);
        self
    }

    pub fn with_sea(mut self, model: impl SeaModel + 'static) -> Self {
        self.sea = Box::new(model);
        self
    }

    pub fn with_drag(mut self, model: impl DragModel + 'static) -> Self {
        self.drag = Box::new(model);
        self
    }

    pub fn with_thrust(mut self, model: impl ThrustModel + 'static) -> Self {
        self.thrust = Box::new(model);
        self
    }

    pub fn with_movement(mut self, model: impl MovementModel + 'static) -> Self {
        self.movement = Box::new(model);
        self
    }

    /// Names of the configured strategies, in pipeline order.
    pub fn stage_names(&self) -> [&str; 6] {
        [
            self.solar.name(),
            self.battery.name(),
            self.sea.name(),
            self.drag.name(),
            self.thrust.name(),
            self.movement.name(),
        ]
    }

    /// Produce the step that follows `previous`.
    pub fn calculate(
        &self,
        previous: &Step,
        config: &SimConfig,
        rng: &mut dyn RandomSource,
    ) -> Result<Step, SimError> {
        let date = previous
            .date
            .checked_add_signed(config.date_delta)
            .ok_or(SimError::DateOverflow(previous.date))?;
        let ctx = StepContext {
            step: previous.step + 1,
            date,
            previous,
            config,
        };

        let solar = self.solar.generate(&ctx)?;
        let battery_voltage = self.battery.battery_voltage(&ctx, &solar)?;
        let sea_current = self.sea.current(&ctx)?;
        let drag = self.drag.drag(&ctx, &sea_current)?;
        let thrust = self.thrust.thrust(&ctx, &solar)?;
        let movement = self.movement.advance(
            &ctx,
            &MovementInputs {
                solar: &solar,
                sea_current: &sea_current,
                drag: drag.as_ref(),
                thrust: &thrust,
            },
            rng,
        )?;

        Ok(Step {
            step: ctx.step,
            date,
            location: movement.location,
            solar_power: solar.power,
            solar_voltage: solar.voltage,
            battery_voltage,
            sea_current,
            drag,
            thrust,
            velocity: movement.velocity,
            storm: movement.storm,
            distance_from_start: movement.distance_from_start,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geodesy::LatLng;
    use crate::quantity::{Quantity, units};
    use crate::rng::FixedSequence;
    use crate::solar::SolarOutput;
    use chrono::{TimeZone, Utc};

    fn config() -> SimConfig {
        SimConfig::starting_at(Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap())
            .with_route(LatLng::new(0.0, 0.0), LatLng::new(0.0, 10.0))
    }

    #[derive(Debug)]
    struct FullSun;

    impl SolarModel for FullSun {
        fn name(&self) -> &str {
            "full_sun"
        }

        fn generate(&self, _ctx: &StepContext<'_>) -> Result<SolarOutput, SimError> {
            Ok(SolarOutput {
                power: Quantity::new(240.0, units::WATT),
                voltage: Quantity::new(28.0, units::VOLT),
            })
        }
    }

    #[test]
    fn default_stage_order() {
        assert_eq!(
            Pipeline::new().stage_names(),
            [
                "sinusoidal_sun",
                "pass_through",
                "constant_current",
                "none",
                "linear_thrust",
                "power_threshold"
            ]
        );
    }

    #[test]
    fn calculate_advances_index_and_date() {
        let config = config();
        let origin = Step::origin(&config);
        let mut rng = FixedSequence::constant(0.0);
        let step = Pipeline::new().calculate(&origin, &config, &mut rng).unwrap();
        assert_eq!(step.step, 1);
        assert_eq!(step.date, config.date_start + config.date_delta);
        assert_eq!(step.battery_voltage, step.solar_voltage);
        assert!(step.drag.is_none());
        let ratio = step.thrust.value() / step.solar_power.value();
        assert!((ratio - 26.7 / 120.0).abs() < 1e-12);
    }

    #[test]
    fn substituted_solar_flows_through_every_stage() {
        let config = config();
        let origin = Step::origin(&config);
        let mut rng = FixedSequence::constant(0.0);
        let step = Pipeline::new()
            .with_solar(FullSun)
            .calculate(&origin, &config, &mut rng)
            .unwrap();
        assert_eq!(step.solar_power.value(), 240.0);
        assert_eq!(step.battery_voltage.value(), 28.0);
        assert!((step.thrust.value() - 53.4).abs() < 1e-12);
        assert!((step.velocity.magnitude.value() - 9.0).abs() < 1e-12);
    }

    #[test]
    fn previous_step_is_not_modified() {
        let config = config();
        let origin = Step::origin(&config);
        let snapshot = origin.clone();
        let mut rng = FixedSequence::constant(0.0);
        Pipeline::new().calculate(&origin, &config, &mut rng).unwrap();
        assert_eq!(origin, snapshot);
    }

    #[test]
    fn date_overflow_is_reported() {
        let mut config = config();
        config.date_start = chrono::DateTime::<Utc>::MAX_UTC - chrono::TimeDelta::minutes(30);
        let origin = Step::origin(&config);
        let mut rng = FixedSequence::constant(0.0);
        let err = Pipeline::new().calculate(&origin, &config, &mut rng).unwrap_err();
        assert!(matches!(err, SimError::DateOverflow(_)));
    }
}
