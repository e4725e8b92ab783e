//! `From` implementations bridging `gate_config` types to `gate_core` types.

use gate_config::{ScenarioAction, ScenarioRow};
use gate_traits::Obstacle;

use crate::config::{DriveCfg, RampCfg, SamplingCfg, SensorCfg, ThresholdCfg, TravelCfg};
use crate::input::OperatorInput;
use crate::status::Button;

impl From<&gate_config::Drive> for DriveCfg {
    fn from(c: &gate_config::Drive) -> Self {
        Self {
            nominal_v: c.nominal_v,
            half_fraction: c.half_fraction,
            slow_fraction: c.slow_fraction,
            dac_vmax: c.dac_vmax,
            dac_bits: c.dac_bits,
        }
    }
}

impl From<&gate_config::Sensor> for SensorCfg {
    fn from(c: &gate_config::Sensor) -> Self {
        Self {
            force_max: c.force_max,
            force_sensor_vmax: c.force_sensor_vmax,
            adc_vref: c.adc_vref,
            adc_bits: c.adc_bits,
        }
    }
}

impl From<&gate_config::Thresholds> for ThresholdCfg {
    fn from(c: &gate_config::Thresholds) -> Self {
        Self {
            slow_off: c.slow_off,
            slow_on: c.slow_on,
            critical: c.critical,
        }
    }
}

impl From<&gate_config::Ramps> for RampCfg {
    fn from(c: &gate_config::Ramps) -> Self {
        Self {
            accel_s: c.accel_s,
            decel_s: c.decel_s,
        }
    }
}

impl From<&gate_config::Sampling> for SamplingCfg {
    fn from(c: &gate_config::Sampling) -> Self {
        Self {
            period_ms: c.period_ms,
        }
    }
}

/// Travel geometry plus the speed clamp, which lives under `[drive]` in TOML.
impl From<&gate_config::Config> for TravelCfg {
    fn from(c: &gate_config::Config) -> Self {
        Self {
            open1: c.travel.open1,
            open2: c.travel.open2,
            close1: c.travel.close1,
            close2: c.travel.close2,
            full_travel_s: c.travel.full_travel_s,
            max_speed_ratio: c.drive.max_speed_ratio,
        }
    }
}

impl From<&ScenarioRow> for OperatorInput {
    /// Rows are validated on load, so a missing value only happens for
    /// hand-built rows and reads as "off" / zero.
    fn from(row: &ScenarioRow) -> Self {
        let flag = row.value.is_some_and(|v| v != 0.0);
        match row.action {
            ScenarioAction::Open => Self::Press(Button::Open),
            ScenarioAction::Close => Self::Press(Button::Close),
            ScenarioAction::Obstacle1 => Self::SetObstacle(Obstacle::First, flag),
            ScenarioAction::Obstacle2 => Self::SetObstacle(Obstacle::Second, flag),
            ScenarioAction::Toggle1 => Self::ToggleObstacle(Obstacle::First),
            ScenarioAction::Toggle2 => Self::ToggleObstacle(Obstacle::Second),
            ScenarioAction::ForceDelta => Self::ForceDelta(row.value.unwrap_or(0.0)),
            ScenarioAction::Reset => Self::ResetSensors,
        }
    }
}

/// Plant parameters for the bundled model, from the runtime structs.
#[cfg(feature = "plant")]
pub fn plant_params(drive: &DriveCfg, sensor: &SensorCfg, travel: &TravelCfg) -> gate_plant::PlantParams {
    gate_plant::PlantParams {
        open1: travel.open1,
        open2: travel.open2,
        close1: travel.close1,
        close2: travel.close2,
        nominal_v: drive.nominal_v,
        full_travel_s: travel.full_travel_s,
        max_speed_ratio: travel.max_speed_ratio,
        force_max: sensor.force_max,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_rows_map_to_inputs() {
        let row = |action, value| ScenarioRow {
            at_s: 0.0,
            action,
            value,
        };
        assert_eq!(
            OperatorInput::from(&row(ScenarioAction::Obstacle2, Some(1.0))),
            OperatorInput::SetObstacle(Obstacle::Second, true)
        );
        assert_eq!(
            OperatorInput::from(&row(ScenarioAction::ForceDelta, Some(-12.5))),
            OperatorInput::ForceDelta(-12.5)
        );
        assert_eq!(
            OperatorInput::from(&row(ScenarioAction::Close, None)),
            OperatorInput::Press(Button::Close)
        );
    }
}
