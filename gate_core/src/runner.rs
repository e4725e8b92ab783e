//! One owned controller, one owned plant, one tick function.
//!
//! Per tick:
//! 1. clear pulse flags
//! 2. apply operator inputs (plant sensors, controller buttons)
//! 3. snapshot the plant and step the controller
//! 4. integrate the plant at the commanded voltage
//! 5. encode both port words

use gate_traits::{Direction, Obstacle, Plant};
use serde::Serialize;

use crate::config::SensorCfg;
use crate::controller::GateController;
use crate::event_log::EventLog;
use crate::input::{InputQueue, OperatorInput};
use crate::ports::{PortWords, encode_input, encode_output};
use crate::quantizer::Quantizer;
use crate::status::{ControlEvent, GateState, StopCause};

/// Display-only state of one tick. Carries no control semantics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostics {
    /// Simulation time at the end of the tick (s).
    pub t_s: f64,
    pub state: GateState,
    pub direction: Direction,
    pub commanded_v: f64,
    pub target_v: f64,
    pub voltage_code: u32,
    pub position: f64,
    pub force: f64,
    pub force_sensor_v: f64,
    pub force_code: u32,
    pub slow_mode: bool,
    pub latched: bool,
    pub stop_cause: Option<StopCause>,
    pub ramp_active: bool,
    pub ports: PortWords,
}

/// Result of one [`Simulation::tick`].
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub diagnostics: Diagnostics,
    /// Events raised during this tick, oldest first.
    pub events: Vec<ControlEvent>,
    /// Control cycles executed during this tick.
    pub cycles: u32,
}

pub struct Simulation<P: Plant> {
    controller: GateController,
    plant: P,
    sensor: SensorCfg,
    adc: Quantizer,
    dac: Quantizer,
    log: EventLog,
    elapsed_s: f64,
    pending: Vec<ControlEvent>,
}

impl<P: Plant> Simulation<P> {
    pub fn new(controller: GateController, plant: P, sensor: SensorCfg, log_lines: usize) -> Self {
        let drive = controller.drive_cfg();
        let dac = Quantizer::unipolar(drive.dac_vmax, drive.dac_bits);
        let adc = Quantizer::unipolar(sensor.adc_vref, sensor.adc_bits);
        Self {
            controller,
            plant,
            sensor,
            adc,
            dac,
            log: EventLog::new(log_lines),
            elapsed_s: 0.0,
            pending: Vec::new(),
        }
    }

    /// Advance by `dt` seconds after applying `inputs` in order.
    pub fn tick<I>(&mut self, dt: f64, inputs: I) -> TickReport
    where
        I: IntoIterator<Item = OperatorInput>,
    {
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };
        self.controller.begin_tick();
        for input in inputs {
            self.apply(input);
        }

        let snapshot = self.plant.snapshot();
        let cycles = self.controller.step(dt, &snapshot);
        self.plant.drive(
            dt,
            self.controller.commanded_voltage(),
            self.controller.direction(),
        );

        let mut events = std::mem::take(&mut self.pending);
        events.extend(self.controller.take_events());
        for event in &events {
            self.log.record(self.elapsed_s, event);
        }
        self.elapsed_s += dt;

        TickReport {
            diagnostics: self.diagnostics(),
            events,
            cycles,
        }
    }

    /// [`tick`](Self::tick) with whatever is queued at this tick boundary.
    pub fn tick_queued(&mut self, dt: f64, queue: &InputQueue) -> TickReport {
        let inputs = queue.drain();
        self.tick(dt, inputs)
    }

    fn apply(&mut self, input: OperatorInput) {
        tracing::trace!(?input, "operator input");
        match input {
            OperatorInput::Press(button) => {
                let snapshot = self.plant.snapshot();
                self.controller.press(button, &snapshot);
            }
            OperatorInput::SetObstacle(which, present) => self.set_obstacle(which, present),
            OperatorInput::ToggleObstacle(which) => {
                let present = !self.plant.obstacle(which);
                self.set_obstacle(which, present);
            }
            OperatorInput::ForceDelta(delta) => self.plant.apply_force_delta(delta),
            OperatorInput::ResetSensors => {
                self.plant.reset_sensors();
                tracing::info!("sensors reset");
                self.pending.push(ControlEvent::SensorsReset);
            }
        }
    }

    fn set_obstacle(&mut self, which: Obstacle, present: bool) {
        if self.plant.obstacle(which) == present {
            return;
        }
        self.plant.set_obstacle(which, present);
        tracing::info!(obstacle = which.index(), present, "obstacle changed");
        self.pending.push(ControlEvent::ObstacleChanged {
            obstacle: which,
            present,
        });
    }

    /// Port words for the current controller and plant state.
    pub fn ports(&self) -> PortWords {
        let snapshot = self.plant.snapshot();
        let force_code = self.adc.encode(self.sensor.force_to_volts(snapshot.force));
        let c = &self.controller;
        PortWords {
            input: encode_input(force_code, &snapshot, c.buttons(), c.ready()),
            output: encode_output(
                self.dac.encode(c.commanded_voltage()),
                c.direction(),
                c.pulses(),
            ),
        }
    }

    pub fn diagnostics(&self) -> Diagnostics {
        let snapshot = self.plant.snapshot();
        let c = &self.controller;
        let force_sensor_v = self.sensor.force_to_volts(snapshot.force);
        Diagnostics {
            t_s: self.elapsed_s,
            state: c.state(),
            direction: c.direction(),
            commanded_v: c.commanded_voltage(),
            target_v: c.target_voltage(),
            voltage_code: self.dac.encode(c.commanded_voltage()),
            position: snapshot.position,
            force: snapshot.force,
            force_sensor_v,
            force_code: self.adc.encode(force_sensor_v),
            slow_mode: c.slow_mode(),
            latched: c.is_latched(),
            stop_cause: c.stop_cause(),
            ramp_active: c.ramp().is_some_and(|r| r.is_active()),
            ports: self.ports(),
        }
    }

    pub fn controller(&self) -> &GateController {
        &self.controller
    }

    pub fn plant(&self) -> &P {
        &self.plant
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    pub fn elapsed_s(&self) -> f64 {
        self.elapsed_s
    }
}

#[cfg(feature = "plant")]
impl Simulation<gate_plant::PlantModel> {
    /// Controller and plant model assembled from a validated config.
    pub fn from_config(cfg: &gate_config::Config) -> crate::error::Result<Self> {
        use crate::config::{DriveCfg, RampCfg, SamplingCfg, ThresholdCfg, TravelCfg};
        use crate::error::GateError;

        let drive = DriveCfg::from(&cfg.drive);
        let sensor = SensorCfg::from(&cfg.sensor);
        let travel = TravelCfg::from(cfg);
        let params = crate::conversions::plant_params(&drive, &sensor, &travel);
        let plant = gate_plant::PlantModel::new(params)
            .map_err(|e| eyre::Report::new(GateError::Plant(e.to_string())))?;
        let controller = GateController::builder()
            .with_drive(drive)
            .with_thresholds(ThresholdCfg::from(&cfg.thresholds))
            .with_ramps(RampCfg::from(&cfg.ramps))
            .with_sampling(SamplingCfg::from(&cfg.sampling))
            .build()?;
        Ok(Self::new(controller, plant, sensor, cfg.logging.max_lines))
    }
}
