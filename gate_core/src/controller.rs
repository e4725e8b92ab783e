//! The gate state machine.
//!
//! Ramps advance on every tick; the priority evaluation runs once per fixed
//! sample period (see [`FixedRateSampler`]). Each control cycle checks, in
//! order, first match wins:
//!
//! 1. obstacle: emergency stop
//! 2. critical force: emergency stop
//! 3. slow-mode entry/exit on force hysteresis
//! 4. limit 1 in the travel direction: decelerate to half (one-shot)
//! 5. limit 2 in the travel direction: stop, back to `Idle`
//!
//! `Stopped` is latched until the next button press.

use gate_traits::{Direction, SensorSnapshot};

use crate::config::{DriveCfg, RampCfg, SamplingCfg, ThresholdCfg};
use crate::ports::{ButtonsHeld, PulseFlags};
use crate::ramp::RampProfile;
use crate::sampler::FixedRateSampler;
use crate::status::{Button, ControlEvent, GateState, StopCause};

#[derive(Debug, Clone)]
pub struct GateController {
    drive: DriveCfg,
    thresholds: ThresholdCfg,
    ramps: RampCfg,
    sampler: FixedRateSampler,

    state: GateState,
    direction: Direction,
    commanded_v: f64,
    target_v: f64,
    slow_mode: bool,
    latched: bool,
    stop_cause: Option<StopCause>,
    ramp: Option<RampProfile>,

    pulses: PulseFlags,
    buttons: ButtonsHeld,
    ready: bool,
    events: Vec<ControlEvent>,
}

impl GateController {
    /// Callers go through the builder, which validates the parts.
    pub(crate) fn from_parts(
        drive: DriveCfg,
        thresholds: ThresholdCfg,
        ramps: RampCfg,
        sampling: &SamplingCfg,
    ) -> Self {
        Self {
            drive,
            thresholds,
            ramps,
            sampler: FixedRateSampler::new(sampling.period_s()),
            state: GateState::Idle,
            direction: Direction::None,
            commanded_v: 0.0,
            target_v: 0.0,
            slow_mode: false,
            latched: false,
            stop_cause: None,
            ramp: None,
            pulses: PulseFlags::default(),
            buttons: ButtonsHeld::default(),
            ready: false,
            events: Vec::new(),
        }
    }

    /// Clear the one-tick pulse flags. Call once at the start of every tick,
    /// before any input is applied.
    pub fn begin_tick(&mut self) {
        self.pulses = PulseFlags::default();
    }

    /// Operator button. Only `Idle` and `Stopped` accept a press; anything
    /// else is a silent no-op apart from the held-button bits.
    ///
    /// Returns whether motion was started.
    pub fn press(&mut self, button: Button, sensors: &SensorSnapshot) -> bool {
        self.buttons = match button {
            Button::Open => ButtonsHeld {
                open: true,
                close: false,
            },
            Button::Close => ButtonsHeld {
                open: false,
                close: true,
            },
        };
        if !self.state.accepts_press() {
            tracing::trace!(state = %self.state, ?button, "press ignored");
            return false;
        }

        if self.latched {
            tracing::info!(cause = ?self.stop_cause, "latch cleared by operator");
        }
        self.state = button.state();
        self.direction = button.direction();
        self.latched = false;
        self.stop_cause = None;
        self.slow_mode = false;

        let target = self.nominal_or_half(sensors);
        self.arm_ramp(target, self.ramps.accel_s);
        tracing::info!(
            direction = self.direction.name(),
            target_v = target,
            "motion started"
        );
        self.events.push(ControlEvent::MotionStarted {
            direction: self.direction,
            target_v: target,
        });
        true
    }

    /// Advance ramps by `dt` and run every control cycle that came due.
    ///
    /// Returns the number of control cycles executed.
    pub fn step(&mut self, dt: f64, sensors: &SensorSnapshot) -> u32 {
        self.advance_ramp(dt);
        let due = self.sampler.accumulate(dt);
        for _ in 0..due {
            self.evaluate(sensors);
        }
        self.release_buttons_if_settled();
        due
    }

    fn advance_ramp(&mut self, dt: f64) {
        let Some(ramp) = self.ramp.as_mut() else {
            self.commanded_v = self.target_v;
            return;
        };
        let (v, done) = ramp.step(dt);
        self.commanded_v = v;
        if done {
            tracing::debug!(level_v = v, "ramp complete");
            self.ramp = None;
        }
    }

    fn evaluate(&mut self, s: &SensorSnapshot) {
        self.pulses.sample_taken = true;
        self.ready = true;
        tracing::trace!(
            state = %self.state,
            position = s.position,
            force = s.force,
            commanded_v = self.commanded_v,
            "control cycle"
        );

        if !matches!(self.state, GateState::Opening | GateState::Closing) {
            return;
        }

        if s.obstacle_any() {
            self.emergency_stop(StopCause::Obstacle, s.force);
            return;
        }
        if s.force >= self.thresholds.critical {
            self.emergency_stop(StopCause::CriticalForce, s.force);
            return;
        }

        if !self.slow_mode && s.force >= self.thresholds.slow_on {
            self.slow_mode = true;
            self.arm_ramp(self.drive.slow_v(), self.ramps.decel_s);
            tracing::debug!(force = s.force, "slow mode on");
            self.events
                .push(ControlEvent::SlowModeEntered { force: s.force });
            return;
        }
        if self.slow_mode && s.force < self.thresholds.slow_off {
            self.slow_mode = false;
            let target = self.nominal_or_half(s);
            self.arm_ramp(target, self.ramps.accel_s);
            tracing::debug!(force = s.force, target_v = target, "slow mode off");
            self.events.push(ControlEvent::SlowModeExited {
                force: s.force,
                target_v: target,
            });
            return;
        }

        let (limit1, limit2) = s.limits.for_direction(self.direction);
        if limit1 && !self.slow_mode && self.target_v > self.drive.half_v() {
            self.arm_ramp(self.drive.half_v(), self.ramps.decel_s);
            tracing::debug!(direction = self.direction.name(), "limit 1, decelerating");
            self.events.push(ControlEvent::LimitDeceleration {
                direction: self.direction,
            });
            return;
        }
        if limit2 {
            self.finish_travel();
        }
    }

    fn emergency_stop(&mut self, cause: StopCause, force: f64) {
        if self.state == GateState::Stopped {
            return;
        }
        self.state = GateState::Stopped;
        self.direction = Direction::None;
        self.latched = true;
        self.slow_mode = false;
        self.stop_cause = Some(cause);
        self.arm_ramp(0.0, self.ramps.decel_s);
        tracing::warn!(?cause, force, "emergency stop");
        self.events.push(ControlEvent::EmergencyStop { cause, force });
    }

    fn finish_travel(&mut self) {
        let direction = self.direction;
        self.state = GateState::Idle;
        self.direction = Direction::None;
        self.latched = false;
        self.slow_mode = false;
        self.stop_cause = None;
        self.arm_ramp(0.0, self.ramps.decel_s);
        tracing::info!(direction = direction.name(), "travel complete");
        self.events.push(ControlEvent::TravelComplete { direction });
    }

    /// Install a new ramp from the current commanded level. Re-arming the
    /// same target while a ramp is still running is a no-op.
    fn arm_ramp(&mut self, target: f64, duration_s: f64) -> bool {
        if self.target_v == target && self.ramp.as_ref().is_some_and(RampProfile::is_active) {
            return false;
        }
        self.target_v = target;
        self.ramp = Some(RampProfile::start(self.commanded_v, target, duration_s));
        self.pulses.ramp_armed = true;
        tracing::debug!(
            from_v = self.commanded_v,
            to_v = target,
            duration_s,
            "ramp armed"
        );
        true
    }

    /// Nominal, or half-nominal when the first limit in the travel direction
    /// is already asserted.
    fn nominal_or_half(&self, s: &SensorSnapshot) -> f64 {
        let (limit1, _) = s.limits.for_direction(self.direction);
        if limit1 {
            self.drive.half_v()
        } else {
            self.drive.nominal_v
        }
    }

    fn release_buttons_if_settled(&mut self) {
        if matches!(self.state, GateState::Idle | GateState::Stopped)
            && self.target_v == 0.0
            && self.ramp.is_none()
        {
            self.buttons = ButtonsHeld::default();
        }
    }

    /// Events emitted since the last call, oldest first.
    pub fn take_events(&mut self) -> Vec<ControlEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn commanded_voltage(&self) -> f64 {
        self.commanded_v
    }

    pub fn target_voltage(&self) -> f64 {
        self.target_v
    }

    pub fn slow_mode(&self) -> bool {
        self.slow_mode
    }

    pub fn is_latched(&self) -> bool {
        self.latched
    }

    pub fn stop_cause(&self) -> Option<StopCause> {
        self.stop_cause
    }

    pub fn ramp(&self) -> Option<&RampProfile> {
        self.ramp.as_ref()
    }

    pub fn pulses(&self) -> PulseFlags {
        self.pulses
    }

    pub fn buttons(&self) -> ButtonsHeld {
        self.buttons
    }

    /// Sticky after the first control sample.
    pub fn ready(&self) -> bool {
        self.ready
    }

    pub fn samples_taken(&self) -> u64 {
        self.sampler.taken()
    }

    pub fn drive_cfg(&self) -> &DriveCfg {
        &self.drive
    }

    pub fn threshold_cfg(&self) -> &ThresholdCfg {
        &self.thresholds
    }

    pub fn ramp_cfg(&self) -> &RampCfg {
        &self.ramps
    }
}
