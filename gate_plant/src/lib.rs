#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Simulated gate mechanics.
//!
//! `PlantModel` owns leaf position and integrates it from the commanded drive
//! voltage. Limit switches are derived from position on every read; obstacle
//! flags and force are set from outside and only read by the controller.

pub mod error;

use gate_traits::{Direction, LimitSwitches, Obstacle, Plant, SensorSnapshot};

use crate::error::{PlantError, Result};

/// Mechanical parameters of the simulated gate.
#[derive(Debug, Clone, PartialEq)]
pub struct PlantParams {
    /// Position at which the first open-side switch asserts (`p_o1`).
    pub open1: f64,
    /// Position at which the final open-side switch asserts (`p_o2`).
    pub open2: f64,
    /// Position at or below which the first close-side switch asserts (`p_c1`).
    pub close1: f64,
    /// Position at or below which the final close-side switch asserts (`p_c2`).
    pub close2: f64,
    /// Drive voltage that yields base speed.
    pub nominal_v: f64,
    /// Seconds for a full 0..1 travel at nominal voltage.
    pub full_travel_s: f64,
    /// Upper clamp on commanded/nominal in the speed law.
    pub max_speed_ratio: f64,
    /// Upper bound of the force range (`Fmax`).
    pub force_max: f64,
}

impl Default for PlantParams {
    fn default() -> Self {
        Self {
            open1: 0.80,
            open2: 1.00,
            close1: 0.20,
            close2: 0.00,
            nominal_v: 116.0,
            full_travel_s: 30.0,
            max_speed_ratio: 1.2,
            force_max: 120.0,
        }
    }
}

impl PlantParams {
    pub fn validate(&self) -> Result<()> {
        let in_unit = |x: f64| (0.0..=1.0).contains(&x);
        if !(in_unit(self.open1) && in_unit(self.open2) && in_unit(self.close1) && in_unit(self.close2))
        {
            return Err(PlantError::InvalidParams("travel thresholds must lie in [0, 1]"));
        }
        if self.open1 >= self.open2 {
            return Err(PlantError::InvalidParams("open1 must be < open2"));
        }
        if self.close2 >= self.close1 {
            return Err(PlantError::InvalidParams("close2 must be < close1"));
        }
        if self.close1 >= self.open1 {
            return Err(PlantError::InvalidParams("close1 must be < open1"));
        }
        if !(self.nominal_v.is_finite() && self.nominal_v > 0.0) {
            return Err(PlantError::InvalidParams("nominal_v must be > 0"));
        }
        if !(self.full_travel_s.is_finite() && self.full_travel_s > 0.0) {
            return Err(PlantError::InvalidParams("full_travel_s must be > 0"));
        }
        if !(self.max_speed_ratio.is_finite() && self.max_speed_ratio >= 1.0) {
            return Err(PlantError::InvalidParams("max_speed_ratio must be >= 1"));
        }
        if !(self.force_max.is_finite() && self.force_max > 0.0) {
            return Err(PlantError::InvalidParams("force_max must be > 0"));
        }
        Ok(())
    }

    /// Travel fraction per second at nominal voltage.
    #[inline]
    pub fn base_speed(&self) -> f64 {
        1.0 / self.full_travel_s
    }
}

/// The simulated gate.
#[derive(Debug, Clone)]
pub struct PlantModel {
    params: PlantParams,
    position: f64,
    obstacle1: bool,
    obstacle2: bool,
    force: f64,
}

impl PlantModel {
    /// A closed, unobstructed, unloaded gate.
    pub fn new(params: PlantParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            params,
            position: 0.0,
            obstacle1: false,
            obstacle2: false,
            force: 0.0,
        })
    }

    /// Start from a given leaf position (clamped to [0, 1]).
    pub fn with_position(mut self, position: f64) -> Self {
        self.position = clamp_unit(position);
        self
    }

    pub fn params(&self) -> &PlantParams {
        &self.params
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn force(&self) -> f64 {
        self.force
    }

    /// Limit switches for the current position.
    pub fn limits(&self) -> LimitSwitches {
        let p = self.position;
        LimitSwitches {
            open1: p >= self.params.open1,
            open2: p >= self.params.open2,
            close1: p <= self.params.close1,
            close2: p <= self.params.close2,
        }
    }
}

impl Plant for PlantModel {
    fn snapshot(&self) -> SensorSnapshot {
        SensorSnapshot {
            position: self.position,
            force: self.force,
            obstacle1: self.obstacle1,
            obstacle2: self.obstacle2,
            limits: self.limits(),
        }
    }

    fn drive(&mut self, dt: f64, volts: f64, direction: Direction) {
        if direction == Direction::None || !(dt.is_finite() && dt > 0.0) {
            return;
        }
        let ratio = if volts.is_finite() {
            (volts / self.params.nominal_v).clamp(0.0, self.params.max_speed_ratio)
        } else {
            0.0
        };
        let before = self.position;
        self.position =
            clamp_unit(before + direction.sign() * ratio * self.params.base_speed() * dt);
        tracing::trace!(
            from = before,
            to = self.position,
            ratio,
            direction = direction.name(),
            "plant step"
        );
    }

    fn set_obstacle(&mut self, which: Obstacle, present: bool) {
        match which {
            Obstacle::First => self.obstacle1 = present,
            Obstacle::Second => self.obstacle2 = present,
        }
    }

    fn obstacle(&self, which: Obstacle) -> bool {
        match which {
            Obstacle::First => self.obstacle1,
            Obstacle::Second => self.obstacle2,
        }
    }

    fn apply_force_delta(&mut self, delta: f64) {
        if !delta.is_finite() {
            return;
        }
        self.force = (self.force + delta).clamp(0.0, self.params.force_max);
    }

    fn reset_sensors(&mut self) {
        self.obstacle1 = false;
        self.obstacle2 = false;
        self.force = 0.0;
    }
}

#[inline]
fn clamp_unit(x: f64) -> f64 {
    if x.is_nan() { 0.0 } else { x.clamp(0.0, 1.0) }
}
