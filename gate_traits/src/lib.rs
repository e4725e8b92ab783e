//! Types shared across the controller/plant seam.
//!
//! The controller only ever sees the plant through [`Plant`]; the plant only
//! ever sees the controller through the voltage and [`Direction`] handed to
//! [`Plant::drive`].

pub mod clock;

pub use clock::{Clock, MonotonicClock};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Travel direction of the gate leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    #[default]
    None,
    Open,
    Close,
}

impl Direction {
    /// Sign applied to position integration: +1 opening, -1 closing, 0 otherwise.
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            Direction::None => 0.0,
            Direction::Open => 1.0,
            Direction::Close => -1.0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Direction::None => "none",
            Direction::Open => "open",
            Direction::Close => "close",
        }
    }
}

/// One of the two obstacle (ultrasonic) sensors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Obstacle {
    First,
    Second,
}

impl Obstacle {
    /// 1-based sensor number as printed on the panel.
    pub fn index(self) -> u8 {
        match self {
            Obstacle::First => 1,
            Obstacle::Second => 2,
        }
    }
}

/// The four travel-limit switches, derived from position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LimitSwitches {
    pub open1: bool,
    pub open2: bool,
    pub close1: bool,
    pub close2: bool,
}

impl LimitSwitches {
    /// `(first, second)` switches that bound travel in `dir`.
    /// Both are false when the gate is not moving.
    #[inline]
    pub fn for_direction(&self, dir: Direction) -> (bool, bool) {
        match dir {
            Direction::Open => (self.open1, self.open2),
            Direction::Close => (self.close1, self.close2),
            Direction::None => (false, false),
        }
    }
}

/// Immutable sensor read handed to the controller once per tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SensorSnapshot {
    /// 0.0 fully closed .. 1.0 fully open.
    pub position: f64,
    /// Mechanical force/stress on the leaves (kgf/mm²).
    pub force: f64,
    pub obstacle1: bool,
    pub obstacle2: bool,
    pub limits: LimitSwitches,
}

impl SensorSnapshot {
    #[inline]
    pub fn obstacle_any(&self) -> bool {
        self.obstacle1 || self.obstacle2
    }
}

/// Physical side of the simulation.
///
/// Sensor setters are driven by the operator/input collaborator; `drive` is
/// driven by the controller. Neither side can reach the other's state.
pub trait Plant {
    fn snapshot(&self) -> SensorSnapshot;
    /// Integrate motion over `dt` seconds at `volts` in `direction`.
    fn drive(&mut self, dt: f64, volts: f64, direction: Direction);
    fn set_obstacle(&mut self, which: Obstacle, present: bool);
    fn obstacle(&self, which: Obstacle) -> bool;
    /// Add `delta` to the sensed force (clamped to the plant's range).
    fn apply_force_delta(&mut self, delta: f64);
    /// Clear both obstacles and zero the force.
    fn reset_sensors(&mut self);
}

impl<P: Plant + ?Sized> Plant for Box<P> {
    fn snapshot(&self) -> SensorSnapshot {
        (**self).snapshot()
    }
    fn drive(&mut self, dt: f64, volts: f64, direction: Direction) {
        (**self).drive(dt, volts, direction)
    }
    fn set_obstacle(&mut self, which: Obstacle, present: bool) {
        (**self).set_obstacle(which, present)
    }
    fn obstacle(&self, which: Obstacle) -> bool {
        (**self).obstacle(which)
    }
    fn apply_force_delta(&mut self, delta: f64) {
        (**self).apply_force_delta(delta)
    }
    fn reset_sensors(&mut self) {
        (**self).reset_sensors()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limits_follow_direction() {
        let l = LimitSwitches {
            open1: true,
            open2: false,
            close1: false,
            close2: true,
        };
        assert_eq!(l.for_direction(Direction::Open), (true, false));
        assert_eq!(l.for_direction(Direction::Close), (false, true));
        assert_eq!(l.for_direction(Direction::None), (false, false));
    }

    #[test]
    fn direction_sign() {
        assert_eq!(Direction::Open.sign(), 1.0);
        assert_eq!(Direction::Close.sign(), -1.0);
        assert_eq!(Direction::None.sign(), 0.0);
    }
}
