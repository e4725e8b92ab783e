//! Controller state, operator buttons, and the events the controller emits.

use std::fmt;

use gate_traits::{Direction, Obstacle};
use serde::Serialize;

/// Motion state of the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum GateState {
    #[default]
    Idle,
    Opening,
    Closing,
    /// Emergency stop; cleared only by a button press.
    Stopped,
}

impl GateState {
    pub fn name(self) -> &'static str {
        match self {
            Self::Idle => "IDLE",
            Self::Opening => "OPENING",
            Self::Closing => "CLOSING",
            Self::Stopped => "STOPPED",
        }
    }

    /// States from which a button press starts motion.
    #[inline]
    pub fn accepts_press(self) -> bool {
        matches!(self, Self::Idle | Self::Stopped)
    }
}

impl fmt::Display for GateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopCause {
    Obstacle,
    CriticalForce,
}

/// Operator push buttons (KO / KZ).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Open,
    Close,
}

impl Button {
    pub fn direction(self) -> Direction {
        match self {
            Self::Open => Direction::Open,
            Self::Close => Direction::Close,
        }
    }

    pub fn state(self) -> GateState {
        match self {
            Self::Open => GateState::Opening,
            Self::Close => GateState::Closing,
        }
    }
}

/// Something worth telling the operator about.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ControlEvent {
    MotionStarted { direction: Direction, target_v: f64 },
    EmergencyStop { cause: StopCause, force: f64 },
    SlowModeEntered { force: f64 },
    SlowModeExited { force: f64, target_v: f64 },
    LimitDeceleration { direction: Direction },
    TravelComplete { direction: Direction },
    ObstacleChanged { obstacle: Obstacle, present: bool },
    SensorsReset,
}

impl fmt::Display for ControlEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MotionStarted {
                direction,
                target_v,
            } => write!(f, "{} started, target {target_v:.1} V", verb(*direction)),
            Self::EmergencyStop {
                cause: StopCause::Obstacle,
                ..
            } => f.write_str("EMERGENCY STOP: obstacle detected"),
            Self::EmergencyStop {
                cause: StopCause::CriticalForce,
                force,
            } => write!(f, "EMERGENCY STOP: critical force {force:.1}"),
            Self::SlowModeEntered { force } => write!(f, "slow mode on (force {force:.1})"),
            Self::SlowModeExited { force, target_v } => {
                write!(f, "slow mode off (force {force:.1}), back to {target_v:.1} V")
            }
            Self::LimitDeceleration { direction } => {
                write!(f, "{} limit 1 reached, decelerating", verb(*direction))
            }
            Self::TravelComplete { direction } => {
                write!(f, "{} limit 2 reached, stopping", verb(*direction))
            }
            Self::ObstacleChanged { obstacle, present } => write!(
                f,
                "obstacle {} {}",
                obstacle.index(),
                if *present { "detected" } else { "cleared" }
            ),
            Self::SensorsReset => f.write_str("sensors reset"),
        }
    }
}

fn verb(direction: Direction) -> &'static str {
    match direction {
        Direction::Open => "opening",
        Direction::Close => "closing",
        Direction::None => "motion",
    }
}
