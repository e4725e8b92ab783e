//! 16-bit I/O port words exchanged with the (simulated) controller board.
//!
//! Input port (300h), read by the controller:
//!
//! | bits | meaning                         |
//! |------|---------------------------------|
//! | 7..0 | force ADC code                  |
//! | 8    | open limit 1                    |
//! | 9    | open limit 2                    |
//! | 10   | close limit 1                   |
//! | 11   | close limit 2                   |
//! | 12   | obstacle (either sensor)        |
//! | 13   | open button held                |
//! | 14   | close button held               |
//! | 15   | ready (set after first sample)  |
//!
//! Output port (301h), written by the controller:
//!
//! | bits  | meaning                        |
//! |-------|--------------------------------|
//! | 7..0  | drive DAC code                 |
//! | 8     | direction, 1 = open            |
//! | 13..9 | reserved, always 0             |
//! | 14    | ramp armed this tick (pulse)   |
//! | 15    | sample taken this tick (pulse) |

use bitflags::bitflags;
use gate_traits::{Direction, LimitSwitches, SensorSnapshot};
use serde::Serialize;

/// Low byte of either port.
pub const CODE_MASK: u16 = 0x00FF;

bitflags! {
    /// Status bits of the input port.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct InputFlags: u16 {
        const LIMIT_OPEN1  = 1 << 8;
        const LIMIT_OPEN2  = 1 << 9;
        const LIMIT_CLOSE1 = 1 << 10;
        const LIMIT_CLOSE2 = 1 << 11;
        /// Either obstacle sensor.
        const OBSTACLE     = 1 << 12;
        const OPEN_HELD    = 1 << 13;
        const CLOSE_HELD   = 1 << 14;
        /// Sticky once the first control sample has been taken.
        const READY        = 1 << 15;
    }
}

bitflags! {
    /// Status bits of the output port.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct OutputFlags: u16 {
        const DIRECTION_OPEN = 1 << 8;
        /// A new ramp was armed during this tick.
        const RAMP_ARMED     = 1 << 14;
        /// A control sample was taken during this tick.
        const SAMPLE_TAKEN   = 1 << 15;
    }
}

/// One-tick edge flags. Cleared at the start of every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PulseFlags {
    pub ramp_armed: bool,
    pub sample_taken: bool,
}

/// Latched operator buttons (KO / KZ).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ButtonsHeld {
    pub open: bool,
    pub close: bool,
}

/// Both port words for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PortWords {
    pub input: u16,
    pub output: u16,
}

#[inline]
fn code_byte(code: u32) -> u16 {
    // Saturate: a wide code must never spill into the flag bits.
    code.min(u32::from(CODE_MASK)) as u16
}

pub fn encode_input(
    force_code: u32,
    sensors: &SensorSnapshot,
    buttons: ButtonsHeld,
    ready: bool,
) -> u16 {
    let l = &sensors.limits;
    let mut flags = InputFlags::empty();
    flags.set(InputFlags::LIMIT_OPEN1, l.open1);
    flags.set(InputFlags::LIMIT_OPEN2, l.open2);
    flags.set(InputFlags::LIMIT_CLOSE1, l.close1);
    flags.set(InputFlags::LIMIT_CLOSE2, l.close2);
    flags.set(InputFlags::OBSTACLE, sensors.obstacle_any());
    flags.set(InputFlags::OPEN_HELD, buttons.open);
    flags.set(InputFlags::CLOSE_HELD, buttons.close);
    flags.set(InputFlags::READY, ready);
    code_byte(force_code) | flags.bits()
}

pub fn encode_output(voltage_code: u32, direction: Direction, pulses: PulseFlags) -> u16 {
    let mut flags = OutputFlags::empty();
    flags.set(OutputFlags::DIRECTION_OPEN, direction == Direction::Open);
    flags.set(OutputFlags::RAMP_ARMED, pulses.ramp_armed);
    flags.set(OutputFlags::SAMPLE_TAKEN, pulses.sample_taken);
    code_byte(voltage_code) | flags.bits()
}

/// Field view of an input word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputPort {
    pub force_code: u8,
    pub limits: LimitSwitches,
    pub obstacle: bool,
    pub buttons: ButtonsHeld,
    pub ready: bool,
}

/// Field view of an output word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OutputPort {
    pub voltage_code: u8,
    pub opening: bool,
    pub pulses: PulseFlags,
}

pub fn decode_input(word: u16) -> InputPort {
    let f = InputFlags::from_bits_truncate(word);
    InputPort {
        force_code: (word & CODE_MASK) as u8,
        limits: LimitSwitches {
            open1: f.contains(InputFlags::LIMIT_OPEN1),
            open2: f.contains(InputFlags::LIMIT_OPEN2),
            close1: f.contains(InputFlags::LIMIT_CLOSE1),
            close2: f.contains(InputFlags::LIMIT_CLOSE2),
        },
        obstacle: f.contains(InputFlags::OBSTACLE),
        buttons: ButtonsHeld {
            open: f.contains(InputFlags::OPEN_HELD),
            close: f.contains(InputFlags::CLOSE_HELD),
        },
        ready: f.contains(InputFlags::READY),
    }
}

/// Reserved bits 9..13 are ignored.
pub fn decode_output(word: u16) -> OutputPort {
    let f = OutputFlags::from_bits_truncate(word);
    OutputPort {
        voltage_code: (word & CODE_MASK) as u8,
        opening: f.contains(OutputFlags::DIRECTION_OPEN),
        pulses: PulseFlags {
            ramp_armed: f.contains(OutputFlags::RAMP_ARMED),
            sample_taken: f.contains(OutputFlags::SAMPLE_TAKEN),
        },
    }
}
