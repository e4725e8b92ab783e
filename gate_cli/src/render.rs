//! Text and JSON rendering of simulation output.

use gate_core::{ControlEvent, Diagnostics, LogLine};
use serde::Serialize;

/// One fixed-width status line per printed tick.
pub fn status_line(d: &Diagnostics) -> String {
    format!(
        "t={:7.2}s {:<8} dir={:<5} U={:6.1}V ->{:6.1}V code={:3} pos={:.3} F={:5.1} slow={} latch={} in={} out={}",
        d.t_s,
        d.state.name(),
        d.direction.name(),
        d.commanded_v,
        d.target_v,
        d.voltage_code,
        d.position,
        d.force,
        u8::from(d.slow_mode),
        u8::from(d.latched),
        port_bits(d.ports.input),
        port_bits(d.ports.output),
    )
}

/// `0b1000_0001_0111_1011`-style rendering, most significant nibble first.
pub fn port_bits(word: u16) -> String {
    let bits = format!("{word:016b}");
    let nibbles: Vec<&str> = (0..4).map(|i| &bits[i * 4..i * 4 + 4]).collect();
    format!("0b{}", nibbles.join("_"))
}

pub fn event_line(at_s: f64, event: &ControlEvent) -> String {
    LogLine {
        at_s,
        text: event.to_string(),
    }
    .to_string()
}

#[derive(Serialize)]
struct TickLine<'a> {
    #[serde(flatten)]
    diagnostics: &'a Diagnostics,
    cycles: u32,
    events: Vec<String>,
}

pub fn tick_json(d: &Diagnostics, cycles: u32, events: &[ControlEvent]) -> String {
    let line = TickLine {
        diagnostics: d,
        cycles,
        events: events.iter().map(ToString::to_string).collect(),
    };
    serde_json::to_string(&line).unwrap_or_else(|e| format!("{{\"error\":\"{e}\"}}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_bits_groups_nibbles() {
        assert_eq!(port_bits(0x817B), "0b1000_0001_0111_1011");
        assert_eq!(port_bits(0), "0b0000_0000_0000_0000");
    }

    #[test]
    fn event_line_is_timestamped() {
        assert_eq!(
            event_line(65.0, &ControlEvent::SensorsReset),
            "[01:05] sensors reset"
        );
    }
}
