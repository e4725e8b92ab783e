//! Bounded, time-stamped operator log, newest entry first.

use std::collections::VecDeque;
use std::fmt;

use crate::status::ControlEvent;

#[derive(Debug, Clone, PartialEq)]
pub struct LogLine {
    /// Simulation time (s) when the line was recorded.
    pub at_s: f64,
    pub text: String,
}

impl fmt::Display for LogLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = if self.at_s.is_finite() && self.at_s > 0.0 {
            self.at_s as u64
        } else {
            0
        };
        write!(f, "[{:02}:{:02}] {}", secs / 60, secs % 60, self.text)
    }
}

#[derive(Debug, Clone)]
pub struct EventLog {
    lines: VecDeque<LogLine>,
    capacity: usize,
}

impl EventLog {
    /// A zero capacity is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            lines: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, at_s: f64, text: impl Into<String>) {
        self.lines.push_front(LogLine {
            at_s,
            text: text.into(),
        });
        self.lines.truncate(self.capacity);
    }

    pub fn record(&mut self, at_s: f64, event: &ControlEvent) {
        self.push(at_s, event.to_string());
    }

    /// Newest first.
    pub fn iter(&self) -> impl Iterator<Item = &LogLine> {
        self.lines.iter()
    }

    /// Rendered lines, newest first.
    pub fn rendered(&self) -> Vec<String> {
        self.lines.iter().map(ToString::to_string).collect()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_newest_up_to_capacity() {
        let mut log = EventLog::new(3);
        for i in 0..5 {
            log.push(f64::from(i), format!("line {i}"));
        }
        assert_eq!(log.len(), 3);
        let texts: Vec<_> = log.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, ["line 4", "line 3", "line 2"]);
    }

    #[test]
    fn timestamp_is_minutes_and_seconds() {
        let mut log = EventLog::new(1);
        log.push(125.9, "x");
        assert_eq!(log.rendered(), ["[02:05] x"]);
    }
}
