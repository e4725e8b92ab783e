//! Linear voltage ramp between two levels over a fixed duration.

/// Floor for ramp durations; a zero or negative request becomes a near-step.
pub const MIN_RAMP_DURATION_S: f64 = 1e-6;

// Float drift from summing many small dt.
const COMPLETION_SLACK_S: f64 = 1e-9;

/// `value = start + (end - start) * clamp(elapsed / duration, 0, 1)`.
///
/// `step` reports completion exactly once: on the step where `elapsed`
/// reaches `duration`. After that the ramp is inactive and holds `end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RampProfile {
    start: f64,
    end: f64,
    duration: f64,
    elapsed: f64,
    active: bool,
}

impl RampProfile {
    pub fn start(from: f64, to: f64, duration_s: f64) -> Self {
        let duration = if duration_s.is_finite() && duration_s > 0.0 {
            duration_s
        } else {
            MIN_RAMP_DURATION_S
        };
        Self {
            start: from,
            end: to,
            duration,
            elapsed: 0.0,
            active: true,
        }
    }

    pub fn value(&self) -> f64 {
        if self.elapsed >= self.duration {
            return self.end;
        }
        let frac = (self.elapsed / self.duration).clamp(0.0, 1.0);
        self.start + (self.end - self.start) * frac
    }

    /// Advance by `dt` seconds; returns `(value, just_completed)`.
    ///
    /// Negative or non-finite `dt` advances nothing.
    pub fn step(&mut self, dt: f64) -> (f64, bool) {
        if !self.active {
            return (self.end, false);
        }
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };
        self.elapsed += dt;
        if self.elapsed + COMPLETION_SLACK_S >= self.duration {
            self.elapsed = self.duration;
            self.active = false;
            return (self.end, true);
        }
        (self.value(), false)
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }
}
