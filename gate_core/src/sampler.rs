//! Fixed-period control sampling, decoupled from the caller's tick rate.
//!
//! Elapsed time accumulates across ticks; every whole period in the
//! accumulator is one control cycle. A long tick may yield several cycles,
//! a short one none.

// Float drift from summing many small dt.
const PERIOD_SLACK_S: f64 = 1e-9;

/// Upper bound on control cycles run for a single tick.
pub const MAX_CYCLES_PER_TICK: u32 = 10_000;

#[derive(Debug, Clone, PartialEq)]
pub struct FixedRateSampler {
    period_s: f64,
    accumulated_s: f64,
    taken: u64,
}

impl FixedRateSampler {
    /// `period_s` must be positive and finite; the builder checks this.
    pub fn new(period_s: f64) -> Self {
        Self {
            period_s,
            accumulated_s: 0.0,
            taken: 0,
        }
    }

    /// Add `dt` seconds and return how many periods are now due.
    ///
    /// At most [`MAX_CYCLES_PER_TICK`] are returned; whole periods beyond
    /// that are discarded with a warning rather than replayed.
    pub fn accumulate(&mut self, dt: f64) -> u32 {
        if dt.is_finite() && dt > 0.0 {
            self.accumulated_s += dt;
        }
        let periods = ((self.accumulated_s + PERIOD_SLACK_S) / self.period_s).floor();
        if !(periods >= 1.0) {
            return 0;
        }
        self.accumulated_s = (self.accumulated_s - periods * self.period_s).max(0.0);
        let due = if periods > f64::from(MAX_CYCLES_PER_TICK) {
            tracing::warn!(
                due = periods,
                kept = MAX_CYCLES_PER_TICK,
                "tick too long, dropping control cycles"
            );
            MAX_CYCLES_PER_TICK
        } else {
            periods as u32
        };
        self.taken = self.taken.saturating_add(u64::from(due));
        due
    }

    pub fn period_s(&self) -> f64 {
        self.period_s
    }

    /// Time carried over toward the next sample.
    pub fn pending_s(&self) -> f64 {
        self.accumulated_s
    }

    /// Total samples taken so far.
    pub fn taken(&self) -> u64 {
        self.taken
    }
}
