//! Frame pacing for real-time drivers.
//!
//! Sleeps out the remainder of each frame and reports the measured `dt`, so
//! the simulation sees true elapsed time even when a frame overruns.

use std::time::{Duration, Instant};

use gate_traits::Clock;

const MICROS_PER_SEC: u64 = 1_000_000;

/// Frame period for `hz`, clamped to at least 1 Hz and 1 µs.
#[inline]
pub fn frame_period(hz: u32) -> Duration {
    Duration::from_micros((MICROS_PER_SEC / u64::from(hz.max(1))).max(1))
}

#[derive(Debug)]
pub struct FramePacer<C: Clock> {
    clock: C,
    period: Duration,
    last: Instant,
}

impl<C: Clock> FramePacer<C> {
    pub fn new(clock: C, hz: u32) -> Self {
        let last = clock.now();
        Self {
            clock,
            period: frame_period(hz),
            last,
        }
    }

    /// Wait for the next frame boundary; returns seconds since the previous one.
    pub fn wait_frame(&mut self) -> f64 {
        let busy = self.clock.now().saturating_duration_since(self.last);
        if let Some(rest) = self.period.checked_sub(busy) {
            self.clock.sleep(rest);
        }
        let dt = self.clock.secs_since(self.last);
        self.last = self.clock.now();
        dt
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}
