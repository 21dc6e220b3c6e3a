//! Monotonic frame clock for real hosts.
//!
//! The engine itself consumes plain `now: f64` seconds, so tests drive it
//! with a virtual clock. Hosts that tick from a display link use this
//! adapter, which clamps pathological frame gaps (app suspension) so a
//! resumed field does not burst-process minutes of catch-up ticks.

use std::time::Instant;

/// Maximum wall-clock gap credited to a single frame
const MAX_FRAME_SECONDS: f64 = 0.25;

pub struct FrameClock {
    last_instant: Instant,
    now: f64,
    first_tick: bool,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last_instant: Instant::now(),
            now: 0.0,
            first_tick: true,
        }
    }

    /// Advance the clock and return the new engine time in seconds.
    /// Call once per frame.
    pub fn tick(&mut self) -> f64 {
        let instant = Instant::now();
        if self.first_tick {
            self.first_tick = false;
            self.last_instant = instant;
            return self.now;
        }
        let elapsed = instant.duration_since(self.last_instant).as_secs_f64();
        self.last_instant = instant;
        self.now += elapsed.min(MAX_FRAME_SECONDS);
        self.now
    }

    /// Engine time as of the last tick
    pub fn now(&self) -> f64 {
        self.now
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
