//! Millisecond clocks for driving the reader's tick loop.

use std::time::Instant;

pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Wall-clock time since construction.
#[derive(Clone, Copy, Debug)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Manually advanced clock for runs that should not wait in real time.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SimulatedClock {
    now_ms: u64,
}

impl SimulatedClock {
    pub const fn new() -> Self {
        Self { now_ms: 0 }
    }

    pub fn advance(&mut self, delta_ms: u64) -> u64 {
        self.now_ms = self.now_ms.saturating_add(delta_ms);
        self.now_ms
    }
}

impl Clock for SimulatedClock {
    fn now_ms(&self) -> u64 {
        self.now_ms
    }
}
