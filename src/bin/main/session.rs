use std::{cell::Cell, rc::Rc, thread, time::Duration};

use sprouts_core::{narration::PlaybackState, observe::StateObserver};
use sprouts_host::clock::{Clock, MonotonicClock, SimulatedClock};

pub(super) enum SessionClock {
    Real(MonotonicClock),
    Simulated(SimulatedClock),
}

impl SessionClock {
    pub(super) fn new(fast: bool) -> Self {
        if fast {
            Self::Simulated(SimulatedClock::new())
        } else {
            Self::Real(MonotonicClock::new())
        }
    }

    pub(super) fn now_ms(&self) -> u64 {
        match self {
            Self::Real(clock) => clock.now_ms(),
            Self::Simulated(clock) => clock.now_ms(),
        }
    }

    pub(super) fn wait(&mut self, delta_ms: u64) {
        match self {
            Self::Real(_) => thread::sleep(Duration::from_millis(delta_ms)),
            Self::Simulated(clock) => {
                clock.advance(delta_ms);
            }
        }
    }
}

/// Remembers the last page that finished narrating on its own.
#[derive(Clone, Default)]
pub(super) struct CompletionFlag(Rc<Cell<Option<u16>>>);

impl CompletionFlag {
    pub(super) fn take(&self) -> Option<u16> {
        self.0.take()
    }
}

impl StateObserver for CompletionFlag {
    fn on_state_change(&mut self, _state: &PlaybackState) {}

    fn on_complete(&mut self, page: u16) {
        self.0.set(Some(page));
    }
}

/// Plays the listener's part: once a page is done, wait a moment, then turn
/// the page and tap play.
#[derive(Clone, Copy, Debug, Default)]
pub(super) struct PageTurner {
    turn_at_ms: Option<u64>,
}

impl PageTurner {
    pub(super) fn schedule(&mut self, now_ms: u64, delay_ms: u64) {
        if self.turn_at_ms.is_none() {
            self.turn_at_ms = Some(now_ms + delay_ms);
        }
    }

    #[cfg(test)]
    pub(super) fn is_scheduled(&self) -> bool {
        self.turn_at_ms.is_some()
    }

    pub(super) fn take_due(&mut self, now_ms: u64) -> bool {
        match self.turn_at_ms {
            Some(at) if now_ms >= at => {
                self.turn_at_ms = None;
                true
            }
            _ => false,
        }
    }
}
