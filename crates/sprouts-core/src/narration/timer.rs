//! Timer slots owned by the narration engine. Each kind has a single slot, so
//! arming a timer always replaces the previous one.

/// Recurring position poll.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct PollTimer {
    generation: u32,
    interval_ms: u64,
    next_due_ms: u64,
}

/// One-shot stop when the audio position reaches the end of the page.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct AutoStop {
    at_position_ms: u64,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct TimerSlots {
    poll: Option<PollTimer>,
    auto_stop: Option<AutoStop>,
    generation: u32,
}

impl TimerSlots {
    pub const fn new() -> Self {
        Self {
            poll: None,
            auto_stop: None,
            generation: 0,
        }
    }

    /// Arm the position poll; its first tick is due immediately.
    pub fn arm_poll(&mut self, now_ms: u64, interval_ms: u64) -> u32 {
        self.generation = self.generation.wrapping_add(1);
        self.poll = Some(PollTimer {
            generation: self.generation,
            interval_ms: interval_ms.max(1),
            next_due_ms: now_ms,
        });
        self.generation
    }

    pub fn arm_auto_stop(&mut self, at_position_ms: u64) {
        self.auto_stop = Some(AutoStop { at_position_ms });
    }

    pub fn cancel_all(&mut self) {
        self.poll = None;
        self.auto_stop = None;
    }

    /// Consume a due poll tick and schedule the next one.
    pub fn take_poll_due(&mut self, now_ms: u64) -> bool {
        let Some(timer) = self.poll.as_mut() else {
            return false;
        };
        if now_ms < timer.next_due_ms {
            return false;
        }

        // Skip missed ticks instead of replaying them.
        timer.next_due_ms = now_ms.saturating_add(timer.interval_ms);
        true
    }

    pub fn auto_stop_reached(&self, position_ms: u64) -> bool {
        self.auto_stop
            .is_some_and(|stop| position_ms >= stop.at_position_ms)
    }

    pub fn poll_generation(&self) -> Option<u32> {
        self.poll.map(|timer| timer.generation)
    }

    pub fn active_poll_timers(&self) -> usize {
        usize::from(self.poll.is_some())
    }

    pub fn active_timers(&self) -> usize {
        self.active_poll_timers() + usize::from(self.auto_stop.is_some())
    }
}
