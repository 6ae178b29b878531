//! Subscription contract between the narration engine and the presentation layer.

use heapless::Vec as HeaplessVec;
use log::warn;

use crate::narration::PlaybackState;

pub const MAX_OBSERVERS: usize = 8;

/// Receives engine notifications. Only `on_state_change` is required.
pub trait StateObserver {
    /// Called whenever the playback snapshot differs from the last one delivered.
    fn on_state_change(&mut self, state: &PlaybackState);

    /// Called on every position poll while playing.
    fn on_position_update(&mut self, _page: u16, _position_ms: u64) {}

    /// Called when a page finishes narrating on its own.
    fn on_complete(&mut self, _page: u16) {}
}

/// Adapts a closure into a state-change observer.
pub struct FnObserver<F>(pub F);

impl<F> StateObserver for FnObserver<F>
where
    F: FnMut(&PlaybackState),
{
    fn on_state_change(&mut self, state: &PlaybackState) {
        (self.0)(state)
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct SubscriptionId(u32);

pub(crate) struct Observers {
    entries: HeaplessVec<(SubscriptionId, Box<dyn StateObserver>), MAX_OBSERVERS>,
    next_id: u32,
    last_published: Option<PlaybackState>,
}

impl Observers {
    pub(crate) fn new() -> Self {
        Self {
            entries: HeaplessVec::new(),
            next_id: 1,
            last_published: None,
        }
    }

    /// Register an observer; it immediately receives the latest snapshot.
    pub(crate) fn subscribe(
        &mut self,
        mut observer: Box<dyn StateObserver>,
    ) -> Option<SubscriptionId> {
        if self.entries.is_full() {
            warn!("observe: subscriber limit {} reached", MAX_OBSERVERS);
            return None;
        }

        if let Some(state) = self.last_published.as_ref() {
            observer.on_state_change(state);
        }

        let id = SubscriptionId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.entries.push((id, observer)).ok()?;
        Some(id)
    }

    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let Some(index) = self.entries.iter().position(|(entry, _)| *entry == id) else {
            return false;
        };
        self.entries.swap_remove(index);
        true
    }

    pub(crate) fn publish(&mut self, state: &PlaybackState) {
        if self.last_published.as_ref() == Some(state) {
            return;
        }
        self.last_published = Some(*state);

        for (_, observer) in self.entries.iter_mut() {
            observer.on_state_change(state);
        }
    }

    pub(crate) fn notify_position(&mut self, page: u16, position_ms: u64) {
        for (_, observer) in self.entries.iter_mut() {
            observer.on_position_update(page, position_ms);
        }
    }

    pub(crate) fn notify_complete(&mut self, page: u16) {
        for (_, observer) in self.entries.iter_mut() {
            observer.on_complete(page);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;
    use crate::narration::{HighlightRange, NarrationPhase};

    fn state(page: u16) -> PlaybackState {
        PlaybackState {
            phase: NarrationPhase::Stopped,
            current_page: page,
            position_ms: 0,
            highlight: HighlightRange::EMPTY,
            rate: 1.0,
        }
    }

    #[test]
    fn publishes_only_changed_snapshots() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let mut observers = Observers::new();
        observers
            .subscribe(Box::new(FnObserver(move |s: &PlaybackState| {
                sink.borrow_mut().push(s.current_page)
            })))
            .unwrap();

        observers.publish(&state(0));
        observers.publish(&state(0));
        observers.publish(&state(1));

        assert_eq!(*seen.borrow(), vec![0, 1]);
    }

    #[test]
    fn late_subscriber_gets_current_snapshot_and_can_leave() {
        let seen = Rc::new(RefCell::new(0u32));
        let sink = seen.clone();
        let mut observers = Observers::new();
        observers.publish(&state(2));

        let id = observers
            .subscribe(Box::new(FnObserver(move |_: &PlaybackState| {
                *sink.borrow_mut() += 1
            })))
            .unwrap();
        assert_eq!(*seen.borrow(), 1);

        assert!(observers.unsubscribe(id));
        assert!(!observers.unsubscribe(id));
        observers.publish(&state(3));
        assert_eq!(*seen.borrow(), 1);
    }

    #[test]
    fn subscriber_capacity_is_bounded() {
        let mut observers = Observers::new();
        for _ in 0..MAX_OBSERVERS {
            assert!(
                observers
                    .subscribe(Box::new(FnObserver(|_: &PlaybackState| {})))
                    .is_some()
            );
        }
        assert!(
            observers
                .subscribe(Box::new(FnObserver(|_: &PlaybackState| {})))
                .is_none()
        );
    }
}
