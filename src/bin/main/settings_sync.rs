use core::fmt::Debug;

use log::{info, warn};
use sprouts_core::settings::{PersistedSettings, SettingsStore};

use super::SETTINGS_SAVE_DEBOUNCE_MS;

/// Saves settings once they have held still for the debounce window.
pub(super) struct SettingsSyncState {
    last_saved: PersistedSettings,
    pending: Option<(PersistedSettings, u64)>,
}

impl SettingsSyncState {
    pub(super) fn new(initial: PersistedSettings) -> Self {
        Self {
            last_saved: initial,
            pending: None,
        }
    }

    pub(super) fn track_current(&mut self, current: PersistedSettings, now_ms: u64) {
        if current == self.last_saved {
            self.pending = None;
            return;
        }

        match self.pending.as_mut() {
            Some((pending, changed_at_ms)) => {
                if *pending != current {
                    *pending = current;
                    *changed_at_ms = now_ms;
                }
            }
            None => {
                self.pending = Some((current, now_ms));
            }
        }
    }

    pub(super) fn flush_if_due<S>(&mut self, store: Option<&mut S>, now_ms: u64)
    where
        S: SettingsStore,
        S::Error: Debug,
    {
        let Some((_, changed_at_ms)) = self.pending else {
            return;
        };

        if now_ms.saturating_sub(changed_at_ms) < SETTINGS_SAVE_DEBOUNCE_MS {
            return;
        }

        self.flush(store, now_ms);
    }

    /// Save whatever is pending right away, e.g. on shutdown.
    pub(super) fn flush<S>(&mut self, store: Option<&mut S>, now_ms: u64)
    where
        S: SettingsStore,
        S::Error: Debug,
    {
        let Some((candidate, _)) = self.pending else {
            return;
        };

        match store {
            Some(store) => match store.save(&candidate) {
                Ok(()) => {
                    info!(
                        "settings: saved rate={:.2} resume={:?}",
                        candidate.rate, candidate.resume
                    );
                    self.last_saved = candidate;
                    self.pending = None;
                }
                Err(err) => {
                    // Retry after another debounce window.
                    warn!("settings: save failed: {:?}", err);
                    self.pending = Some((candidate, now_ms));
                }
            },
            None => {
                self.last_saved = candidate;
                self.pending = None;
            }
        }
    }

    #[cfg(test)]
    pub(super) fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprouts_core::settings::MemorySettingsStore;

    #[test]
    fn saves_only_after_changes_settle() {
        let mut sync = SettingsSyncState::new(PersistedSettings::default());
        let mut store = MemorySettingsStore::new();

        sync.track_current(PersistedSettings::new(0.8), 0);
        sync.track_current(PersistedSettings::new(0.6), 1_000);
        sync.flush_if_due(Some(&mut store), 2_000);
        assert_eq!(store.save_count(), 0);

        sync.flush_if_due(Some(&mut store), 2_500);
        assert_eq!(store.save_count(), 1);
        assert_eq!(store.load(), Ok(Some(PersistedSettings::new(0.6))));
        assert!(!sync.has_pending());
    }

    #[test]
    fn reverting_before_the_deadline_cancels_the_save() {
        let mut sync = SettingsSyncState::new(PersistedSettings::default());
        let mut store = MemorySettingsStore::new();

        sync.track_current(PersistedSettings::new(0.5), 0);
        sync.track_current(PersistedSettings::default(), 500);
        sync.flush_if_due(Some(&mut store), 5_000);
        assert_eq!(store.save_count(), 0);
    }
}
