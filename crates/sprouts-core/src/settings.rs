//! Persisted user settings abstraction.

use serde::{Deserialize, Serialize};

/// Reading location restored on the next launch. Playback itself is never
/// persisted; a restored reader always comes back stopped.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ResumeState {
    pub story: u16,
    pub page: u16,
}

/// User-tunable settings that should survive a restart.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PersistedSettings {
    pub rate: f32,
    #[serde(default)]
    pub resume: Option<ResumeState>,
}

impl PersistedSettings {
    pub const fn new(rate: f32) -> Self {
        Self { rate, resume: None }
    }

    pub const fn with_resume(mut self, resume: Option<ResumeState>) -> Self {
        self.resume = resume;
        self
    }
}

impl Default for PersistedSettings {
    fn default() -> Self {
        Self::new(1.0)
    }
}

/// Abstract settings persistence backend.
pub trait SettingsStore {
    type Error;

    fn load(&mut self) -> Result<Option<PersistedSettings>, Self::Error>;
    fn save(&mut self, settings: &PersistedSettings) -> Result<(), Self::Error>;
}

/// Store that keeps settings for the lifetime of the process.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MemorySettingsStore {
    saved: Option<PersistedSettings>,
    save_count: u32,
}

impl MemorySettingsStore {
    pub const fn new() -> Self {
        Self {
            saved: None,
            save_count: 0,
        }
    }

    pub fn save_count(&self) -> u32 {
        self.save_count
    }
}

impl SettingsStore for MemorySettingsStore {
    type Error = core::convert::Infallible;

    fn load(&mut self) -> Result<Option<PersistedSettings>, Self::Error> {
        Ok(self.saved)
    }

    fn save(&mut self, settings: &PersistedSettings) -> Result<(), Self::Error> {
        self.saved = Some(*settings);
        self.save_count = self.save_count.saturating_add(1);
        Ok(())
    }
}
