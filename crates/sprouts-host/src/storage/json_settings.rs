//! Settings persisted as a small JSON document next to the user's data.

use std::path::{Path, PathBuf};

use log::{debug, warn};
use sprouts_core::settings::{PersistedSettings, SettingsStore};

#[derive(Debug, thiserror::Error)]
pub enum SettingsStoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Clone, Debug)]
pub struct JsonSettingsStore {
    path: PathBuf,
}

impl JsonSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn staging_path(&self) -> PathBuf {
        let mut staging = self.path.clone().into_os_string();
        staging.push(".tmp");
        PathBuf::from(staging)
    }
}

impl SettingsStore for JsonSettingsStore {
    type Error = SettingsStoreError;

    /// A missing file means nothing was saved yet. A corrupted one is reported
    /// as an error so the caller can fall back to defaults.
    fn load(&mut self) -> Result<Option<PersistedSettings>, Self::Error> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!("settings: no file at {:?}", self.path);
                return Ok(None);
            }
            Err(err) => return Err(err.into()),
        };

        let settings: PersistedSettings = serde_json::from_str(&contents)?;
        if !settings.rate.is_finite() {
            warn!("settings: stored rate {} ignored", settings.rate);
            return Ok(Some(PersistedSettings::default().with_resume(settings.resume)));
        }
        Ok(Some(settings))
    }

    fn save(&mut self, settings: &PersistedSettings) -> Result<(), Self::Error> {
        let serialized = serde_json::to_string_pretty(settings)?;
        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        // Readers only ever see the old file or the complete new one.
        let staging = self.staging_path();
        std::fs::write(&staging, serialized)?;
        std::fs::rename(&staging, &self.path)?;
        debug!("settings: saved to {:?}", self.path);
        Ok(())
    }
}
