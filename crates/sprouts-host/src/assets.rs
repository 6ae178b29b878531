//! Story bundles on disk.
//!
//! A bundle is a directory holding `story.json`:
//!
//! ```json
//! {
//!   "title": "The Three Little Fairies",
//!   "pages": ["Once upon a time...", "..."],
//!   "page_origin": 1,
//!   "timings": "timings.json",
//!   "audio": { "file": "narration.m4a", "duration_sec": 62.5 }
//! }
//! ```
//!
//! `pages`, `timings` and `audio` are optional. Missing or unreadable timing
//! and audio files downgrade the story (no highlight, synthesized speech)
//! instead of failing the load.

use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::Deserialize;
use sprouts_core::catalog::{CatalogError, StoryCatalog, WordTiming, decode_timings};

use crate::audio::ClipPlayer;

pub const MANIFEST_FILE: &str = "story.json";

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid manifest {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("story error: {0}")]
    Catalog(#[from] CatalogError),
}

#[derive(Debug, Deserialize)]
struct StoryManifest {
    title: String,
    #[serde(default)]
    pages: Vec<String>,
    #[serde(default = "default_page_origin")]
    page_origin: u16,
    #[serde(default)]
    timings: Option<String>,
    #[serde(default)]
    audio: Option<AudioManifest>,
}

#[derive(Debug, Deserialize)]
struct AudioManifest {
    file: String,
    #[serde(default)]
    duration_sec: Option<f64>,
}

fn default_page_origin() -> u16 {
    1
}

#[derive(Clone, Debug, PartialEq)]
pub struct AudioTrack {
    pub path: PathBuf,
    pub duration_ms: Option<u64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StoryBundle {
    pub catalog: StoryCatalog,
    pub audio: Option<AudioTrack>,
    /// Timing records dropped while decoding.
    pub skipped_timings: usize,
}

impl StoryBundle {
    pub fn load(dir: &Path) -> Result<Self, AssetError> {
        let manifest_path = dir.join(MANIFEST_FILE);
        let contents = std::fs::read_to_string(&manifest_path).map_err(|source| AssetError::Io {
            path: manifest_path.clone(),
            source,
        })?;
        let manifest: StoryManifest =
            serde_json::from_str(&contents).map_err(|source| AssetError::Json {
                path: manifest_path.clone(),
                source,
            })?;

        let (timings, skipped_timings) = match manifest.timings.as_deref() {
            Some(file) => load_timings(&dir.join(file), manifest.page_origin),
            None => (Vec::new(), 0),
        };

        let audio = manifest.audio.and_then(|audio| {
            let path = dir.join(&audio.file);
            if !path.is_file() {
                warn!("assets: audio {:?} missing; narration will be synthesized", path);
                return None;
            }
            let duration_ms = audio
                .duration_sec
                .filter(|sec| sec.is_finite() && *sec > 0.0)
                .map(|sec| (sec * 1_000.0).round() as u64);
            Some(AudioTrack { path, duration_ms })
        });

        let catalog = StoryCatalog::new(manifest.title, manifest.pages, timings)?;
        info!(
            "assets: loaded {:?} pages={} audio={} skipped_timings={}",
            dir,
            catalog.pages().len(),
            audio.is_some(),
            skipped_timings
        );

        Ok(Self {
            catalog,
            audio,
            skipped_timings,
        })
    }

    /// Clip player for the bundle's recording, or a silent one without audio.
    pub fn clip_player(&self) -> ClipPlayer {
        match &self.audio {
            Some(track) => ClipPlayer::from_story(&self.catalog, track.duration_ms),
            None => ClipPlayer::silent(),
        }
    }
}

fn load_timings(path: &Path, page_origin: u16) -> (Vec<WordTiming>, usize) {
    let json = match std::fs::read_to_string(path) {
        Ok(json) => json,
        Err(err) => {
            warn!("assets: timings {:?} unreadable: {}", path, err);
            return (Vec::new(), 0);
        }
    };

    match decode_timings(&json, page_origin) {
        Ok(decoded) => (decoded.timings, decoded.skipped),
        Err(err) => {
            warn!("assets: timings {:?} malformed: {}", path, err);
            (Vec::new(), 0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprouts_core::catalog::PageSource;

    fn bundle_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("sprouts-assets-{}-{}", std::process::id(), name));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn loads_pages_timings_and_audio() {
        let dir = bundle_dir("full");
        std::fs::write(
            dir.join(MANIFEST_FILE),
            r#"{"title": "Snail Mail", "timings": "words.json",
                "audio": {"file": "story.m4a", "duration_sec": 3.0}}"#,
        )
        .unwrap();
        std::fs::write(
            dir.join("words.json"),
            r#"[{"pageNum": 1, "wordNum": 1, "word": "Slow", "sec": 0.2},
                {"pageNum": 1, "wordNum": 2, "word": "mail.", "sec": 0.9},
                {"pageNum": 2, "wordNum": 3, "word": "Arrived!", "sec": 1.8},
                {"pageNum": 2, "wordNum": "x", "word": "oops", "sec": 2.0}]"#,
        )
        .unwrap();
        std::fs::write(dir.join("story.m4a"), b"").unwrap();

        let bundle = StoryBundle::load(&dir).unwrap();
        assert_eq!(bundle.catalog.title(), "Snail Mail");
        assert_eq!(bundle.catalog.page_count(), 2);
        assert_eq!(bundle.catalog.page_text(0), Some("Slow mail."));
        assert_eq!(bundle.skipped_timings, 1);
        assert_eq!(bundle.audio.as_ref().and_then(|track| track.duration_ms), Some(3_000));

        let clips = bundle.clip_player();
        assert_eq!(clips.clip_count(), 2);
        assert_eq!(clips.clip(1).map(|clip| clip.start_ms), Some(1_800));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_timings_and_audio_are_not_fatal() {
        let dir = bundle_dir("text-only");
        std::fs::write(
            dir.join(MANIFEST_FILE),
            r#"{"title": "Rain", "pages": ["Drip drop."], "timings": "gone.json",
                "audio": {"file": "gone.m4a"}}"#,
        )
        .unwrap();

        let bundle = StoryBundle::load(&dir).unwrap();
        assert_eq!(bundle.catalog.page_text(0), Some("Drip drop."));
        assert!(bundle.catalog.page_timings(0).is_none());
        assert!(bundle.audio.is_none());
        assert_eq!(bundle.clip_player().clip_count(), 0);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_manifest_is_an_io_error() {
        let dir = bundle_dir("empty");
        assert!(matches!(StoryBundle::load(&dir), Err(AssetError::Io { .. })));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn story_without_pages_is_rejected() {
        let dir = bundle_dir("no-pages");
        std::fs::write(dir.join(MANIFEST_FILE), r#"{"title": "Blank"}"#).unwrap();
        assert!(matches!(
            StoryBundle::load(&dir),
            Err(AssetError::Catalog(CatalogError::Empty))
        ));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
