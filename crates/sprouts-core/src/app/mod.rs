//! Story reader state machine: commands in, narration ticks, a view out.

use std::sync::Arc;

use log::{debug, info, warn};

use crate::{
    catalog::{PageSource, StoryCatalog},
    input::{CommandProvider, ReaderCommand},
    library::{StoryLibrary, StoryShelf},
    narration::{
        HighlightRange, NarrationBackend, NarrationConfig, NarrationEngine, NarrationPhase,
        PlaybackState,
    },
    pages::{NavigationOutcome, PageController, PageControllerConfig},
    settings::{PersistedSettings, ResumeState},
    text_utils::slice_chars,
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TickResult {
    NoRender,
    RenderRequested,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReaderConfig {
    pub narration: NarrationConfig,
    pub pages: PageControllerConfig,
    /// Start narrating page 0 as soon as a story is opened.
    pub autoplay_on_open: bool,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            narration: NarrationConfig::default(),
            pages: PageControllerConfig::default(),
            autoplay_on_open: false,
        }
    }
}

/// What a presentation layer needs to draw the reading screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReaderView<'a> {
    pub title: &'a str,
    pub page_text: &'a str,
    pub highlight: HighlightRange,
    pub highlighted_word: Option<&'a str>,
    pub page: u16,
    pub page_count: u16,
    pub phase: NarrationPhase,
}

pub struct StoryReader<S, B, IN>
where
    S: PageSource,
    B: NarrationBackend,
    IN: CommandProvider,
{
    engine: NarrationEngine<S, B>,
    pages: PageController,
    input: IN,
    config: ReaderConfig,
    story_index: Option<u16>,
    pending_redraw: bool,
}

include!("view.rs");
include!("input.rs");
include!("runtime.rs");
include!("navigation.rs");

#[cfg(test)]
mod tests;
