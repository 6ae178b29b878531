//! Gallery of stories the reader can open.

use std::sync::Arc;

use log::debug;

use crate::catalog::{PageSource, StoryCatalog};

/// Read-only list of story titles.
pub trait StoryShelf {
    fn story_count(&self) -> u16;
    fn title_at(&self, index: u16) -> Option<&str>;
}

#[derive(Clone, Debug, Default)]
pub struct StoryLibrary {
    stories: Vec<Arc<StoryCatalog>>,
}

impl StoryLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a story and return its index, or `None` when the shelf is full.
    pub fn add(&mut self, story: StoryCatalog) -> Option<u16> {
        let index = u16::try_from(self.stories.len()).ok()?;
        debug!("library: add story={:?} index={}", story.title(), index);
        self.stories.push(Arc::new(story));
        Some(index)
    }

    pub fn story(&self, index: u16) -> Option<Arc<StoryCatalog>> {
        self.stories.get(index as usize).cloned()
    }

    pub fn find(&self, title: &str) -> Option<u16> {
        self.stories
            .iter()
            .position(|story| story.title().eq_ignore_ascii_case(title))
            .map(|index| index as u16)
    }
}

impl StoryShelf for StoryLibrary {
    fn story_count(&self) -> u16 {
        self.stories.len() as u16
    }

    fn title_at(&self, index: u16) -> Option<&str> {
        self.stories.get(index as usize).map(|story| story.title())
    }
}
