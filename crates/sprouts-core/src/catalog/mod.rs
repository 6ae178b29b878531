//! Story pages and their optional word timings.

mod sample;
mod timing;

use std::{collections::BTreeMap, sync::Arc};

use log::debug;
use thiserror::Error;

pub use sample::{SAMPLE_STORY_PAGES, SAMPLE_STORY_TITLE, sample_story, sample_story_timings};
pub use timing::{PageTimings, TimingDecode, TimingError, WordLookup, WordTiming, decode_timings};

#[derive(Debug, Error, Eq, PartialEq)]
pub enum CatalogError {
    #[error("story has no pages")]
    Empty,
    #[error("story has {0} pages, more than a page index can address")]
    TooManyPages(usize),
}

/// Read-only access to a story's pages, as seen by the narration engine.
pub trait PageSource {
    fn title(&self) -> &str;

    /// Number of pages; always at least one for a valid story.
    fn page_count(&self) -> u16;

    fn page_text(&self, page: u16) -> Option<&str>;

    /// Word timings for a page, `None` when the story ships no timing data for it.
    fn page_timings(&self, page: u16) -> Option<&PageTimings>;
}

/// One page of story text.
#[derive(Clone, Debug, PartialEq)]
pub struct StoryPage {
    text: String,
    timings: Option<PageTimings>,
}

impl StoryPage {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn timings(&self) -> Option<&PageTimings> {
        self.timings.as_ref()
    }
}

/// Immutable story: ordered pages, each with optional timing data.
#[derive(Clone, Debug, PartialEq)]
pub struct StoryCatalog {
    title: String,
    pages: Vec<StoryPage>,
}

impl StoryCatalog {
    /// Build a story from page texts and timing records. Pages that only appear in
    /// the timings get their text from the timed words. Timing pages are zero-based.
    pub fn new(
        title: impl Into<String>,
        page_texts: Vec<String>,
        timings: Vec<WordTiming>,
    ) -> Result<Self, CatalogError> {
        let mut by_page: BTreeMap<u16, Vec<WordTiming>> = BTreeMap::new();
        for timing in timings {
            by_page.entry(timing.page).or_default().push(timing);
        }

        let timed_pages = by_page
            .keys()
            .next_back()
            .map(|last| *last as usize + 1)
            .unwrap_or(0);
        let page_total = page_texts.len().max(timed_pages);
        if page_total == 0 {
            return Err(CatalogError::Empty);
        }
        if page_total > u16::MAX as usize {
            return Err(CatalogError::TooManyPages(page_total));
        }

        let mut texts = page_texts.into_iter();
        let mut pages = Vec::with_capacity(page_total);
        for page in 0..page_total as u16 {
            let timings = by_page.remove(&page).map(PageTimings::from_words);
            let text = match texts.next() {
                Some(text) => text,
                None => timings
                    .as_ref()
                    .map(PageTimings::joined_text)
                    .unwrap_or_default(),
            };
            pages.push(StoryPage { text, timings });
        }

        let title = title.into();
        debug!(
            "catalog: story={:?} pages={} timed_pages={}",
            title,
            pages.len(),
            pages.iter().filter(|page| page.timings.is_some()).count()
        );

        Ok(Self { title, pages })
    }

    /// Story narrated only from text, with no timing data.
    pub fn from_text(
        title: impl Into<String>,
        page_texts: Vec<String>,
    ) -> Result<Self, CatalogError> {
        Self::new(title, page_texts, Vec::new())
    }

    pub fn page(&self, page: u16) -> Option<&StoryPage> {
        self.pages.get(page as usize)
    }

    pub fn pages(&self) -> &[StoryPage] {
        &self.pages
    }
}

impl PageSource for StoryCatalog {
    fn title(&self) -> &str {
        &self.title
    }

    fn page_count(&self) -> u16 {
        self.pages.len() as u16
    }

    fn page_text(&self, page: u16) -> Option<&str> {
        self.page(page).map(StoryPage::text)
    }

    fn page_timings(&self, page: u16) -> Option<&PageTimings> {
        self.page(page).and_then(StoryPage::timings)
    }
}

impl<T: PageSource + ?Sized> PageSource for Arc<T> {
    fn title(&self) -> &str {
        (**self).title()
    }

    fn page_count(&self) -> u16 {
        (**self).page_count()
    }

    fn page_text(&self, page: u16) -> Option<&str> {
        (**self).page_text(page)
    }

    fn page_timings(&self, page: u16) -> Option<&PageTimings> {
        (**self).page_timings(page)
    }
}
