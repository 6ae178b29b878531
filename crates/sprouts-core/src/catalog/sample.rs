use super::{CatalogError, StoryCatalog, WordTiming};
use crate::text_utils::{ends_clause, ends_sentence, next_word_at};

pub const SAMPLE_STORY_TITLE: &str = "The Three Little Fairies";

/// Built-in story used when no bundle is supplied.
pub const SAMPLE_STORY_PAGES: [&str; 3] = [
    "Once upon a time, three little fairies lived inside a hollow oak tree. \
Fern was the oldest, Pip was the bravest, and tiny Bell was the most curious of all.",
    "One windy morning Bell found a silver acorn glowing by the roots. \
She called her sisters, and together they wondered where such a shiny thing could come from.",
    "They followed a trail of sparkles to the top of the hill, where a friendly owl \
was waiting. The acorn was his lost lantern, and he thanked them with a song under the stars.",
];

const WORD_SEC: f64 = 0.42;
const CLAUSE_PAUSE_SEC: f64 = 0.25;
const SENTENCE_PAUSE_SEC: f64 = 0.5;
const PAGE_GAP_SEC: f64 = 1.5;

/// Word timings for the sample story laid out as one continuous recording.
pub fn sample_story_timings() -> Vec<WordTiming> {
    let mut timings = Vec::new();
    let mut clock = 0.0f64;
    let mut sequence = 0u32;

    for (page, text) in SAMPLE_STORY_PAGES.iter().enumerate() {
        let mut cursor = 0usize;
        while let Some((word, next_cursor)) = next_word_at(text, cursor) {
            sequence += 1;
            timings.push(WordTiming {
                page: page as u16,
                sequence,
                word: word.to_owned(),
                start_sec: clock,
            });

            clock += WORD_SEC;
            if ends_sentence(word) {
                clock += SENTENCE_PAUSE_SEC;
            } else if ends_clause(word) {
                clock += CLAUSE_PAUSE_SEC;
            }
            cursor = next_cursor;
        }
        clock += PAGE_GAP_SEC;
    }

    timings
}

pub fn sample_story() -> Result<StoryCatalog, CatalogError> {
    let pages = SAMPLE_STORY_PAGES
        .iter()
        .map(|page| (*page).to_owned())
        .collect();

    StoryCatalog::new(SAMPLE_STORY_TITLE, pages, sample_story_timings())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PageSource;

    #[test]
    fn sample_timings_match_page_text() {
        let story = sample_story().unwrap();
        assert_eq!(story.page_count(), 3);

        for page in 0..story.page_count() {
            let timings = story.page_timings(page).unwrap();
            assert!(timings.is_usable());
            assert_eq!(Some(timings.joined_text().as_str()), story.page_text(page));
        }
    }

    #[test]
    fn sample_pages_follow_each_other_in_time() {
        let story = sample_story().unwrap();
        let first_end = story.page_timings(0).unwrap().last_start_sec().unwrap();
        let second_start = story.page_timings(1).unwrap().first_start_sec().unwrap();
        assert!(second_start > first_end);
    }
}
