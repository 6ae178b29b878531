//! Word timing records and their per-page index.

use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::narration::HighlightRange;

#[derive(Debug, Error)]
pub enum TimingError {
    #[error("timing JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("timing document must be a JSON array of records")]
    NotAnArray,
}

/// Start time of one narrated word.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WordTiming {
    pub page: u16,
    pub sequence: u32,
    pub word: String,
    pub start_sec: f64,
}

/// Record shape on disk. Field names follow the recorded-narration exporter, with
/// the descriptive names accepted as well.
#[derive(Deserialize)]
struct RawWordTiming {
    #[serde(rename = "pageNum", alias = "page")]
    page: i64,
    #[serde(rename = "wordNum", alias = "sequence")]
    sequence: i64,
    word: String,
    #[serde(rename = "sec", alias = "startSec", alias = "start_sec")]
    start_sec: f64,
}

/// Decoded timing records plus the number of records that were dropped.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TimingDecode {
    pub timings: Vec<WordTiming>,
    pub skipped: usize,
}

/// Decode a JSON array of timing records. Pages in the file are numbered from
/// `page_origin` and come out zero-based. Records that do not decode or carry
/// impossible values are skipped with a warning.
pub fn decode_timings(json: &str, page_origin: u16) -> Result<TimingDecode, TimingError> {
    let document: serde_json::Value = serde_json::from_str(json)?;
    let serde_json::Value::Array(records) = document else {
        return Err(TimingError::NotAnArray);
    };

    let mut decoded = TimingDecode::default();
    for (index, record) in records.into_iter().enumerate() {
        let raw = match serde_json::from_value::<RawWordTiming>(record) {
            Ok(raw) => raw,
            Err(err) => {
                warn!("timing: skip record={} reason={}", index, err);
                decoded.skipped += 1;
                continue;
            }
        };

        match validate_record(raw, page_origin) {
            Ok(timing) => decoded.timings.push(timing),
            Err(reason) => {
                warn!("timing: skip record={} reason={}", index, reason);
                decoded.skipped += 1;
            }
        }
    }

    if decoded.skipped > 0 {
        warn!(
            "timing: decoded={} skipped={}",
            decoded.timings.len(),
            decoded.skipped
        );
    }

    Ok(decoded)
}

fn validate_record(raw: RawWordTiming, page_origin: u16) -> Result<WordTiming, &'static str> {
    let page = raw
        .page
        .checked_sub(page_origin as i64)
        .filter(|page| *page >= 0)
        .ok_or("page before origin")?;
    let page = u16::try_from(page).map_err(|_| "page out of range")?;
    let sequence = u32::try_from(raw.sequence).map_err(|_| "sequence out of range")?;

    if !raw.start_sec.is_finite() || raw.start_sec < 0.0 {
        return Err("invalid start time");
    }

    let word = raw.word.trim();
    if word.is_empty() {
        return Err("empty word");
    }

    Ok(WordTiming {
        page,
        sequence,
        word: word.to_owned(),
        start_sec: raw.start_sec,
    })
}

/// Where a playback position falls within a page's words.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WordLookup {
    /// Position is before the first word starts.
    NotStarted,
    /// Index into the page's words.
    Word(usize),
    /// Position is past the last word plus the end guard.
    Finished,
    /// The page has no usable timing data.
    Unavailable,
}

/// Timing entries for one page, ordered by sequence, with the character span each
/// word occupies in the page text.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PageTimings {
    words: Vec<WordTiming>,
    spans: Vec<HighlightRange>,
    malformed: bool,
}

impl PageTimings {
    pub fn from_words(mut words: Vec<WordTiming>) -> Self {
        words.sort_by_key(|word| word.sequence);

        let malformed = words.windows(2).any(|pair| {
            pair[0].sequence == pair[1].sequence || pair[1].start_sec < pair[0].start_sec
        });
        if malformed {
            let page = words.first().map(|word| word.page).unwrap_or_default();
            warn!(
                "timing: page={} ordering invalid; highlighting disabled for page",
                page
            );
        }

        let mut spans = Vec::with_capacity(words.len());
        let mut offset = 0u32;
        for word in &words {
            let length = word.word.chars().count() as u32;
            spans.push(HighlightRange::new(offset, length));
            offset = offset.saturating_add(length + 1);
        }

        Self {
            words,
            spans,
            malformed,
        }
    }

    pub fn words(&self) -> &[WordTiming] {
        &self.words
    }

    pub fn is_malformed(&self) -> bool {
        self.malformed
    }

    /// Whether highlights can be derived from these timings.
    pub fn is_usable(&self) -> bool {
        !self.malformed && !self.words.is_empty()
    }

    pub fn span(&self, index: usize) -> Option<HighlightRange> {
        self.spans.get(index).copied()
    }

    pub fn first_start_sec(&self) -> Option<f64> {
        self.words.first().map(|word| word.start_sec)
    }

    pub fn last_start_sec(&self) -> Option<f64> {
        self.words.last().map(|word| word.start_sec)
    }

    /// The page's words joined by single spaces, matching the spans.
    pub fn joined_text(&self) -> String {
        let mut text = String::new();
        for (index, word) in self.words.iter().enumerate() {
            if index > 0 {
                text.push(' ');
            }
            text.push_str(&word.word);
        }
        text
    }

    /// Find the word whose interval `[start, next_start)` contains `position_sec`.
    /// The last word stays active until `start + guard_sec`. Words sharing a start
    /// time resolve to the lowest sequence.
    pub fn lookup(&self, position_sec: f64, guard_sec: f64) -> WordLookup {
        if !self.is_usable() {
            return WordLookup::Unavailable;
        }
        if !position_sec.is_finite() {
            return WordLookup::NotStarted;
        }

        let upper = self
            .words
            .partition_point(|word| word.start_sec <= position_sec);
        if upper == 0 {
            return WordLookup::NotStarted;
        }

        let mut index = upper - 1;
        if index == self.words.len() - 1 && position_sec > self.words[index].start_sec + guard_sec
        {
            return WordLookup::Finished;
        }

        while index > 0 && self.words[index - 1].start_sec == self.words[index].start_sec {
            index -= 1;
        }

        WordLookup::Word(index)
    }

    /// Highlight for a position, or the empty range when no word is active.
    pub fn highlight_at(&self, position_sec: f64, guard_sec: f64) -> HighlightRange {
        match self.lookup(position_sec, guard_sec) {
            WordLookup::Word(index) => self.span(index).unwrap_or(HighlightRange::EMPTY),
            _ => HighlightRange::EMPTY,
        }
    }
}
