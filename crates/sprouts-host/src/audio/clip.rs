//! Simulated player for a pre-recorded narration track.
//!
//! The whole story is one recording; each page owns a window of it starting at
//! its first word and ending where the next page begins (or at the end of the
//! track). Playback position is reported in track time so it lines up with the
//! word timings.

use std::collections::BTreeMap;

use heapless::Deque;
use log::{debug, warn};
use sprouts_core::{
    catalog::PageSource,
    narration::{BackendEvent, HighlightSource, NarrationBackend, PageRequest, PreparedPage},
};

const EVENT_QUEUE_LEN: usize = 4;
/// Tail kept after the last word of the final page when the track length is unknown.
const LAST_CLIP_TAIL_MS: u64 = 1_000;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ClipResource {
    pub start_ms: u64,
    /// `None` leaves the clip open until the recording itself finishes.
    pub end_ms: Option<u64>,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, thiserror::Error)]
pub enum ClipError {
    #[error("no clip prepared")]
    NotPrepared,
    #[error("event queue full")]
    EventQueueFull,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Status {
    Idle,
    Playing,
    Paused,
    Ended,
}

pub struct ClipPlayer {
    clips: BTreeMap<u16, ClipResource>,
    current: Option<(u16, ClipResource)>,
    status: Status,
    anchor_position_ms: u64,
    anchor_now_ms: u64,
    /// Rate requested by the engine; picked up on the next `play` or `resume`.
    requested_rate: f32,
    playing_rate: f32,
    events: Deque<BackendEvent, EVENT_QUEUE_LEN>,
}

impl ClipPlayer {
    pub fn new(clips: BTreeMap<u16, ClipResource>) -> Self {
        Self {
            clips,
            current: None,
            status: Status::Idle,
            anchor_position_ms: 0,
            anchor_now_ms: 0,
            requested_rate: 1.0,
            playing_rate: 1.0,
            events: Deque::new(),
        }
    }

    /// Player with no recording at all; every page falls through to synthesis.
    pub fn silent() -> Self {
        Self::new(BTreeMap::new())
    }

    /// Slice a continuous track into page clips using each page's first word.
    /// Pages without timing data get no clip. Without a track length the last
    /// clip ends `LAST_CLIP_TAIL_MS` after its last word starts.
    pub fn from_story<S: PageSource>(story: &S, track_duration_ms: Option<u64>) -> Self {
        let starts: Vec<(u16, u64, u64)> = (0..story.page_count())
            .filter_map(|page| {
                let timings = story.page_timings(page)?;
                let first = sec_to_ms(timings.first_start_sec()?);
                let last = sec_to_ms(timings.last_start_sec()?);
                Some((page, first, last))
            })
            .collect();

        let mut clips = BTreeMap::new();
        for (index, &(page, start_ms, last_word_ms)) in starts.iter().enumerate() {
            let end_ms = match starts.get(index + 1) {
                Some(&(_, next_start, _)) => next_start,
                None => track_duration_ms.unwrap_or_else(|| {
                    warn!(
                        "clip: track length unknown; page={} ends {}ms after its last word",
                        page, LAST_CLIP_TAIL_MS
                    );
                    last_word_ms + LAST_CLIP_TAIL_MS
                }),
            };
            if end_ms <= start_ms {
                warn!("clip: page={} has an empty clip window; skipping", page);
                continue;
            }
            clips.insert(
                page,
                ClipResource {
                    start_ms,
                    end_ms: Some(end_ms),
                },
            );
        }

        debug!("clip: {} page clips from {} timed pages", clips.len(), starts.len());
        Self::new(clips)
    }

    pub fn clip(&self, page: u16) -> Option<ClipResource> {
        self.clips.get(&page).copied()
    }

    pub fn clip_count(&self) -> usize {
        self.clips.len()
    }

    pub fn playing_rate(&self) -> f32 {
        self.playing_rate
    }

    fn raw_position_ms(&self, now_ms: u64) -> u64 {
        match self.status {
            Status::Playing => {
                let elapsed = now_ms.saturating_sub(self.anchor_now_ms) as f64;
                self.anchor_position_ms + (elapsed * self.playing_rate as f64) as u64
            }
            Status::Paused | Status::Ended => self.anchor_position_ms,
            Status::Idle => 0,
        }
    }

    fn reanchor(&mut self, now_ms: u64) {
        self.anchor_position_ms = self.position_ms(now_ms);
        self.anchor_now_ms = now_ms;
    }
}

fn sec_to_ms(sec: f64) -> u64 {
    (sec * 1_000.0).round() as u64
}

impl NarrationBackend for ClipPlayer {
    type Error = ClipError;

    fn prepare(&mut self, request: PageRequest<'_>) -> Result<Option<PreparedPage>, Self::Error> {
        self.status = Status::Idle;
        self.events.clear();

        let Some(clip) = self.clips.get(&request.page).copied() else {
            self.current = None;
            return Ok(None);
        };

        self.current = Some((request.page, clip));
        Ok(Some(PreparedPage {
            end_position_ms: clip.end_ms,
        }))
    }

    fn highlight_source(&self) -> HighlightSource {
        HighlightSource::Timed
    }

    fn play(&mut self, now_ms: u64) -> Result<(), Self::Error> {
        let (_, clip) = self.current.ok_or(ClipError::NotPrepared)?;
        self.playing_rate = self.requested_rate;
        self.anchor_position_ms = clip.start_ms;
        self.anchor_now_ms = now_ms;
        self.status = Status::Playing;
        Ok(())
    }

    fn pause(&mut self, now_ms: u64) -> Result<(), Self::Error> {
        if self.current.is_none() {
            return Err(ClipError::NotPrepared);
        }
        self.reanchor(now_ms);
        self.status = Status::Paused;
        Ok(())
    }

    fn resume(&mut self, now_ms: u64) -> Result<(), Self::Error> {
        if self.current.is_none() {
            return Err(ClipError::NotPrepared);
        }
        self.anchor_now_ms = now_ms;
        self.playing_rate = self.requested_rate;
        self.status = Status::Playing;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), Self::Error> {
        self.status = Status::Idle;
        self.events.clear();
        Ok(())
    }

    fn set_rate(&mut self, rate: f32) {
        self.requested_rate = rate;
    }

    fn position_ms(&self, now_ms: u64) -> u64 {
        let position = self.raw_position_ms(now_ms);
        match self.current {
            Some((_, ClipResource {
                end_ms: Some(end), ..
            })) => position.min(end),
            _ => position,
        }
    }

    fn poll_event(&mut self, now_ms: u64) -> Result<Option<BackendEvent>, Self::Error> {
        if self.status == Status::Playing
            && let Some((page, ClipResource {
                end_ms: Some(end), ..
            })) = self.current
            && self.raw_position_ms(now_ms) >= end
        {
            self.anchor_position_ms = end;
            self.status = Status::Ended;
            self.events
                .push_back(BackendEvent::Finished { page })
                .map_err(|_| ClipError::EventQueueFull)?;
        }

        Ok(self.events.pop_front())
    }
}
