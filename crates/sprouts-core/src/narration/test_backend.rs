//! Deterministic backend for engine and app tests.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use super::{BackendEvent, HighlightSource, NarrationBackend, PageRequest, PreparedPage};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Status {
    Idle,
    Playing,
    Paused,
}

#[derive(Debug)]
pub(crate) struct ScriptedBackend {
    pub(crate) source: HighlightSource,
    pub(crate) missing_pages: BTreeSet<u16>,
    pub(crate) end_positions: BTreeMap<u16, u64>,
    pub(crate) events: VecDeque<BackendEvent>,
    pub(crate) prepare_calls: u32,
    pub(crate) stop_calls: u32,
    pub(crate) rate: f32,
    pub(crate) fail_play: bool,
    pub(crate) start_override_ms: Option<u64>,
    page: Option<u16>,
    status: Status,
    start_ms: u64,
    anchor_position_ms: u64,
    anchor_now_ms: u64,
}

impl ScriptedBackend {
    pub(crate) fn timed() -> Self {
        Self::with_source(HighlightSource::Timed)
    }

    pub(crate) fn word_boundary() -> Self {
        Self::with_source(HighlightSource::WordBoundary)
    }

    fn with_source(source: HighlightSource) -> Self {
        Self {
            source,
            missing_pages: BTreeSet::new(),
            end_positions: BTreeMap::new(),
            events: VecDeque::new(),
            prepare_calls: 0,
            stop_calls: 0,
            rate: 1.0,
            fail_play: false,
            start_override_ms: None,
            page: None,
            status: Status::Idle,
            start_ms: 0,
            anchor_position_ms: 0,
            anchor_now_ms: 0,
        }
    }

    pub(crate) fn is_playing(&self) -> bool {
        self.status == Status::Playing
    }

    pub(crate) fn page(&self) -> Option<u16> {
        self.page
    }
}

impl NarrationBackend for ScriptedBackend {
    type Error = &'static str;

    fn prepare(&mut self, request: PageRequest<'_>) -> Result<Option<PreparedPage>, Self::Error> {
        self.prepare_calls += 1;
        if self.missing_pages.contains(&request.page) {
            self.page = None;
            return Ok(None);
        }

        self.page = Some(request.page);
        self.status = Status::Idle;
        self.start_ms = self.start_override_ms.unwrap_or_else(|| {
            request
                .timings
                .and_then(|timings| timings.first_start_sec())
                .map(|sec| (sec * 1_000.0).ceil() as u64)
                .unwrap_or(0)
        });
        Ok(Some(PreparedPage {
            end_position_ms: self.end_positions.get(&request.page).copied(),
        }))
    }

    fn highlight_source(&self) -> HighlightSource {
        self.source
    }

    fn play(&mut self, now_ms: u64) -> Result<(), Self::Error> {
        if self.fail_play {
            return Err("play failed");
        }
        self.status = Status::Playing;
        self.anchor_position_ms = self.start_ms;
        self.anchor_now_ms = now_ms;
        Ok(())
    }

    fn pause(&mut self, now_ms: u64) -> Result<(), Self::Error> {
        self.anchor_position_ms = self.position_ms(now_ms);
        self.anchor_now_ms = now_ms;
        self.status = Status::Paused;
        Ok(())
    }

    fn resume(&mut self, now_ms: u64) -> Result<(), Self::Error> {
        self.anchor_now_ms = now_ms;
        self.status = Status::Playing;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), Self::Error> {
        self.stop_calls += 1;
        self.status = Status::Idle;
        Ok(())
    }

    fn set_rate(&mut self, rate: f32) {
        self.rate = rate;
    }

    fn position_ms(&self, now_ms: u64) -> u64 {
        match self.status {
            Status::Playing => {
                self.anchor_position_ms + now_ms.saturating_sub(self.anchor_now_ms)
            }
            Status::Paused => self.anchor_position_ms,
            Status::Idle => 0,
        }
    }

    fn poll_event(&mut self, _now_ms: u64) -> Result<Option<BackendEvent>, Self::Error> {
        Ok(self.events.pop_front())
    }
}
