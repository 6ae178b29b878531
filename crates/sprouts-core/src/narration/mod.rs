//! Narration engine: drives one page of narration at a time and maps the audio
//! position onto the word to highlight.
//!
//! States move `Stopped -> Playing -> {Paused <-> Playing} -> Stopped`. A paused
//! page always resumes where it left off. All work happens inside the calls made
//! by the owner: [`NarrationEngine::tick`] drains backend events, fires the
//! position poll when due and checks the page-end stop.

mod backend;
mod dual;
mod highlight;
mod timer;

#[cfg(test)]
pub(crate) mod test_backend;

use log::{debug, error, info, warn};

pub use backend::{BackendEvent, HighlightSource, NarrationBackend, PageRequest, PreparedPage};
pub use dual::{ActiveBackend, DualBackend, DualBackendError};
pub use highlight::HighlightRange;
pub use timer::TimerSlots;

use crate::{
    catalog::{PageSource, WordLookup},
    observe::{Observers, StateObserver, SubscriptionId},
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NarrationConfig {
    pub tick_interval_ms: u64,
    /// How long the last word of a page stays highlighted before the page counts
    /// as finished.
    pub end_guard_ms: u64,
    pub min_rate: f32,
    pub max_rate: f32,
    pub default_rate: f32,
}

impl Default for NarrationConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 100,
            end_guard_ms: 1_000,
            min_rate: 0.1,
            max_rate: 1.0,
            default_rate: 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum NarrationPhase {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// Observable playback snapshot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaybackState {
    pub phase: NarrationPhase,
    pub current_page: u16,
    pub position_ms: u64,
    pub highlight: HighlightRange,
    pub rate: f32,
}

impl PlaybackState {
    pub const fn is_playing(&self) -> bool {
        matches!(self.phase, NarrationPhase::Playing)
    }

    pub const fn is_paused(&self) -> bool {
        matches!(self.phase, NarrationPhase::Paused)
    }

    pub const fn is_stopped(&self) -> bool {
        matches!(self.phase, NarrationPhase::Stopped)
    }

    pub fn position_sec(&self) -> f64 {
        self.position_ms as f64 / 1_000.0
    }
}

pub struct NarrationEngine<S, B>
where
    S: PageSource,
    B: NarrationBackend,
{
    source: S,
    backend: B,
    config: NarrationConfig,
    state: PlaybackState,
    timers: TimerSlots,
    highlight_source: HighlightSource,
    page_end_ms: Option<u64>,
    /// Page whose resource lookup failed; commands stay inert until the page is
    /// selected again.
    inert_page: Option<u16>,
    observers: Observers,
}

impl<S, B> NarrationEngine<S, B>
where
    S: PageSource,
    B: NarrationBackend,
{
    pub fn new(source: S, mut backend: B, config: NarrationConfig) -> Self {
        let rate = clamp_rate(config.default_rate, &config).unwrap_or(config.max_rate);
        backend.set_rate(rate);
        let highlight_source = backend.highlight_source();

        Self {
            source,
            backend,
            config,
            state: PlaybackState {
                phase: NarrationPhase::Stopped,
                current_page: 0,
                position_ms: 0,
                highlight: HighlightRange::EMPTY,
                rate,
            },
            timers: TimerSlots::new(),
            highlight_source,
            page_end_ms: None,
            inert_page: None,
            observers: Observers::new(),
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn config(&self) -> &NarrationConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn page_count(&self) -> u16 {
        self.source.page_count()
    }

    pub fn current_page_text(&self) -> &str {
        self.source
            .page_text(self.state.current_page)
            .unwrap_or_default()
    }

    pub fn is_inert(&self) -> bool {
        self.inert_page == Some(self.state.current_page)
    }

    pub fn timers(&self) -> &TimerSlots {
        &self.timers
    }

    pub fn subscribe(&mut self, observer: Box<dyn StateObserver>) -> Option<SubscriptionId> {
        self.observers.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Begin narrating `page` from its start. Returns whether playback started.
    pub fn start(&mut self, page: u16, now_ms: u64) -> bool {
        if page >= self.source.page_count() {
            warn!(
                "narration: start rejected page={} page_count={}",
                page,
                self.source.page_count()
            );
            return false;
        }

        self.halt_backend();
        self.timers.cancel_all();
        self.state.phase = NarrationPhase::Stopped;
        self.state.current_page = page;
        self.state.position_ms = 0;
        self.state.highlight = HighlightRange::EMPTY;
        self.page_end_ms = None;
        self.inert_page = None;

        let request = PageRequest {
            page,
            text: self.source.page_text(page).unwrap_or_default(),
            timings: self.source.page_timings(page),
        };

        let prepared = match self.backend.prepare(request) {
            Ok(Some(prepared)) => prepared,
            Ok(None) => {
                warn!("narration: start page={} resource=missing", page);
                self.inert_page = Some(page);
                self.publish();
                return false;
            }
            Err(err) => {
                error!("narration: start page={} prepare failed: {:?}", page, err);
                self.inert_page = Some(page);
                self.publish();
                return false;
            }
        };

        self.highlight_source = self.backend.highlight_source();
        if self.highlight_source == HighlightSource::Timed
            && !self
                .source
                .page_timings(page)
                .is_some_and(|timings| timings.is_usable())
        {
            warn!(
                "narration: page={} has no usable word timings; playing without highlight",
                page
            );
        }

        self.backend.set_rate(self.state.rate);
        if let Err(err) = self.backend.play(now_ms) {
            error!("narration: play failed page={}: {:?}", page, err);
            self.inert_page = Some(page);
            self.publish();
            return false;
        }

        self.state.phase = NarrationPhase::Playing;
        self.state.position_ms = self.backend.position_ms(now_ms);
        self.page_end_ms = prepared.end_position_ms;
        self.arm_timers(now_ms);
        info!(
            "narration: start page={} source={:?} rate={:.2}",
            page, self.highlight_source, self.state.rate
        );
        self.publish();
        true
    }

    /// Pause when playing, resume when paused, start the current page when stopped.
    pub fn toggle(&mut self, now_ms: u64) {
        match self.state.phase {
            NarrationPhase::Playing => {
                if let Err(err) = self.backend.pause(now_ms) {
                    error!("narration: pause failed: {:?}", err);
                    self.stop();
                    return;
                }
                self.state.position_ms = self.backend.position_ms(now_ms);
                self.timers.cancel_all();
                self.state.phase = NarrationPhase::Paused;
                debug!(
                    "narration: pause page={} position_ms={}",
                    self.state.current_page, self.state.position_ms
                );
                self.publish();
            }
            NarrationPhase::Paused => {
                if let Err(err) = self.backend.resume(now_ms) {
                    error!("narration: resume failed: {:?}", err);
                    self.stop();
                    return;
                }
                self.state.phase = NarrationPhase::Playing;
                self.state.position_ms = self
                    .backend
                    .position_ms(now_ms)
                    .max(self.state.position_ms);
                self.arm_timers(now_ms);
                debug!(
                    "narration: resume page={} position_ms={}",
                    self.state.current_page, self.state.position_ms
                );
                self.publish();
            }
            NarrationPhase::Stopped => {
                if self.is_inert() {
                    debug!(
                        "narration: toggle ignored page={} resource unavailable",
                        self.state.current_page
                    );
                    return;
                }
                self.start(self.state.current_page, now_ms);
            }
        }
    }

    /// Halt playback and clear the highlight. Calling it again changes nothing.
    pub fn stop(&mut self) {
        if !self.state.is_stopped() {
            debug!("narration: stop page={}", self.state.current_page);
        }

        self.halt_backend();
        self.timers.cancel_all();
        self.state.phase = NarrationPhase::Stopped;
        self.state.position_ms = 0;
        self.state.highlight = HighlightRange::EMPTY;
        self.page_end_ms = None;
        self.publish();
    }

    /// Stop and make `page` current without starting it. Selecting a page clears a
    /// previous missing-resource condition so the lookup is retried on next start.
    pub fn select_page(&mut self, page: u16) -> bool {
        if page >= self.source.page_count() {
            return false;
        }

        self.stop();
        self.state.current_page = page;
        self.inert_page = None;
        self.publish();
        true
    }

    /// Replace the story being narrated; playback stops and page 0 becomes current.
    pub fn replace_source(&mut self, source: S) {
        self.stop();
        self.source = source;
        self.state.current_page = 0;
        self.inert_page = None;
        self.publish();
    }

    /// Set the narration rate, clamped to the configured range. Non-finite rates
    /// are ignored. Returns the rate in effect.
    pub fn set_rate(&mut self, rate: f32) -> f32 {
        let Some(rate) = clamp_rate(rate, &self.config) else {
            warn!("narration: ignoring invalid rate {}", rate);
            return self.state.rate;
        };

        if rate != self.state.rate {
            debug!("narration: rate {:.2} -> {:.2}", self.state.rate, rate);
            self.state.rate = rate;
            self.backend.set_rate(rate);
            self.publish();
        }
        self.state.rate
    }

    /// Advance the engine to `now_ms`. Returns whether the observable state changed.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        let before = self.state;

        self.drain_backend_events(now_ms);

        if self.state.is_playing() {
            let position_ms = self.backend.position_ms(now_ms);

            if self.timers.auto_stop_reached(position_ms) {
                debug!(
                    "narration: page={} reached clip end at position_ms={}",
                    self.state.current_page, position_ms
                );
                self.complete();
            } else if self.timers.take_poll_due(now_ms) {
                self.poll_position(position_ms);
            }
        }

        self.publish();
        self.state != before
    }

    fn poll_position(&mut self, position_ms: u64) {
        self.state.position_ms = position_ms;
        self.observers
            .notify_position(self.state.current_page, position_ms);

        if self.highlight_source != HighlightSource::Timed {
            return;
        }

        let Some(timings) = self.source.page_timings(self.state.current_page) else {
            return;
        };

        let position_sec = position_ms as f64 / 1_000.0;
        let guard_sec = self.config.end_guard_ms as f64 / 1_000.0;
        match timings.lookup(position_sec, guard_sec) {
            WordLookup::Word(index) => {
                self.state.highlight = timings.span(index).unwrap_or(HighlightRange::EMPTY);
            }
            WordLookup::NotStarted | WordLookup::Unavailable => {
                self.state.highlight = HighlightRange::EMPTY;
            }
            WordLookup::Finished => {
                debug!(
                    "narration: page={} finished at position_ms={}",
                    self.state.current_page, position_ms
                );
                self.complete();
            }
        }
    }

    fn drain_backend_events(&mut self, now_ms: u64) {
        loop {
            match self.backend.poll_event(now_ms) {
                Ok(Some(BackendEvent::WordBoundary { page, range })) => {
                    if self.state.is_playing()
                        && page == self.state.current_page
                        && self.highlight_source == HighlightSource::WordBoundary
                    {
                        self.state.highlight = range;
                    }
                }
                Ok(Some(BackendEvent::Finished { page })) => {
                    if self.state.is_playing() && page == self.state.current_page {
                        self.complete();
                    }
                }
                Ok(None) => break,
                Err(err) => {
                    error!("narration: backend event error: {:?}", err);
                    self.stop();
                    break;
                }
            }
        }
    }

    /// Natural end of a page: same as `stop`, with the page kept current.
    fn complete(&mut self) {
        let page = self.state.current_page;
        self.stop();
        info!("narration: page={} complete", page);
        self.observers.notify_complete(page);
    }

    fn arm_timers(&mut self, now_ms: u64) {
        self.timers.arm_poll(now_ms, self.config.tick_interval_ms);
        if let Some(end_ms) = self.page_end_ms {
            self.timers.arm_auto_stop(end_ms);
        }
    }

    fn halt_backend(&mut self) {
        if self.state.is_stopped() {
            return;
        }
        if let Err(err) = self.backend.stop() {
            error!("narration: backend stop failed: {:?}", err);
        }
    }

    fn publish(&mut self) {
        let state = self.state;
        self.observers.publish(&state);
    }
}

fn clamp_rate(rate: f32, config: &NarrationConfig) -> Option<f32> {
    if !rate.is_finite() {
        return None;
    }
    Some(rate.clamp(config.min_rate, config.max_rate))
}
