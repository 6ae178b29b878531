//! Page navigation with double-tap debouncing.

use log::debug;

use crate::{
    catalog::PageSource,
    narration::{NarrationBackend, NarrationEngine},
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PageControllerConfig {
    /// Minimum spacing between two accepted navigation requests.
    pub debounce_ms: u64,
}

impl Default for PageControllerConfig {
    fn default() -> Self {
        Self { debounce_ms: 500 }
    }
}

/// Accepts an event only when more than `window_ms` has passed since the last
/// accepted one. The window restarts on acceptance, not on rejection.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Debouncer {
    window_ms: u64,
    last_accepted_ms: Option<u64>,
}

impl Debouncer {
    pub const fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            last_accepted_ms: None,
        }
    }

    pub fn accept(&mut self, now_ms: u64) -> bool {
        let within_window = self
            .last_accepted_ms
            .is_some_and(|last| now_ms.saturating_sub(last) <= self.window_ms);
        if within_window {
            return false;
        }

        self.last_accepted_ms = Some(now_ms);
        true
    }

    pub fn reset(&mut self) {
        self.last_accepted_ms = None;
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Direction {
    Next,
    Previous,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NavigationOutcome {
    Moved { from: u16, to: u16, autoplay: bool },
    AtBoundary,
    Debounced,
}

/// Owns the current page index and keeps it in `0..page_count`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PageController {
    current_page: u16,
    debounce: Debouncer,
}

impl PageController {
    pub const fn new(config: PageControllerConfig) -> Self {
        Self {
            current_page: 0,
            debounce: Debouncer::new(config.debounce_ms),
        }
    }

    pub fn current_page(&self) -> u16 {
        self.current_page
    }

    pub fn request_next<S, B>(
        &mut self,
        engine: &mut NarrationEngine<S, B>,
        now_ms: u64,
    ) -> NavigationOutcome
    where
        S: PageSource,
        B: NarrationBackend,
    {
        self.request(Direction::Next, engine, now_ms)
    }

    pub fn request_previous<S, B>(
        &mut self,
        engine: &mut NarrationEngine<S, B>,
        now_ms: u64,
    ) -> NavigationOutcome
    where
        S: PageSource,
        B: NarrationBackend,
    {
        self.request(Direction::Previous, engine, now_ms)
    }

    pub fn request<S, B>(
        &mut self,
        direction: Direction,
        engine: &mut NarrationEngine<S, B>,
        now_ms: u64,
    ) -> NavigationOutcome
    where
        S: PageSource,
        B: NarrationBackend,
    {
        if !self.debounce.accept(now_ms) {
            debug!("pages: {:?} debounced at {}ms", direction, now_ms);
            return NavigationOutcome::Debounced;
        }

        let last_page = engine.page_count().saturating_sub(1);
        let from = self.current_page.min(last_page);
        let to = match direction {
            Direction::Next => from.saturating_add(1).min(last_page),
            Direction::Previous => from.saturating_sub(1),
        };

        if to == from {
            debug!("pages: {:?} at boundary page={}", direction, from);
            self.current_page = from;
            return NavigationOutcome::AtBoundary;
        }

        self.transition(engine, from, to, now_ms)
    }

    /// Move straight to `page` (clamped), bypassing the debounce. Used when a
    /// story is opened or a bookmark restored.
    pub fn jump_to<S, B>(
        &mut self,
        engine: &mut NarrationEngine<S, B>,
        page: u16,
        now_ms: u64,
    ) -> NavigationOutcome
    where
        S: PageSource,
        B: NarrationBackend,
    {
        let last_page = engine.page_count().saturating_sub(1);
        let from = self.current_page.min(last_page);
        let to = page.min(last_page);
        if to == from && engine.state().current_page == to {
            self.current_page = to;
            return NavigationOutcome::AtBoundary;
        }

        self.transition(engine, from, to, now_ms)
    }

    /// Forget the current position, e.g. after a different story was loaded.
    pub fn reset(&mut self) {
        self.current_page = 0;
        self.debounce.reset();
    }

    fn transition<S, B>(
        &mut self,
        engine: &mut NarrationEngine<S, B>,
        from: u16,
        to: u16,
        now_ms: u64,
    ) -> NavigationOutcome
    where
        S: PageSource,
        B: NarrationBackend,
    {
        // Only an active reading session carries over; a paused one stays paused.
        let autoplay = engine.state().is_playing();

        engine.stop();
        self.current_page = to;
        engine.select_page(to);
        if autoplay {
            engine.start(to, now_ms);
        }

        debug!("pages: {} -> {} autoplay={}", from, to, autoplay);
        NavigationOutcome::Moved { from, to, autoplay }
    }
}
