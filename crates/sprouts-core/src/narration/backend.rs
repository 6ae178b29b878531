//! Audio backend contract shared by recorded and synthesized narration.

use super::HighlightRange;
use crate::catalog::PageTimings;

/// How a backend produces highlights.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum HighlightSource {
    /// The engine maps the backend position onto word timings every poll tick.
    Timed,
    /// The backend reports word boundaries itself.
    WordBoundary,
}

/// Asynchronous notifications drained from the backend once per tick.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BackendEvent {
    WordBoundary { page: u16, range: HighlightRange },
    Finished { page: u16 },
}

/// Everything a backend may need to narrate one page.
#[derive(Clone, Copy, Debug)]
pub struct PageRequest<'a> {
    pub page: u16,
    pub text: &'a str,
    pub timings: Option<&'a PageTimings>,
}

/// Resource selected for a page.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct PreparedPage {
    /// Position where this page's narration ends inside the resource, when the
    /// resource continues past it.
    pub end_position_ms: Option<u64>,
}

/// Playback device for one page at a time. Calls never block; completion and
/// word boundaries come back through [`NarrationBackend::poll_event`].
pub trait NarrationBackend {
    type Error: core::fmt::Debug;

    /// Select the resource for a page. `Ok(None)` means the page has no playable
    /// resource, which is not an error.
    fn prepare(&mut self, request: PageRequest<'_>) -> Result<Option<PreparedPage>, Self::Error>;

    fn highlight_source(&self) -> HighlightSource;

    fn play(&mut self, now_ms: u64) -> Result<(), Self::Error>;

    fn pause(&mut self, now_ms: u64) -> Result<(), Self::Error>;

    fn resume(&mut self, now_ms: u64) -> Result<(), Self::Error>;

    fn stop(&mut self) -> Result<(), Self::Error>;

    /// Live backends apply the rate immediately, recorded ones on the next `play`.
    fn set_rate(&mut self, rate: f32);

    /// Current position in the resource's own timebase.
    fn position_ms(&self, now_ms: u64) -> u64;

    fn poll_event(&mut self, now_ms: u64) -> Result<Option<BackendEvent>, Self::Error>;
}
