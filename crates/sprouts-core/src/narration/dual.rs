//! Backend that prefers a recorded clip and falls back to speech synthesis for
//! pages without one.

use log::{debug, warn};

use super::{BackendEvent, HighlightSource, NarrationBackend, PageRequest, PreparedPage};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ActiveBackend {
    Recorded,
    Synthesized,
}

#[derive(Debug)]
pub enum DualBackendError<R, S> {
    Recorded(R),
    Synthesized(S),
}

pub struct DualBackend<R, S> {
    recorded: R,
    synthesized: S,
    active: ActiveBackend,
}

impl<R, S> DualBackend<R, S>
where
    R: NarrationBackend,
    S: NarrationBackend,
{
    pub fn new(recorded: R, synthesized: S) -> Self {
        Self {
            recorded,
            synthesized,
            active: ActiveBackend::Recorded,
        }
    }

    pub fn active(&self) -> ActiveBackend {
        self.active
    }
}

impl<R, S> NarrationBackend for DualBackend<R, S>
where
    R: NarrationBackend,
    S: NarrationBackend,
{
    type Error = DualBackendError<R::Error, S::Error>;

    fn prepare(&mut self, request: PageRequest<'_>) -> Result<Option<PreparedPage>, Self::Error> {
        match self.recorded.prepare(request) {
            Ok(Some(prepared)) => {
                self.active = ActiveBackend::Recorded;
                debug!("dual: page={} using recorded clip", request.page);
                return Ok(Some(prepared));
            }
            Ok(None) => {
                debug!("dual: page={} has no clip, using synthesis", request.page);
            }
            Err(err) => {
                warn!(
                    "dual: page={} clip failed ({:?}), using synthesis",
                    request.page, err
                );
            }
        }

        self.active = ActiveBackend::Synthesized;
        self.synthesized
            .prepare(request)
            .map_err(DualBackendError::Synthesized)
    }

    fn highlight_source(&self) -> HighlightSource {
        match self.active {
            ActiveBackend::Recorded => self.recorded.highlight_source(),
            ActiveBackend::Synthesized => self.synthesized.highlight_source(),
        }
    }

    fn play(&mut self, now_ms: u64) -> Result<(), Self::Error> {
        match self.active {
            ActiveBackend::Recorded => self.recorded.play(now_ms).map_err(DualBackendError::Recorded),
            ActiveBackend::Synthesized => self
                .synthesized
                .play(now_ms)
                .map_err(DualBackendError::Synthesized),
        }
    }

    fn pause(&mut self, now_ms: u64) -> Result<(), Self::Error> {
        match self.active {
            ActiveBackend::Recorded => self
                .recorded
                .pause(now_ms)
                .map_err(DualBackendError::Recorded),
            ActiveBackend::Synthesized => self
                .synthesized
                .pause(now_ms)
                .map_err(DualBackendError::Synthesized),
        }
    }

    fn resume(&mut self, now_ms: u64) -> Result<(), Self::Error> {
        match self.active {
            ActiveBackend::Recorded => self
                .recorded
                .resume(now_ms)
                .map_err(DualBackendError::Recorded),
            ActiveBackend::Synthesized => self
                .synthesized
                .resume(now_ms)
                .map_err(DualBackendError::Synthesized),
        }
    }

    fn stop(&mut self) -> Result<(), Self::Error> {
        match self.active {
            ActiveBackend::Recorded => self.recorded.stop().map_err(DualBackendError::Recorded),
            ActiveBackend::Synthesized => self
                .synthesized
                .stop()
                .map_err(DualBackendError::Synthesized),
        }
    }

    fn set_rate(&mut self, rate: f32) {
        self.recorded.set_rate(rate);
        self.synthesized.set_rate(rate);
    }

    fn position_ms(&self, now_ms: u64) -> u64 {
        match self.active {
            ActiveBackend::Recorded => self.recorded.position_ms(now_ms),
            ActiveBackend::Synthesized => self.synthesized.position_ms(now_ms),
        }
    }

    fn poll_event(&mut self, now_ms: u64) -> Result<Option<BackendEvent>, Self::Error> {
        match self.active {
            ActiveBackend::Recorded => self
                .recorded
                .poll_event(now_ms)
                .map_err(DualBackendError::Recorded),
            ActiveBackend::Synthesized => self
                .synthesized
                .poll_event(now_ms)
                .map_err(DualBackendError::Synthesized),
        }
    }
}
