//! Simulated speech synthesizer that reports word boundaries as it speaks.

use log::debug;
use sprouts_core::{
    narration::{
        BackendEvent, HighlightRange, HighlightSource, NarrationBackend, PageRequest,
        PreparedPage,
    },
    text_utils::{ends_clause, ends_sentence, word_spans},
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SpeechConfig {
    /// Speaking speed at rate 1.0.
    pub wpm: u16,
    pub dot_pause_ms: u16,
    pub comma_pause_ms: u16,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            wpm: 160,
            dot_pause_ms: 240,
            comma_pause_ms: 240,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct ScheduledWord {
    range: HighlightRange,
    start_ms: u64,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, thiserror::Error)]
pub enum SpeechError {
    #[error("nothing queued to speak")]
    NothingQueued,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Status {
    Idle,
    Speaking,
    Paused,
    Done,
}

/// Speaks page text at `wpm` scaled by the current rate. A rate change takes
/// effect mid-utterance.
pub struct SpeechSynth {
    config: SpeechConfig,
    rate: f32,
    page: u16,
    schedule: Vec<ScheduledWord>,
    total_ms: u64,
    next_word: usize,
    status: Status,
    anchor_progress_ms: u64,
    anchor_now_ms: u64,
}

impl SpeechSynth {
    pub fn new(config: SpeechConfig) -> Self {
        Self {
            config,
            rate: 1.0,
            page: 0,
            schedule: Vec::new(),
            total_ms: 0,
            next_word: 0,
            status: Status::Idle,
            anchor_progress_ms: 0,
            anchor_now_ms: 0,
        }
    }

    /// Length of the prepared utterance at rate 1.0.
    pub fn utterance_ms(&self) -> u64 {
        self.total_ms
    }

    fn word_ms(&self, word: &str) -> u64 {
        let base = 60_000u64 / self.config.wpm.max(1) as u64;
        let punctuation = if ends_sentence(word) {
            self.config.dot_pause_ms as u64
        } else if ends_clause(word) {
            self.config.comma_pause_ms as u64
        } else {
            0
        };

        base + punctuation
    }

    fn progress_ms(&self, now_ms: u64) -> u64 {
        let progress = match self.status {
            Status::Speaking => {
                let elapsed = now_ms.saturating_sub(self.anchor_now_ms) as f64;
                self.anchor_progress_ms + (elapsed * self.rate as f64) as u64
            }
            Status::Paused | Status::Done => self.anchor_progress_ms,
            Status::Idle => 0,
        };
        progress.min(self.total_ms)
    }
}

impl Default for SpeechSynth {
    fn default() -> Self {
        Self::new(SpeechConfig::default())
    }
}

impl NarrationBackend for SpeechSynth {
    type Error = SpeechError;

    fn prepare(&mut self, request: PageRequest<'_>) -> Result<Option<PreparedPage>, Self::Error> {
        self.status = Status::Idle;
        self.schedule.clear();
        self.next_word = 0;
        self.total_ms = 0;

        let mut clock = 0u64;
        for (word, range) in word_spans(request.text) {
            self.schedule.push(ScheduledWord {
                range,
                start_ms: clock,
            });
            clock += self.word_ms(word);
        }

        if self.schedule.is_empty() {
            debug!("speech: page={} has no words to speak", request.page);
            return Ok(None);
        }

        self.page = request.page;
        self.total_ms = clock;
        debug!(
            "speech: page={} words={} utterance_ms={}",
            request.page,
            self.schedule.len(),
            clock
        );
        Ok(Some(PreparedPage::default()))
    }

    fn highlight_source(&self) -> HighlightSource {
        HighlightSource::WordBoundary
    }

    fn play(&mut self, now_ms: u64) -> Result<(), Self::Error> {
        if self.schedule.is_empty() {
            return Err(SpeechError::NothingQueued);
        }
        self.next_word = 0;
        self.anchor_progress_ms = 0;
        self.anchor_now_ms = now_ms;
        self.status = Status::Speaking;
        Ok(())
    }

    fn pause(&mut self, now_ms: u64) -> Result<(), Self::Error> {
        if self.status != Status::Speaking {
            return Err(SpeechError::NothingQueued);
        }
        self.anchor_progress_ms = self.progress_ms(now_ms);
        self.status = Status::Paused;
        Ok(())
    }

    fn resume(&mut self, now_ms: u64) -> Result<(), Self::Error> {
        if self.status != Status::Paused {
            return Err(SpeechError::NothingQueued);
        }
        self.anchor_now_ms = now_ms;
        self.status = Status::Speaking;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), Self::Error> {
        self.status = Status::Idle;
        Ok(())
    }

    fn set_rate(&mut self, rate: f32) {
        // Applies from the last poll; the engine polls every tick.
        self.rate = rate;
    }

    fn position_ms(&self, now_ms: u64) -> u64 {
        self.progress_ms(now_ms)
    }

    fn poll_event(&mut self, now_ms: u64) -> Result<Option<BackendEvent>, Self::Error> {
        if self.status != Status::Speaking {
            return Ok(None);
        }

        let progress = self.progress_ms(now_ms);
        if let Some(word) = self.schedule.get(self.next_word)
            && word.start_ms <= progress
        {
            self.next_word += 1;
            return Ok(Some(BackendEvent::WordBoundary {
                page: self.page,
                range: word.range,
            }));
        }

        if self.next_word >= self.schedule.len() && progress >= self.total_ms {
            self.anchor_progress_ms = self.total_ms;
            self.status = Status::Done;
            return Ok(Some(BackendEvent::Finished { page: self.page }));
        }

        // Re-anchor every poll so a rate change only affects speech from here on.
        self.anchor_progress_ms = progress;
        self.anchor_now_ms = now_ms;
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(text: &str) -> PageRequest<'_> {
        PageRequest {
            page: 3,
            text,
            timings: None,
        }
    }

    fn drain(synth: &mut SpeechSynth, now_ms: u64) -> Vec<BackendEvent> {
        let mut events = Vec::new();
        while let Some(event) = synth.poll_event(now_ms).unwrap() {
            events.push(event);
        }
        events
    }

    fn config() -> SpeechConfig {
        SpeechConfig {
            wpm: 120,
            dot_pause_ms: 300,
            comma_pause_ms: 100,
        }
    }

    #[test]
    fn empty_text_has_nothing_to_speak() {
        let mut synth = SpeechSynth::new(config());
        assert_eq!(synth.prepare(request("   ")), Ok(None));
        assert_eq!(synth.play(0), Err(SpeechError::NothingQueued));
    }

    #[test]
    fn punctuation_lengthens_the_utterance() {
        let mut synth = SpeechSynth::new(config());
        synth.prepare(request("Hi, you there.")).unwrap();
        assert_eq!(synth.utterance_ms(), 500 * 3 + 100 + 300);
    }

    #[test]
    fn word_boundaries_arrive_in_order_then_finish() {
        let mut synth = SpeechSynth::new(config());
        synth.prepare(request("Hi, you there.")).unwrap();
        synth.play(1_000).unwrap();

        assert_eq!(
            drain(&mut synth, 1_000),
            vec![BackendEvent::WordBoundary {
                page: 3,
                range: HighlightRange::new(0, 3)
            }]
        );
        assert_eq!(drain(&mut synth, 1_500), Vec::new());
        assert_eq!(
            drain(&mut synth, 1_600),
            vec![BackendEvent::WordBoundary {
                page: 3,
                range: HighlightRange::new(4, 3)
            }]
        );
        assert_eq!(
            drain(&mut synth, 5_000),
            vec![
                BackendEvent::WordBoundary {
                    page: 3,
                    range: HighlightRange::new(8, 6)
                },
                BackendEvent::Finished { page: 3 },
            ]
        );
        assert_eq!(drain(&mut synth, 6_000), Vec::new());
    }

    #[test]
    fn slower_rate_stretches_speech_from_the_last_poll() {
        let mut synth = SpeechSynth::new(config());
        synth.prepare(request("One two three")).unwrap();
        synth.play(0).unwrap();
        let _ = drain(&mut synth, 400);
        assert_eq!(synth.position_ms(400), 400);

        synth.set_rate(0.5);
        assert_eq!(synth.position_ms(600), 500);
        assert_eq!(
            drain(&mut synth, 600),
            vec![BackendEvent::WordBoundary {
                page: 3,
                range: HighlightRange::new(4, 3)
            }]
        );
        assert_eq!(synth.position_ms(800), 600);
    }

    #[test]
    fn pause_holds_progress() {
        let mut synth = SpeechSynth::new(config());
        synth.prepare(request("One two three")).unwrap();
        synth.play(0).unwrap();
        synth.pause(700).unwrap();
        assert_eq!(synth.position_ms(5_000), 700);
        assert_eq!(drain(&mut synth, 5_000), Vec::new());

        synth.resume(5_000).unwrap();
        assert_eq!(synth.position_ms(5_100), 800);
    }
}
