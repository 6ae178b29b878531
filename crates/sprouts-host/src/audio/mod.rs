//! Host narration backends.

mod clip;
mod speech;

pub use clip::{ClipError, ClipPlayer, ClipResource};
pub use speech::{SpeechConfig, SpeechError, SpeechSynth};

use sprouts_core::narration::DualBackend;

/// Recorded narration first, synthesized speech for pages without a clip.
pub type StoryVoice = DualBackend<ClipPlayer, SpeechSynth>;

pub fn story_voice(clips: ClipPlayer, speech: SpeechSynth) -> StoryVoice {
    DualBackend::new(clips, speech)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprouts_core::{
        catalog::{StoryCatalog, WordTiming},
        narration::{ActiveBackend, NarrationConfig, NarrationEngine},
    };

    fn story() -> StoryCatalog {
        StoryCatalog::new(
            "Mixed",
            vec!["Owls hoot.".to_owned(), "Bats squeak softly.".to_owned()],
            vec![
                WordTiming {
                    page: 0,
                    sequence: 1,
                    word: "Owls".to_owned(),
                    start_sec: 0.0,
                },
                WordTiming {
                    page: 0,
                    sequence: 2,
                    word: "hoot.".to_owned(),
                    start_sec: 0.6,
                },
            ],
        )
        .unwrap()
    }

    fn engine() -> NarrationEngine<StoryCatalog, StoryVoice> {
        let story = story();
        let clips = ClipPlayer::from_story(&story, Some(1_500));
        NarrationEngine::new(
            story,
            story_voice(clips, SpeechSynth::default()),
            NarrationConfig::default(),
        )
    }

    #[test]
    fn recorded_page_uses_clip_timings() {
        let mut engine = engine();
        assert!(engine.start(0, 0));
        assert_eq!(engine.backend().active(), ActiveBackend::Recorded);

        engine.tick(0);
        assert_eq!(engine.state().highlight.offset, 0);
        engine.tick(700);
        assert_eq!(engine.state().highlight.offset, 5);

        engine.tick(1_600);
        assert!(engine.state().is_stopped());
    }

    #[test]
    fn page_without_clip_falls_back_to_speech() {
        let mut engine = engine();
        assert!(engine.select_page(1));
        assert!(engine.start(1, 0));
        assert_eq!(engine.backend().active(), ActiveBackend::Synthesized);

        engine.tick(0);
        assert_eq!(engine.state().highlight.offset, 0);
        assert_eq!(engine.state().highlight.length, 4);

        engine.tick(10_000);
        assert!(engine.state().is_stopped());
    }
}
