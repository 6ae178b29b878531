use super::*;
use crate::{
    catalog::sample_story,
    input::QueuedCommands,
    narration::test_backend::ScriptedBackend,
};

struct ScriptedCommands<'a> {
    commands: &'a [ReaderCommand],
    cursor: usize,
}

impl<'a> ScriptedCommands<'a> {
    const fn new(commands: &'a [ReaderCommand]) -> Self {
        Self {
            commands,
            cursor: 0,
        }
    }
}

impl CommandProvider for ScriptedCommands<'_> {
    type Error = ();

    fn poll_command(&mut self) -> Result<Option<ReaderCommand>, Self::Error> {
        let Some(command) = self.commands.get(self.cursor).copied() else {
            return Ok(None);
        };
        self.cursor = self.cursor.saturating_add(1);
        Ok(Some(command))
    }
}

struct BrokenCommands;

impl CommandProvider for BrokenCommands {
    type Error = ();

    fn poll_command(&mut self) -> Result<Option<ReaderCommand>, Self::Error> {
        Err(())
    }
}

fn library() -> StoryLibrary {
    let mut library = StoryLibrary::new();
    library.add(sample_story().unwrap());
    library.add(
        StoryCatalog::from_text("Quiet Pond", vec!["Frogs sing.".to_owned()]).unwrap(),
    );
    library
}

type QueuedReader = StoryReader<Arc<StoryCatalog>, ScriptedBackend, QueuedCommands>;

fn queued_reader(config: ReaderConfig) -> (StoryLibrary, QueuedReader) {
    let library = library();
    let first = library.story(0).unwrap();
    let mut reader = StoryReader::new(first, ScriptedBackend::timed(), QueuedCommands::new(), config);
    assert!(reader.open_story(&library, 0, 0));
    (library, reader)
}

#[test]
fn first_tick_requests_render_then_settles() {
    let story = Arc::new(sample_story().unwrap());
    let mut reader = StoryReader::new(
        story,
        ScriptedBackend::timed(),
        ScriptedCommands::new(&[]),
        ReaderConfig::default(),
    );

    assert_eq!(reader.tick(0), TickResult::RenderRequested);
    assert_eq!(reader.tick(100), TickResult::NoRender);
}

#[test]
fn toggle_command_starts_narration_and_highlights_first_word() {
    let story = Arc::new(sample_story().unwrap());
    let commands = [ReaderCommand::TogglePlayback];
    let mut reader = StoryReader::new(
        story,
        ScriptedBackend::timed(),
        ScriptedCommands::new(&commands),
        ReaderConfig::default(),
    );

    assert_eq!(reader.tick(1_000), TickResult::RenderRequested);
    assert!(reader.state().is_playing());
    assert_eq!(reader.highlighted_word(), Some("Once"));

    let _ = reader.tick(1_500);
    assert_eq!(reader.highlighted_word(), Some("upon"));
}

#[test]
fn double_tap_next_while_playing_moves_once_and_keeps_reading() {
    let (_library, mut reader) = queued_reader(ReaderConfig::default());

    reader.input_mut().push(ReaderCommand::TogglePlayback);
    let _ = reader.tick(1_000);
    assert!(reader.state().is_playing());

    reader.input_mut().push(ReaderCommand::Next);
    let _ = reader.tick(2_000);
    reader.input_mut().push(ReaderCommand::Next);
    let _ = reader.tick(2_050);

    assert_eq!(reader.current_page(), 1);
    assert!(reader.state().is_playing());
    assert_eq!(reader.state().current_page, 1);
    assert_eq!(reader.highlighted_word(), Some("One"));
}

#[test]
fn paused_reader_stays_stopped_after_page_change() {
    let (_library, mut reader) = queued_reader(ReaderConfig::default());

    reader.input_mut().push(ReaderCommand::TogglePlayback);
    let _ = reader.tick(0);
    reader.input_mut().push(ReaderCommand::TogglePlayback);
    let _ = reader.tick(600);
    assert!(reader.state().is_paused());

    reader.input_mut().push(ReaderCommand::Next);
    let _ = reader.tick(1_200);

    assert_eq!(reader.current_page(), 1);
    assert!(reader.state().is_stopped());
    assert_eq!(reader.highlighted_word(), None);
}

#[test]
fn open_story_rejects_unknown_index() {
    let (library, mut reader) = queued_reader(ReaderConfig::default());
    let _ = reader.next_page(1_000);
    assert_eq!(reader.current_page(), 1);

    assert!(!reader.open_story(&library, 7, 2_000));
    assert_eq!(reader.story_index(), Some(0));
    assert_eq!(reader.current_page(), 1);

    assert!(reader.open_story(&library, 1, 3_000));
    assert_eq!(reader.story_index(), Some(1));
    assert_eq!(reader.current_page(), 0);
    reader.with_view(|view| {
        assert_eq!(view.title, "Quiet Pond");
        assert_eq!(view.page_text, "Frogs sing.");
        assert_eq!(view.page_count, 1);
        assert_eq!(view.phase, NarrationPhase::Stopped);
    });
}

#[test]
fn autoplay_on_open_starts_first_page() {
    let config = ReaderConfig {
        autoplay_on_open: true,
        ..ReaderConfig::default()
    };
    let (_library, mut reader) = queued_reader(config);

    assert!(reader.state().is_playing());
    let _ = reader.tick(0);
    reader.with_view(|view| {
        assert_eq!(view.page, 0);
        assert_eq!(view.highlighted_word, Some("Once"));
        assert_eq!(view.highlight, HighlightRange::new(0, 4));
    });
}

#[test]
fn bookmark_round_trips_through_settings() {
    let (library, mut reader) = queued_reader(ReaderConfig::default());
    let _ = reader.jump_to_page(2, 0);
    assert_eq!(reader.set_rate(0.5), 0.5);

    let saved = reader.persisted_settings();
    assert_eq!(saved.resume, Some(ResumeState { story: 0, page: 2 }));

    let (_library, mut restored) = queued_reader(ReaderConfig::default());
    restored.apply_persisted_settings(saved);
    assert!(restored.import_resume(&library, saved.resume.unwrap(), 10));

    assert_eq!(restored.current_page(), 2);
    assert_eq!(restored.state().current_page, 2);
    assert_eq!(restored.state().rate, 0.5);
    assert!(restored.state().is_stopped());
}

#[test]
fn resume_for_missing_story_is_rejected() {
    let (library, mut reader) = queued_reader(ReaderConfig::default());
    assert!(!reader.import_resume(&library, ResumeState { story: 9, page: 0 }, 0));
    assert_eq!(reader.story_index(), Some(0));
}

#[test]
fn set_rate_command_is_clamped() {
    let (_library, mut reader) = queued_reader(ReaderConfig::default());
    reader.input_mut().push(ReaderCommand::SetRate(4.0));
    let _ = reader.tick(0);
    assert_eq!(reader.state().rate, 1.0);

    reader.input_mut().push(ReaderCommand::SetRate(0.01));
    let _ = reader.tick(100);
    assert_eq!(reader.state().rate, 0.1);
}

#[test]
fn provider_errors_do_not_disturb_playback() {
    let story = Arc::new(sample_story().unwrap());
    let mut reader = StoryReader::new(
        story,
        ScriptedBackend::timed(),
        BrokenCommands,
        ReaderConfig::default(),
    );
    reader.toggle_playback(0);

    let _ = reader.tick(100);
    assert!(reader.state().is_playing());
    assert_eq!(reader.highlighted_word(), Some("Once"));
}
