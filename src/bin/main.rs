use std::{path::Path, process::ExitCode, sync::Arc};

use log::{error, info, warn};
use sprouts_core::{
    app::{ReaderConfig, StoryReader, TickResult},
    catalog::{PageSource, sample_story},
    input::{QueuedCommands, ReaderCommand},
    library::StoryLibrary,
    narration::{HighlightRange, NarrationBackend},
    settings::{PersistedSettings, SettingsStore},
};
use sprouts_host::{
    assets::StoryBundle,
    audio::{ClipPlayer, SpeechSynth, story_voice},
    storage::json_settings::JsonSettingsStore,
};

use cli::{CliAction, CliOptions, USAGE, parse_args};
use session::{CompletionFlag, PageTurner, SessionClock};
use settings_sync::SettingsSyncState;

#[path = "main/cli.rs"]
mod cli;
#[path = "main/session.rs"]
mod session;
#[path = "main/settings_sync.rs"]
mod settings_sync;

const SETTINGS_SAVE_DEBOUNCE_MS: u64 = 1_500;
const PAGE_TURN_DELAY_MS: u64 = 1_200;
const MAX_SESSION_MS: u64 = 30 * 60 * 1_000;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let options = match parse_args(std::env::args().skip(1)) {
        Ok(CliAction::Run(options)) => options,
        Ok(CliAction::Help) => {
            println!("{USAGE}");
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            eprintln!("{err}\n\n{USAGE}");
            return ExitCode::FAILURE;
        }
    };

    match run(&options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(options: &CliOptions) -> Result<(), String> {
    let mut library = StoryLibrary::new();
    library
        .add(sample_story().map_err(|err| format!("sample story: {err}"))?)
        .ok_or("library is full")?;

    let (story_index, clips) = match options.story_dir.as_deref() {
        Some(dir) => load_bundle(&mut library, dir)?,
        None => {
            let story = library.story(0).ok_or("sample story missing")?;
            (0, ClipPlayer::from_story(&*story, None))
        }
    };
    let story = library.story(story_index).ok_or("story missing from library")?;

    let config = ReaderConfig {
        autoplay_on_open: options.autoplay,
        ..ReaderConfig::default()
    };
    let backend = story_voice(clips, SpeechSynth::default());
    let mut reader = StoryReader::new(Arc::clone(&story), backend, QueuedCommands::new(), config);

    let mut settings_store = options.settings_path.as_deref().map(JsonSettingsStore::new);
    let saved = load_settings(settings_store.as_mut());

    let mut clock = SessionClock::new(options.fast);
    let opened_at = clock.now_ms();
    let resumed = saved
        .and_then(|settings| settings.resume)
        .filter(|resume| resume.story == story_index)
        .is_some_and(|resume| reader.import_resume(&library, resume, opened_at));
    if !resumed {
        reader.open_story(&library, story_index, opened_at);
    }
    if let Some(saved) = saved {
        reader.apply_persisted_settings(saved);
    }
    if let Some(rate) = options.rate {
        reader.set_rate(rate);
    }

    let completed = CompletionFlag::default();
    if reader.engine_mut().subscribe(Box::new(completed.clone())).is_none() {
        warn!("session: observer slots full; pages will not turn by themselves");
    }
    if !reader.state().is_playing() {
        reader.input_mut().push(ReaderCommand::TogglePlayback);
    }

    info!(
        "session: story={:?} pages={} start_page={} rate={:.2} fast={}",
        story.title(),
        story.page_count(),
        reader.current_page(),
        reader.state().rate,
        options.fast
    );

    let mut settings_sync = SettingsSyncState::new(saved.unwrap_or_default());
    let mut turner = PageTurner::default();
    let mut last_shown: Option<(u16, HighlightRange)> = None;
    let tick_ms = reader.config().narration.tick_interval_ms.max(1);

    loop {
        let now_ms = clock.now_ms();
        if reader.tick(now_ms) == TickResult::RenderRequested {
            show_progress(&reader, &mut last_shown);
        }

        let page_count = reader.engine().page_count();
        let stalled = reader.state().is_stopped() && reader.engine().is_inert();
        if let Some(page) = completed.take().or(stalled.then(|| reader.current_page())) {
            if stalled {
                warn!("session: page={} cannot be narrated; moving on", page);
            }
            if page + 1 >= page_count {
                info!("session: the end");
                break;
            }
            turner.schedule(now_ms, PAGE_TURN_DELAY_MS);
        }

        if turner.take_due(now_ms) {
            reader.input_mut().push(ReaderCommand::Next);
            reader.input_mut().push(ReaderCommand::TogglePlayback);
        }

        settings_sync.track_current(reader.persisted_settings(), now_ms);
        settings_sync.flush_if_due(settings_store.as_mut(), now_ms);

        if now_ms.saturating_sub(opened_at) > MAX_SESSION_MS {
            warn!("session: stopping after {}ms", MAX_SESSION_MS);
            break;
        }

        clock.wait(tick_ms);
    }

    reader.stop();
    let now_ms = clock.now_ms();
    settings_sync.track_current(reader.persisted_settings(), now_ms);
    settings_sync.flush(settings_store.as_mut(), now_ms);
    Ok(())
}

fn load_bundle(library: &mut StoryLibrary, dir: &Path) -> Result<(u16, ClipPlayer), String> {
    let bundle = StoryBundle::load(dir).map_err(|err| err.to_string())?;
    let clips = bundle.clip_player();
    if bundle.audio.is_none() {
        info!("session: no recording for {:?}; using synthesized speech", dir);
    }

    let index = library.add(bundle.catalog).ok_or("library is full")?;
    Ok((index, clips))
}

fn load_settings(store: Option<&mut JsonSettingsStore>) -> Option<PersistedSettings> {
    let store = store?;
    match store.load() {
        Ok(Some(saved)) => {
            info!("settings: restored from {:?}", store.path());
            Some(saved)
        }
        Ok(None) => {
            info!("settings: nothing saved yet");
            None
        }
        Err(err) => {
            warn!("settings: unreadable ({}); using defaults", err);
            None
        }
    }
}

fn show_progress<S, B>(
    reader: &StoryReader<S, B, QueuedCommands>,
    last_shown: &mut Option<(u16, HighlightRange)>,
) where
    S: PageSource,
    B: NarrationBackend,
{
    reader.with_view(|view| {
        let Some(word) = view.highlighted_word else {
            return;
        };
        let shown = (view.page, view.highlight);
        if *last_shown == Some(shown) {
            return;
        }
        *last_shown = Some(shown);
        info!(
            "page {}/{} [{}] {}",
            view.page + 1,
            view.page_count,
            view.highlight.offset,
            word
        );
    });
}
