impl<S, B, IN> StoryReader<S, B, IN>
where
    S: PageSource,
    B: NarrationBackend,
    IN: CommandProvider,
{
    pub fn new(source: S, backend: B, input: IN, config: ReaderConfig) -> Self {
        let engine = NarrationEngine::new(source, backend, config.narration);

        Self {
            engine,
            pages: PageController::new(config.pages),
            input,
            config,
            story_index: None,
            pending_redraw: true,
        }
    }

    /// Apply queued commands, then advance narration to `now_ms`.
    pub fn tick(&mut self, now_ms: u64) -> TickResult {
        self.process_commands(now_ms);

        if self.engine.tick(now_ms) {
            self.pending_redraw = true;
        }

        if self.pending_redraw {
            self.pending_redraw = false;
            TickResult::RenderRequested
        } else {
            TickResult::NoRender
        }
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    pub fn engine(&self) -> &NarrationEngine<S, B> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut NarrationEngine<S, B> {
        &mut self.engine
    }

    pub fn input_mut(&mut self) -> &mut IN {
        &mut self.input
    }

    pub fn state(&self) -> PlaybackState {
        self.engine.state()
    }

    pub fn current_page(&self) -> u16 {
        self.pages.current_page()
    }

    pub fn story_index(&self) -> Option<u16> {
        self.story_index
    }
}

impl<B, IN> StoryReader<Arc<StoryCatalog>, B, IN>
where
    B: NarrationBackend,
    IN: CommandProvider,
{
    /// Open story `index` from the gallery at page 0. Out-of-range indices leave
    /// the current story untouched.
    pub fn open_story(&mut self, library: &StoryLibrary, index: u16, now_ms: u64) -> bool {
        if !self.load_story(library, index) {
            return false;
        }

        if self.config.autoplay_on_open {
            self.engine.start(0, now_ms);
        }
        true
    }

    /// Reopen the story and page from a saved bookmark, stopped.
    pub fn import_resume(&mut self, library: &StoryLibrary, resume: ResumeState, now_ms: u64) -> bool {
        if !self.load_story(library, resume.story) {
            warn!("reader: resume story={} not in library", resume.story);
            return false;
        }

        self.pages.jump_to(&mut self.engine, resume.page, now_ms);
        debug!(
            "reader: resumed story={} page={}",
            resume.story,
            self.pages.current_page()
        );
        true
    }

    fn load_story(&mut self, library: &StoryLibrary, index: u16) -> bool {
        let Some(story) = library.story(index) else {
            warn!(
                "reader: open rejected index={} story_count={}",
                index,
                library.story_count()
            );
            return false;
        };

        info!("reader: open story={} title={:?}", index, story.title());
        self.engine.replace_source(story);
        self.pages.reset();
        self.story_index = Some(index);
        self.pending_redraw = true;
        true
    }
}
