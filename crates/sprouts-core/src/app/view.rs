impl<S, B, IN> StoryReader<S, B, IN>
where
    S: PageSource,
    B: NarrationBackend,
    IN: CommandProvider,
{
    pub fn with_view<F>(&self, f: F)
    where
        F: FnOnce(ReaderView<'_>),
    {
        let state = self.engine.state();
        let page_text = self.engine.current_page_text();
        let highlighted_word = slice_chars(page_text, state.highlight);

        f(ReaderView {
            title: self.engine.source().title(),
            page_text,
            highlight: state.highlight,
            highlighted_word,
            page: state.current_page,
            page_count: self.engine.page_count(),
            phase: state.phase,
        });
    }

    /// The word currently highlighted, if any.
    pub fn highlighted_word(&self) -> Option<&str> {
        slice_chars(self.engine.current_page_text(), self.engine.state().highlight)
    }

    pub fn resume_state(&self) -> Option<ResumeState> {
        self.story_index.map(|story| ResumeState {
            story,
            page: self.pages.current_page(),
        })
    }

    pub fn persisted_settings(&self) -> PersistedSettings {
        PersistedSettings::new(self.engine.state().rate).with_resume(self.resume_state())
    }

    /// Apply the stored rate. The bookmark needs the library and is restored
    /// separately through `import_resume`.
    pub fn apply_persisted_settings(&mut self, settings: PersistedSettings) {
        self.set_rate(settings.rate);
    }
}
