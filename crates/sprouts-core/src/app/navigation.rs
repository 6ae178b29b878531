impl<S, B, IN> StoryReader<S, B, IN>
where
    S: PageSource,
    B: NarrationBackend,
    IN: CommandProvider,
{
    pub fn next_page(&mut self, now_ms: u64) -> NavigationOutcome {
        let outcome = self.pages.request_next(&mut self.engine, now_ms);
        self.note_navigation(outcome);
        outcome
    }

    pub fn previous_page(&mut self, now_ms: u64) -> NavigationOutcome {
        let outcome = self.pages.request_previous(&mut self.engine, now_ms);
        self.note_navigation(outcome);
        outcome
    }

    pub fn jump_to_page(&mut self, page: u16, now_ms: u64) -> NavigationOutcome {
        let outcome = self.pages.jump_to(&mut self.engine, page, now_ms);
        self.note_navigation(outcome);
        outcome
    }

    pub fn toggle_playback(&mut self, now_ms: u64) {
        let before = self.engine.state();
        self.engine.toggle(now_ms);
        if self.engine.state() != before {
            self.pending_redraw = true;
        }
    }

    pub fn stop(&mut self) {
        let before = self.engine.state();
        self.engine.stop();
        if self.engine.state() != before {
            self.pending_redraw = true;
        }
    }

    pub fn set_rate(&mut self, rate: f32) -> f32 {
        let before = self.engine.state().rate;
        let applied = self.engine.set_rate(rate);
        if applied != before {
            self.pending_redraw = true;
        }
        applied
    }

    fn note_navigation(&mut self, outcome: NavigationOutcome) {
        if matches!(outcome, NavigationOutcome::Moved { .. }) {
            self.pending_redraw = true;
        }
    }
}
