impl<S, B, IN> StoryReader<S, B, IN>
where
    S: PageSource,
    B: NarrationBackend,
    IN: CommandProvider,
{
    fn process_commands(&mut self, now_ms: u64) {
        loop {
            match self.input.poll_command() {
                Ok(Some(command)) => self.apply_command(command, now_ms),
                Ok(None) => break,
                Err(_) => {
                    warn!("reader: command provider error");
                    break;
                }
            }
        }
    }

    fn apply_command(&mut self, command: ReaderCommand, now_ms: u64) {
        debug!("reader: command {:?} at {}ms", command, now_ms);
        match command {
            ReaderCommand::Next => {
                self.next_page(now_ms);
            }
            ReaderCommand::Previous => {
                self.previous_page(now_ms);
            }
            ReaderCommand::TogglePlayback => self.toggle_playback(now_ms),
            ReaderCommand::Stop => self.stop(),
            ReaderCommand::SetRate(rate) => {
                self.set_rate(rate);
            }
        }
    }
}
