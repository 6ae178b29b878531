use heapless::Deque;
use log::warn;

use super::{CommandProvider, ReaderCommand};

/// Provider with nothing to report, for readers driven only through direct calls.
#[derive(Default, Debug, Clone, Copy)]
pub struct NoCommands;

impl NoCommands {
    pub const fn new() -> Self {
        Self
    }
}

impl CommandProvider for NoCommands {
    type Error = core::convert::Infallible;

    fn poll_command(&mut self) -> Result<Option<ReaderCommand>, Self::Error> {
        Ok(None)
    }
}

pub const COMMAND_QUEUE_LEN: usize = 16;

/// Bounded FIFO the presentation layer pushes taps into. When full, the newest
/// command is dropped.
#[derive(Default, Debug)]
pub struct QueuedCommands {
    queue: Deque<ReaderCommand, COMMAND_QUEUE_LEN>,
}

impl QueuedCommands {
    pub const fn new() -> Self {
        Self {
            queue: Deque::new(),
        }
    }

    pub fn push(&mut self, command: ReaderCommand) -> bool {
        if self.queue.push_back(command).is_err() {
            warn!("input: queue full, dropping {:?}", command);
            return false;
        }
        true
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl CommandProvider for QueuedCommands {
    type Error = core::convert::Infallible;

    fn poll_command(&mut self) -> Result<Option<ReaderCommand>, Self::Error> {
        Ok(self.queue.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_is_fifo_and_bounded() {
        let mut commands = QueuedCommands::new();
        assert!(commands.push(ReaderCommand::Next));
        assert!(commands.push(ReaderCommand::TogglePlayback));
        for _ in 2..COMMAND_QUEUE_LEN {
            assert!(commands.push(ReaderCommand::Stop));
        }
        assert!(!commands.push(ReaderCommand::Previous));

        assert_eq!(commands.poll_command(), Ok(Some(ReaderCommand::Next)));
        assert_eq!(
            commands.poll_command(),
            Ok(Some(ReaderCommand::TogglePlayback))
        );
        assert_eq!(commands.len(), COMMAND_QUEUE_LEN - 2);
    }
}
