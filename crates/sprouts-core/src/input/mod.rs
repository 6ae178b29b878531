//! Command abstraction between the presentation layer and the reader.

mod mock;

pub use mock::{NoCommands, QueuedCommands};

/// Logical commands accepted by the story reader.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ReaderCommand {
    Next,
    Previous,
    TogglePlayback,
    Stop,
    SetRate(f32),
}

/// Polled command provider.
pub trait CommandProvider {
    type Error;

    fn poll_command(&mut self) -> Result<Option<ReaderCommand>, Self::Error>;
}
