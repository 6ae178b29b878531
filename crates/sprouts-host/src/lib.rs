//! Host-side adapters for the storybook core: simulated audio backends, story
//! bundles on disk, settings persistence and clocks.

pub mod assets;
pub mod audio;
pub mod clock;
pub mod storage;
