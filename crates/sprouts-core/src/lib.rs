//! Core of the WonderSprouts storybook: story pages, word timings, the narration
//! engine that maps playback time to a highlighted word, and the page controller
//! that debounces navigation.
//!
//! Nothing in this crate touches real audio, files or clocks. Time is passed in as
//! `now_ms` on every call and audio is reached through [`narration::NarrationBackend`].

pub mod app;
pub mod catalog;
pub mod input;
pub mod library;
pub mod narration;
pub mod observe;
pub mod pages;
pub mod settings;
pub mod story_builder;
pub mod text_utils;
