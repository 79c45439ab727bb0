//! A local sound-effect library: import audio files, tag and search them,
//! and audition one sound at a time from a terminal UI.

pub mod app;
pub mod audio;
pub mod catalog;
pub mod config;
pub mod error;
pub mod library;
pub mod runtime;
pub mod ui;
