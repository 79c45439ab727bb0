//! Audio playback.
//!
//! `PlaybackController` enforces the single playing sound; `sink` binds the
//! output seam to `rodio`.

mod player;
mod sink;
mod types;

pub use player::PlaybackController;
pub use sink::{RodioOutput, RodioVoice};
pub use types::{AudioOutput, Playable, PlaybackState, Voice};
