//! Audio-related small types and the output seam.
//!
//! `AudioOutput` is whatever can turn an audio payload into a playing
//! `Voice`; `Playable` ties one voice to one sound and releases it exactly once.

use std::sync::Arc;

use crate::error::PlaybackError;
use crate::library::SoundId;

/// A single playable resource on the output device.
pub trait Voice {
    fn play(&self);
    fn pause(&self);
    /// True once the content has played to its natural end.
    fn finished(&self) -> bool;
    /// Give the resource back to the device.
    fn release(self);
}

/// The native output device.
pub trait AudioOutput {
    type Voice: Voice;

    /// Prepare a paused voice for `audio`.
    fn acquire(&mut self, audio: Arc<[u8]>) -> Result<Self::Voice, PlaybackError>;
}

/// What the playback slot currently holds.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Idle,
    Playing(SoundId),
}

impl PlaybackState {
    pub fn is_playing(&self, id: &SoundId) -> bool {
        matches!(self, PlaybackState::Playing(current) if current == id)
    }
}

/// A voice bound to the sound it plays.
///
/// Dropping it releases the voice; `release` consumes the voice, so it can
/// only ever happen once.
pub struct Playable<V: Voice> {
    sound_id: SoundId,
    voice: Option<V>,
}

impl<V: Voice> Playable<V> {
    pub fn new(sound_id: SoundId, voice: V) -> Self {
        Self {
            sound_id,
            voice: Some(voice),
        }
    }

    pub fn sound_id(&self) -> SoundId {
        self.sound_id
    }

    pub fn voice(&self) -> Option<&V> {
        self.voice.as_ref()
    }
}

impl<V: Voice> Drop for Playable<V> {
    fn drop(&mut self) {
        if let Some(voice) = self.voice.take() {
            voice.pause();
            voice.release();
        }
    }
}
