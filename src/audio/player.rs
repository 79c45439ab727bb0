use tracing::{debug, info};

use crate::error::PlaybackError;
use crate::library::{Sound, SoundId};

use super::types::{AudioOutput, Playable, PlaybackState, Voice};

/// Single-slot playback: at most one sound plays, and at most one voice exists.
pub struct PlaybackController<O: AudioOutput> {
    output: O,
    slot: Option<Playable<O::Voice>>,
}

impl<O: AudioOutput> PlaybackController<O> {
    pub fn new(output: O) -> Self {
        Self { output, slot: None }
    }

    pub fn state(&self) -> PlaybackState {
        match &self.slot {
            Some(p) => PlaybackState::Playing(p.sound_id()),
            None => PlaybackState::Idle,
        }
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    /// Stop `sound` if it is the one playing, otherwise switch to it.
    ///
    /// The previous voice is released before the next one is acquired. If
    /// acquiring fails the controller is left idle.
    pub fn toggle(&mut self, sound: &Sound) -> Result<PlaybackState, PlaybackError> {
        if self.state().is_playing(&sound.id) {
            self.release_slot("stopped");
            return Ok(PlaybackState::Idle);
        }

        self.release_slot("switched");

        let voice = self.output.acquire(sound.file.clone())?;
        voice.play();
        self.slot = Some(Playable::new(sound.id, voice));
        info!(id = %sound.id, name = %sound.name, "playing");
        Ok(self.state())
    }

    /// The output reached the end of the content on its own.
    pub fn on_playback_ended(&mut self) {
        self.release_slot("ended");
    }

    /// Check the current voice and finish it if it ran out. Returns true on a transition.
    pub fn poll_finished(&mut self) -> bool {
        let ended = self
            .slot
            .as_ref()
            .and_then(Playable::voice)
            .is_some_and(|v| v.finished());
        if ended {
            self.on_playback_ended();
        }
        ended
    }

    /// Stop playback if `id` is what is playing. Used when a sound is deleted.
    pub fn stop_if_playing(&mut self, id: &SoundId) {
        if self.state().is_playing(id) {
            self.release_slot("removed");
        }
    }

    /// Release whatever is held.
    pub fn shutdown(&mut self) {
        self.release_slot("shutdown");
    }

    fn release_slot(&mut self, reason: &str) {
        if let Some(playable) = self.slot.take() {
            debug!(id = %playable.sound_id(), reason, "releasing voice");
            drop(playable);
        }
    }
}
