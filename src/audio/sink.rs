//! `rodio` binding for the output seam.
//!
//! Each voice is its own `Sink` on the default device's mixer, fed from the
//! in-memory payload.

use std::io::Cursor;
use std::sync::Arc;

use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink};

use crate::error::PlaybackError;

use super::types::{AudioOutput, Voice};

pub struct RodioOutput {
    stream: OutputStream,
}

impl RodioOutput {
    /// Open the system's default output device.
    pub fn open_default() -> Result<Self, PlaybackError> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| PlaybackError::Device(e.to_string()))?;
        // rodio logs to stderr when OutputStream is dropped; the TUI owns stderr.
        stream.log_on_drop(false);
        Ok(Self { stream })
    }
}

impl AudioOutput for RodioOutput {
    type Voice = RodioVoice;

    fn acquire(&mut self, audio: Arc<[u8]>) -> Result<RodioVoice, PlaybackError> {
        let source =
            Decoder::new(Cursor::new(audio)).map_err(|e| PlaybackError::Decode(e.to_string()))?;

        let sink = Sink::connect_new(self.stream.mixer());
        sink.append(source);
        sink.pause();
        Ok(RodioVoice { sink })
    }
}

pub struct RodioVoice {
    sink: Sink,
}

impl Voice for RodioVoice {
    fn play(&self) {
        self.sink.play();
    }

    fn pause(&self) {
        self.sink.pause();
    }

    fn finished(&self) -> bool {
        self.sink.empty()
    }

    fn release(self) {
        self.sink.stop();
    }
}
