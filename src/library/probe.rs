//! Duration probing for imported audio.
//!
//! `LoftyProbe` reads container properties from memory. `TimedProbe` bounds
//! any probe with a deadline so a malformed file cannot stall an import.

use std::io::Cursor;
use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use lofty::file::AudioFile;
use lofty::probe::Probe;
use tracing::warn;

use crate::error::ProbeError;

/// Resolves the playable duration of an audio blob, in seconds.
pub trait DurationProbe {
    fn probe(&self, audio: Arc<[u8]>) -> Result<f64, ProbeError>;
}

/// Probe backed by `lofty`'s container parsers.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoftyProbe;

impl DurationProbe for LoftyProbe {
    fn probe(&self, audio: Arc<[u8]>) -> Result<f64, ProbeError> {
        let tagged = Probe::new(Cursor::new(&audio[..]))
            .guess_file_type()?
            .read()?;
        let secs = tagged.properties().duration().as_secs_f64();
        if !secs.is_finite() || secs < 0.0 {
            return Err(ProbeError::InvalidDuration(secs));
        }
        Ok(secs)
    }
}

/// Runs the wrapped probe on a worker thread and gives up after `timeout`.
///
/// A timed-out worker is left to finish on its own; its result is discarded.
pub struct TimedProbe<P> {
    inner: Arc<P>,
    timeout: Duration,
}

impl<P> TimedProbe<P> {
    pub fn new(inner: P, timeout: Duration) -> Self {
        Self {
            inner: Arc::new(inner),
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl<P> DurationProbe for TimedProbe<P>
where
    P: DurationProbe + Send + Sync + 'static,
{
    fn probe(&self, audio: Arc<[u8]>) -> Result<f64, ProbeError> {
        let (tx, rx) = mpsc::channel();
        let inner = Arc::clone(&self.inner);
        thread::spawn(move || {
            let _ = tx.send(inner.probe(audio));
        });

        match rx.recv_timeout(self.timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => {
                warn!(timeout = ?self.timeout, "duration probe timed out");
                Err(ProbeError::TimedOut(self.timeout))
            }
            Err(RecvTimeoutError::Disconnected) => Err(ProbeError::Worker),
        }
    }
}
