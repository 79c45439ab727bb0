//! Error types shared across the library.
//!
//! Each collaborator (store, probe, audio output) has its own error enum; the
//! catalog folds them into [`CatalogError`], which is what the presentation
//! layer sees.

use std::time::Duration;

use thiserror::Error;

use crate::library::SoundId;

/// Failures of the persistent record store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// No record with this identifier exists.
    #[error("no sound with id {0}")]
    NotFound(SoundId),

    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// The tag column could not be encoded or decoded.
    #[error("tag encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures while determining the playable duration of an audio blob.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("io error while probing: {0}")]
    Io(#[from] std::io::Error),

    /// The bytes are not a container lofty understands.
    #[error("could not read audio metadata: {0}")]
    Unreadable(#[from] lofty::error::LoftyError),

    #[error("audio reports an invalid duration ({0})")]
    InvalidDuration(f64),

    #[error("probe did not finish within {0:?}")]
    TimedOut(Duration),

    #[error("probe worker exited without a result")]
    Worker,
}

/// Failures of the native audio output.
#[derive(Error, Debug)]
pub enum PlaybackError {
    #[error("audio output unavailable: {0}")]
    Device(String),

    #[error("could not decode audio for playback: {0}")]
    Decode(String),
}

/// Errors surfaced by the catalog to its callers.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// A non-audio file was submitted for import.
    #[error("{file_name}: not an audio file ({content_type})")]
    InvalidInput {
        file_name: String,
        content_type: String,
    },

    #[error("could not determine duration: {0}")]
    Decode(#[from] ProbeError),

    #[error("no sound with id {0}")]
    NotFound(SoundId),

    #[error(transparent)]
    Store(StoreError),

    /// The write went through but the view could not be refreshed afterwards.
    #[error("change saved, but reloading the library failed: {0}")]
    Stale(Box<CatalogError>),
}

impl CatalogError {
    /// True when the underlying write was applied despite the error.
    pub fn is_stale(&self) -> bool {
        matches!(self, CatalogError::Stale(_))
    }
}

impl From<StoreError> for CatalogError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => CatalogError::NotFound(id),
            other => CatalogError::Store(other),
        }
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;
