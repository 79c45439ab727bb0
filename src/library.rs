//! The sound library: data model and the collaborators the catalog consumes.
//!
//! `model` holds the `Sound` record, `classify` the filename heuristics,
//! `probe` duration probing, `store` the SQLite record store and `scan` the
//! filesystem side of importing.

mod classify;
mod model;
mod probe;
mod scan;
mod store;

pub use classify::*;
pub use model::*;
pub use probe::{DurationProbe, LoftyProbe, TimedProbe};
pub use scan::{collect_import_paths, content_type_for, load_blob, load_blobs};
pub use store::{RecordStore, SqliteStore};

#[cfg(test)]
mod tests;
