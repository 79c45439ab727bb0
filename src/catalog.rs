//! The catalog: the in-memory view of the sound library.
//!
//! `Catalog` owns the view and mediates every mutation through the record
//! store; `filter` holds the pure search and facet helpers it uses.

mod controller;
mod filter;

pub use controller::{Catalog, ImportFailure, ImportReport};
pub use filter::{UNTAGGED, matches_query, matches_tags};
