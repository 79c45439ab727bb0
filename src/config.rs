//! Layered settings for the library, the UI and logging.
//!
//! `schema` holds the serde types and their defaults; `load` resolves the
//! config file, applies `SFX_MEMORY__*` environment overrides and derives
//! the XDG data and state paths.

mod load;
mod schema;

pub use load::{default_config_path, resolve_config_path};
pub use schema::*;
