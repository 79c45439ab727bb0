//! Application module: presentation state used by the TUI and runtime.
//!
//! `App` in `app::model` holds selection, filters and the input mode;
//! `app::form` is the working copy behind the edit modal.

mod form;
mod model;

pub use form::{EditForm, FormField};
pub use model::*;
