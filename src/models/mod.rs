//! Data models for the tool directory.
//!
//! Field names serialize in camelCase to match the web frontend.

mod category;
mod patch;
mod revision;
mod tool;

pub use category::*;
pub use patch::*;
pub use revision::*;
pub use tool::*;
