//! Foundation types: reference paths and schema versions.

mod path;
mod version;

pub use path::ArPath;
pub use version::{SchemaEra, SchemaVersion};
