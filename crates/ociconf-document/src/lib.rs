//! Format-preserving TOML documents for runtime configuration editing
//!
//! Wraps `toml_edit` with dotted-path get/set/remove, document sources
//! (in-memory text or a file), and atomic saving back to disk.

pub mod document;
pub mod error;
pub mod path;
pub mod source;

pub use document::ConfigDocument;
pub use error::{Error, Result};
pub use path::TablePath;
pub use source::ConfigSource;

pub use toml_edit::{Item, TableLike, Value, value};
