//! OCI runtime registry editing for container engine configs
//!
//! A [`RuntimeRegistry`] wraps one TOML [`ConfigDocument`] laid out as
//! `<root>.runtime.runtimes.<name>` entries plus an optional
//! `<root>.runtime.default_runtime` pointer, and knows how to register a
//! runtime, promote it to the default, and look entries up by name.

pub mod entry;
pub mod error;
pub mod registry;

pub use entry::RuntimeEntry;
pub use error::{Error, Result};
pub use registry::{CRIO_ROOT, RegistryBuilder, RuntimeRegistry};

pub use ociconf_document::{ConfigDocument, ConfigSource, TablePath};
