//! Error types for ociconf-core

/// Result type for ociconf-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in ociconf-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Runtime names must be non-empty
    #[error("Invalid runtime name: {name:?}")]
    InvalidRuntimeName { name: String },

    /// Load or write failure from the underlying document
    #[error(transparent)]
    Document(#[from] ociconf_document::Error),
}
