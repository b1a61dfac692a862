//! Error types for ociconf-document

use std::path::PathBuf;

/// Result type for ociconf-document operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in ociconf-document operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to parse TOML content: {message}")]
    Parse { message: String },

    #[error("Cannot address the document root with an empty path")]
    EmptyPath,

    #[error("Cannot set path {path}: {reason}")]
    PathSetFailed { path: String, reason: String },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Lock acquisition failed for {path}")]
    LockFailed { path: PathBuf },
}

impl Error {
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn path_set(path: impl ToString, reason: impl Into<String>) -> Self {
        Self::PathSetFailed {
            path: path.to_string(),
            reason: reason.into(),
        }
    }
}
