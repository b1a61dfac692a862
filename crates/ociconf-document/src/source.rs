//! Loading documents from their sources and saving them back

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tempfile::NamedTempFile;

use crate::document::ConfigDocument;
use crate::error::{Error, Result};

/// Where a [`ConfigDocument`] is loaded from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// Start from an empty document
    #[default]
    Empty,
    /// Parse in-memory TOML text
    Text(String),
    /// Read a TOML file; a missing file yields an empty document
    File(PathBuf),
}

impl ConfigSource {
    pub fn from_string(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }

    /// Load the document this source describes.
    ///
    /// # Errors
    ///
    /// Returns `Parse` for malformed TOML and `Io` if an existing file
    /// cannot be read.
    pub fn load(&self) -> Result<ConfigDocument> {
        match self {
            Self::Empty => Ok(ConfigDocument::new()),
            Self::Text(text) => ConfigDocument::load(text),
            Self::File(path) => match fs::read_to_string(path) {
                Ok(text) => {
                    tracing::debug!(path = %path.display(), "Loaded config file");
                    ConfigDocument::load(&text)
                }
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    tracing::debug!(path = %path.display(), "Config file not found, starting empty");
                    Ok(ConfigDocument::new())
                }
                Err(e) => Err(Error::io(path, e)),
            },
        }
    }
}

impl ConfigDocument {
    /// Save the rendered document to `path`.
    ///
    /// The text is staged in a locked temp file next to `path` and renamed
    /// over it, so readers never see a partial config. Missing parent
    /// directories are created.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the directory, temp file or rename fails and
    /// `LockFailed` if the staged file cannot be locked.
    pub fn save(&self, path: &Path) -> Result<()> {
        let dir = path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;

        let mut staged = NamedTempFile::new_in(dir).map_err(|e| Error::io(dir, e))?;
        let staged_path = staged.path().to_path_buf();
        staged.as_file().lock_exclusive().map_err(|_| Error::LockFailed {
            path: path.to_path_buf(),
        })?;

        let text = self.to_string();
        staged
            .write_all(text.as_bytes())
            .map_err(|e| Error::io(&staged_path, e))?;
        staged
            .as_file()
            .sync_all()
            .map_err(|e| Error::io(&staged_path, e))?;

        // Dropping the persisted handle releases the lock
        staged.persist(path).map_err(|e| Error::io(path, e.error))?;
        tracing::debug!(path = %path.display(), bytes = text.len(), "Saved config file");

        Ok(())
    }
}
