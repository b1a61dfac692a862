//! Command implementations for ociconf-cli

pub mod runtime;

pub use runtime::{run_add_runtime, run_get_runtime, run_list_runtimes, run_remove_runtime};

use std::path::{Path, PathBuf};

use colored::Colorize;
use ociconf_core::{ConfigDocument, ConfigSource, RuntimeRegistry};
use similar::TextDiff;

use crate::error::{CliError, Result};

/// The config file and root table a command operates on
#[derive(Debug, Clone)]
pub struct Target {
    pub config: PathBuf,
    pub root: String,
}

impl Target {
    pub fn new(config: impl Into<PathBuf>, root: impl Into<String>) -> Self {
        Self {
            config: config.into(),
            root: root.into(),
        }
    }

    /// Load the registry from the config file
    pub fn load(&self) -> Result<RuntimeRegistry> {
        if self.root.trim().is_empty() {
            return Err(CliError::user("Root table name must not be empty"));
        }
        let registry = RuntimeRegistry::builder(self.root.as_str())
            .source(ConfigSource::from_file(&self.config))
            .build()?;
        Ok(registry)
    }
}

/// Save `after` to the config file, or show what would change.
///
/// Nothing is written when the rendered document is unchanged.
pub(crate) fn persist(
    path: &Path,
    before: &str,
    after: &ConfigDocument,
    dry_run: bool,
) -> Result<()> {
    let rendered = after.to_string();
    if before == rendered {
        println!("{} No changes to {}", "OK".green().bold(), path.display());
        return Ok(());
    }

    if dry_run {
        println!("{}", "[dry-run] Would apply:".yellow().bold());
        let display = path.display().to_string();
        let diff = TextDiff::from_lines(before, &rendered);
        print!("{}", diff.unified_diff().header(&display, &display));
        return Ok(());
    }

    after.save(path)?;
    println!("{} Updated {}", "OK".green().bold(), path.display());
    Ok(())
}
