//! Runtime registry over a container engine config document
//!
//! Entries live at `<root>.runtime.runtimes.<name>` and the default runtime
//! pointer at `<root>.runtime.default_runtime`. The root table name is
//! chosen by the caller; [`CRIO_ROOT`] is the conventional one for CRI-O.
//!
//! # Option inheritance
//!
//! A newly added runtime copies every non-identity option from a single
//! source entry, resolved against the document as it was before the call:
//!
//! 1. the entry named by `default_runtime`, if that entry exists;
//! 2. otherwise the `runc` entry, if it exists;
//! 3. otherwise nothing is inherited.
//!
//! Options from the two candidates are never mixed. A resolved source
//! replaces the entry's options wholesale; without one, options already on
//! the entry stay in place.

use std::fmt;

use ociconf_document::{ConfigDocument, ConfigSource, Item, TablePath, value};
use tracing::{debug, info, warn};

use crate::entry::{RUNTIME_PATH, RUNTIME_TYPE, RuntimeEntry};
use crate::error::{Error, Result};

/// Root table name used by CRI-O configs
pub const CRIO_ROOT: &str = "crio";

/// Runtime whose options are inherited when no default runtime is set
pub const RUNC: &str = "runc";

/// `runtime_type` written for every entry this registry creates
pub const OCI_RUNTIME_TYPE: &str = "oci";

/// Builder for [`RuntimeRegistry`]
#[derive(Debug, Clone)]
pub struct RegistryBuilder {
    root: TablePath,
    source: ConfigSource,
}

impl RegistryBuilder {
    /// Set where the document is loaded from (defaults to an empty document)
    pub fn source(mut self, source: ConfigSource) -> Self {
        self.source = source;
        self
    }

    /// Load the document and build the registry.
    ///
    /// # Errors
    ///
    /// Load failures from the source are returned unchanged.
    pub fn build(self) -> Result<RuntimeRegistry> {
        let document = self.source.load()?;
        Ok(RuntimeRegistry {
            root: self.root,
            document,
        })
    }
}

/// Registry of OCI runtimes stored in one config document
#[derive(Debug, Clone)]
pub struct RuntimeRegistry {
    root: TablePath,
    document: ConfigDocument,
}

impl RuntimeRegistry {
    /// Start building a registry rooted at the `root` table
    ///
    /// # Examples
    ///
    /// ```
    /// use ociconf_core::{CRIO_ROOT, ConfigSource, RuntimeRegistry};
    ///
    /// let mut registry = RuntimeRegistry::builder(CRIO_ROOT)
    ///     .source(ConfigSource::from_string(""))
    ///     .build()
    ///     .unwrap();
    /// registry.add_runtime("nvidia", "/usr/bin/nvidia-container-runtime", true).unwrap();
    /// assert_eq!(registry.default_runtime(), Some("nvidia"));
    /// ```
    pub fn builder(root: impl Into<TablePath>) -> RegistryBuilder {
        RegistryBuilder {
            root: root.into(),
            source: ConfigSource::Empty,
        }
    }

    /// Wrap an already-loaded document
    pub fn new(root: impl Into<TablePath>, document: ConfigDocument) -> Self {
        Self {
            root: root.into(),
            document,
        }
    }

    pub fn root(&self) -> &TablePath {
        &self.root
    }

    pub fn document(&self) -> &ConfigDocument {
        &self.document
    }

    pub fn into_document(self) -> ConfigDocument {
        self.document
    }

    /// The runtime named by `default_runtime`, if set
    pub fn default_runtime(&self) -> Option<&str> {
        self.document.get_str(&self.default_runtime_path())
    }

    /// Names of all registered runtimes, in document order
    pub fn runtime_names(&self) -> Vec<String> {
        self.document
            .get_table(&self.runtimes_path())
            .map(|runtimes| {
                runtimes
                    .iter()
                    .filter(|(_, item)| item.is_table_like())
                    .map(|(name, _)| name.to_owned())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Insert or overwrite the runtime `name`.
    ///
    /// When a source entry resolves (see the module docs), the entry is
    /// replaced by `runtime_path = binary_path`, `runtime_type = "oci"`,
    /// and the source's options. With no source, existing keys are kept
    /// and only the two identity fields are overwritten.
    /// Then the default pointer is synced:
    /// `set_as_default` points it at `name`; otherwise a pointer that
    /// currently names `name` is removed and any other pointer is kept.
    ///
    /// Writes are not transactional; on error the document may hold a
    /// partially written entry.
    pub fn add_runtime(
        &mut self,
        name: &str,
        binary_path: &str,
        set_as_default: bool,
    ) -> Result<()> {
        validate_name(name)?;

        // Snapshot before writing: the source may be `name` itself
        let inherited = self.inherited_options();

        let entry_path = self.entry_path(name);
        let entry = self.document.table_mut(&entry_path)?;
        if inherited.is_some() {
            let stale: Vec<String> = entry.iter().map(|(key, _)| key.to_owned()).collect();
            for key in &stale {
                entry.remove(key);
            }
        }
        entry.insert(RUNTIME_PATH, value(binary_path));
        entry.insert(RUNTIME_TYPE, value(OCI_RUNTIME_TYPE));
        let inherited = inherited.unwrap_or_default();
        for (key, item) in &inherited {
            entry.insert(key, item.clone());
        }
        info!(
            runtime = name,
            path = binary_path,
            inherited = inherited.len(),
            "Added runtime"
        );

        let default_path = self.default_runtime_path();
        if set_as_default {
            self.document.set(&default_path, value(name))?;
            info!(runtime = name, "Set default runtime");
        } else if self.default_runtime() == Some(name) {
            self.document.remove(&default_path);
            info!(runtime = name, "Cleared default runtime");
        }

        Ok(())
    }

    /// Look up the runtime `name`.
    ///
    /// A missing runtime is not an error: the returned entry reports
    /// `exists() == false` and an empty binary path.
    pub fn get_runtime_config(&self, name: &str) -> Result<RuntimeEntry<'_>> {
        Ok(self.entry(name))
    }

    /// Remove the runtime `name` and the default pointer if it names it.
    ///
    /// Tables left empty by the removal are pruned up to the root.
    /// Removing an unknown runtime only prunes.
    pub fn remove_runtime(&mut self, name: &str) -> Result<()> {
        validate_name(name)?;

        if self.default_runtime() == Some(name) {
            self.document.remove(&self.default_runtime_path());
            info!(runtime = name, "Cleared default runtime");
        }
        if self.document.remove(&self.entry_path(name)).is_some() {
            info!(runtime = name, "Removed runtime");
        } else {
            debug!(runtime = name, "Runtime not registered, nothing to remove");
        }
        self.document.prune_empty(&self.runtimes_path());

        Ok(())
    }

    fn entry(&self, name: &str) -> RuntimeEntry<'_> {
        let table = self.document.get_table(&self.entry_path(name));
        RuntimeEntry::new(name, table)
    }

    /// Resolve the single source entry and copy its non-identity options.
    ///
    /// `None` means no source entry exists.
    fn inherited_options(&self) -> Option<Vec<(String, Item)>> {
        let source = match self.default_runtime() {
            Some(default) => {
                let entry = self.entry(default);
                if entry.exists() {
                    Some(entry)
                } else {
                    warn!(runtime = default, "Default runtime has no entry");
                    None
                }
            }
            None => None,
        }
        .or_else(|| Some(self.entry(RUNC)).filter(|entry| entry.exists()));

        let Some(source) = source else {
            debug!("No source runtime, nothing to inherit");
            return None;
        };
        debug!(source = source.name(), "Inheriting runtime options");
        Some(
            source
                .options()
                .map(|(key, item)| (key.to_owned(), item.clone()))
                .collect(),
        )
    }

    fn runtime_path(&self) -> TablePath {
        self.root.child("runtime")
    }

    fn runtimes_path(&self) -> TablePath {
        self.runtime_path().child("runtimes")
    }

    fn entry_path(&self, name: &str) -> TablePath {
        self.runtimes_path().child(name)
    }

    fn default_runtime_path(&self) -> TablePath {
        self.runtime_path().child("default_runtime")
    }
}

impl fmt::Display for RuntimeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.document, f)
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidRuntimeName {
            name: name.to_string(),
        });
    }
    Ok(())
}
