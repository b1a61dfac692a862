//! Read-only view over one runtime entry

use std::fmt;

use ociconf_document::{ConfigDocument, Item, TableLike, TablePath};

use crate::error::Result;

/// Key holding the runtime's executable path
pub const RUNTIME_PATH: &str = "runtime_path";

/// Key holding the runtime's type
pub const RUNTIME_TYPE: &str = "runtime_type";

/// Keys that are always written explicitly and never inherited
pub const IDENTITY_FIELDS: [&str; 2] = [RUNTIME_PATH, RUNTIME_TYPE];

/// A named runtime entry borrowed from a registry's document.
///
/// A lookup miss yields an entry with no table; every reader on it returns
/// the empty/absent value rather than failing.
#[derive(Clone)]
pub struct RuntimeEntry<'a> {
    name: String,
    table: Option<&'a dyn TableLike>,
}

impl<'a> RuntimeEntry<'a> {
    pub(crate) fn new(name: impl Into<String>, table: Option<&'a dyn TableLike>) -> Self {
        Self {
            name: name.into(),
            table,
        }
    }

    /// The zero-value entry returned when `name` is not registered
    pub fn missing(name: impl Into<String>) -> Self {
        Self::new(name, None)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// True if the entry exists in the document
    pub fn exists(&self) -> bool {
        self.table.is_some()
    }

    /// The runtime's executable path, or `""` if unset or missing
    pub fn binary_path(&self) -> &'a str {
        self.get_str(RUNTIME_PATH).unwrap_or_default()
    }

    pub fn runtime_type(&self) -> Option<&'a str> {
        self.get_str(RUNTIME_TYPE)
    }

    /// Get a raw option value
    pub fn get(&self, key: &str) -> Option<&'a Item> {
        self.table?.get(key)
    }

    /// Get a string option; non-string values yield `None`
    pub fn get_str(&self, key: &str) -> Option<&'a str> {
        self.get(key)?.as_str()
    }

    /// Iterate the options a new entry would inherit from this one.
    ///
    /// Identity fields are skipped; everything else is yielded verbatim in
    /// document order.
    pub fn options(&self) -> impl Iterator<Item = (&'a str, &'a Item)> + use<'a> {
        self.table
            .into_iter()
            .flat_map(|table| table.iter())
            .filter(|(key, _)| !IDENTITY_FIELDS.contains(key))
    }

    /// The inheritable options as plain TOML values, formatting dropped
    pub fn options_table(&self) -> Result<toml::Table> {
        let mut options = ConfigDocument::new();
        for (key, item) in self.options() {
            options.set(&TablePath::new([key]), item.clone())?;
        }
        Ok(options.normalize()?)
    }
}

impl fmt::Debug for RuntimeEntry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuntimeEntry")
            .field("name", &self.name)
            .field("exists", &self.exists())
            .field("binary_path", &self.binary_path())
            .finish()
    }
}
