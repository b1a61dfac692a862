//! Format-preserving TOML document with path-based editing

use std::fmt;

use toml_edit::{DocumentMut, Item, Table, TableLike};

use crate::error::{Error, Result};
use crate::path::TablePath;

/// A parsed TOML configuration document.
///
/// Edits go through `toml_edit`, so comments, whitespace, and key order of
/// untouched parts of the document survive a load/render round trip.
#[derive(Debug, Clone, Default)]
pub struct ConfigDocument {
    doc: DocumentMut,
}

impl ConfigDocument {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a document from TOML text
    ///
    /// # Examples
    ///
    /// ```
    /// use ociconf_document::{ConfigDocument, TablePath};
    ///
    /// let doc = ConfigDocument::load("[crio.runtime]\ndefault_runtime = \"crun\"\n").unwrap();
    /// let path = TablePath::parse("crio.runtime.default_runtime");
    /// assert_eq!(doc.get_str(&path), Some("crun"));
    ///
    /// assert!(ConfigDocument::load("[crio").is_err());
    /// ```
    pub fn load(source: &str) -> Result<Self> {
        let doc: DocumentMut = source
            .parse()
            .map_err(|e: toml_edit::TomlError| Error::parse(e.to_string()))?;
        Ok(Self { doc })
    }

    /// True if the document has no keys at all
    pub fn is_empty(&self) -> bool {
        self.doc.as_table().is_empty()
    }

    /// Get the item at `path`, if present.
    ///
    /// Both standard and inline tables are traversed.
    pub fn get(&self, path: &TablePath) -> Option<&Item> {
        let (first, rest) = path.segments().split_first()?;
        let mut item = self.doc.as_table().get(first)?;
        for key in rest {
            item = item.as_table_like()?.get(key)?;
        }
        Some(item)
    }

    /// Get the string value at `path`. Non-string values yield `None`.
    pub fn get_str(&self, path: &TablePath) -> Option<&str> {
        self.get(path)?.as_str()
    }

    /// Get the table at `path`. The empty path addresses the root table.
    pub fn get_table(&self, path: &TablePath) -> Option<&dyn TableLike> {
        if path.is_empty() {
            return Some(self.doc.as_table());
        }
        self.get(path)?.as_table_like()
    }

    /// Get the table at `path` for writing, creating it if it is missing.
    ///
    /// Missing tables along the way are created as implicit tables, so no
    /// header is rendered for a table that only holds other tables.
    ///
    /// # Errors
    ///
    /// Returns `PathSetFailed` if a node along the path exists but is not a
    /// table.
    pub fn table_mut(&mut self, path: &TablePath) -> Result<&mut dyn TableLike> {
        let mut table: &mut dyn TableLike = self.doc.as_table_mut();
        for (depth, key) in path.segments().iter().enumerate() {
            if !table.contains_key(key) {
                let mut child = Table::new();
                child.set_implicit(true);
                table.insert(key, Item::Table(child));
            }
            let Some(next) = table.get_mut(key).and_then(Item::as_table_like_mut) else {
                let blocked = TablePath::new(path.segments()[..=depth].iter().cloned());
                return Err(Error::path_set(path, format!("{blocked} is not a table")));
            };
            table = next;
        }
        Ok(table)
    }

    /// Set the item at `path`, replacing any existing item.
    ///
    /// Intermediate tables are created as needed (see [`Self::table_mut`]).
    ///
    /// # Examples
    ///
    /// ```
    /// use ociconf_document::{ConfigDocument, TablePath, value};
    ///
    /// let mut doc = ConfigDocument::new();
    /// let path = TablePath::parse("crio.runtime.default_runtime");
    /// doc.set(&path, value("crun")).unwrap();
    /// assert_eq!(doc.get_str(&path), Some("crun"));
    /// ```
    pub fn set(&mut self, path: &TablePath, item: Item) -> Result<()> {
        let (Some(parent), Some(key)) = (path.parent(), path.leaf()) else {
            return Err(Error::EmptyPath);
        };
        self.table_mut(&parent)?.insert(key, item);
        Ok(())
    }

    /// Remove the item at `path`, returning it. Missing paths are a no-op.
    pub fn remove(&mut self, path: &TablePath) -> Option<Item> {
        let parent = path.parent()?;
        let key = path.leaf()?;
        self.existing_table_mut(&parent)?.remove(key)
    }

    /// Remove empty tables, starting at `path` and walking towards the root.
    ///
    /// Stops at the first table that still holds any key. Missing nodes
    /// along the way are skipped.
    pub fn prune_empty(&mut self, path: &TablePath) {
        let mut current = Some(path.clone());
        while let Some(path) = current.filter(|p| !p.is_empty()) {
            match self.get_table(&path) {
                Some(table) if table.is_empty() => {
                    self.remove(&path);
                }
                Some(_) => break,
                None => {}
            }
            current = path.parent();
        }
    }

    /// Value-level view of the document, ignoring formatting and comments.
    pub fn normalize(&self) -> Result<toml::Table> {
        self.doc
            .to_string()
            .parse::<toml::Table>()
            .map_err(|e| Error::parse(e.to_string()))
    }

    /// Check semantic equality.
    ///
    /// Formatting, comments, key order, and whether intermediate tables are
    /// spelled out with headers are all ignored.
    pub fn semantic_eq(&self, other: &ConfigDocument) -> bool {
        match (self.normalize(), other.normalize()) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }

    fn existing_table_mut(&mut self, path: &TablePath) -> Option<&mut dyn TableLike> {
        let mut table: &mut dyn TableLike = self.doc.as_table_mut();
        for key in path.segments() {
            table = table.get_mut(key)?.as_table_like_mut()?;
        }
        Some(table)
    }
}

impl fmt::Display for ConfigDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.doc, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use toml_edit::value;

    fn path(s: &str) -> TablePath {
        TablePath::parse(s)
    }

    #[test]
    fn test_get_nested() {
        let doc = ConfigDocument::load(
            "[crio.runtime.runtimes.runc]\nruntime_path = \"/usr/bin/runc\"\n",
        )
        .unwrap();
        assert_eq!(
            doc.get_str(&path("crio.runtime.runtimes.runc.runtime_path")),
            Some("/usr/bin/runc")
        );
        assert!(doc.get(&path("crio.runtime.runtimes.crun")).is_none());
        assert!(doc.get(&path("")).is_none());
    }

    #[test]
    fn test_get_through_inline_table() {
        let doc = ConfigDocument::load(
            "[crio.runtime]\nruntimes = { runc = { runtime_path = \"/usr/bin/runc\" } }\n",
        )
        .unwrap();
        assert_eq!(
            doc.get_str(&path("crio.runtime.runtimes.runc.runtime_path")),
            Some("/usr/bin/runc")
        );
    }

    #[test]
    fn test_set_creates_implicit_tables() {
        let mut doc = ConfigDocument::new();
        doc.set(&path("crio.runtime.runtimes.test.runtime_path"), value("/usr/bin/test"))
            .unwrap();
        assert_eq!(
            doc.to_string(),
            "[crio.runtime.runtimes.test]\nruntime_path = \"/usr/bin/test\"\n"
        );
    }

    #[test]
    fn test_set_through_scalar_fails() {
        let mut doc = ConfigDocument::load("[crio]\nruntime = \"oops\"\n").unwrap();
        let err = doc
            .set(&path("crio.runtime.default_runtime"), value("crun"))
            .unwrap_err();
        assert!(matches!(err, Error::PathSetFailed { .. }));
        assert!(err.to_string().contains("crio.runtime is not a table"));
    }

    #[test]
    fn test_set_empty_path_fails() {
        let mut doc = ConfigDocument::new();
        assert!(matches!(
            doc.set(&TablePath::default(), value("x")),
            Err(Error::EmptyPath)
        ));
    }

    #[test]
    fn test_remove() {
        let mut doc =
            ConfigDocument::load("[crio.runtime]\ndefault_runtime = \"crun\"\nx = 1\n").unwrap();
        let removed = doc.remove(&path("crio.runtime.default_runtime"));
        assert_eq!(removed.and_then(|i| i.as_str().map(String::from)), Some("crun".into()));
        assert!(doc.get(&path("crio.runtime.default_runtime")).is_none());
        assert!(doc.remove(&path("crio.missing.key")).is_none());
    }

    #[test]
    fn test_prune_empty_stops_at_non_empty() {
        let mut doc = ConfigDocument::load(
            "[crio.image]\nsignature_policy = \"/etc/crio/policy.json\"\n[crio.runtime.runtimes.runc]\n",
        )
        .unwrap();
        doc.prune_empty(&path("crio.runtime.runtimes.runc"));
        assert!(doc.get(&path("crio.runtime")).is_none());
        assert!(doc.get(&path("crio.image")).is_some());
    }

    #[test]
    fn test_prune_empty_to_root() {
        let mut doc = ConfigDocument::load("[crio.runtime.runtimes.runc]\n").unwrap();
        doc.prune_empty(&path("crio.runtime.runtimes.runc"));
        assert!(doc.is_empty());
        assert!(doc.to_string().trim().is_empty());
    }

    #[test]
    fn test_semantic_eq_ignores_spelling() {
        let a = ConfigDocument::load("[crio]\n[crio.runtime]\nx = 1\n").unwrap();
        let b = ConfigDocument::load("crio.runtime.x = 1\n").unwrap();
        let c = ConfigDocument::load("[crio.runtime]\nx = 2\n").unwrap();
        assert!(a.semantic_eq(&b));
        assert!(!a.semantic_eq(&c));
    }

    #[test]
    fn test_round_trip_preserves_comments() {
        let source = "# managed by ociconf\n[crio.runtime]\n# the default\ndefault_runtime = \"crun\"\n";
        let doc = ConfigDocument::load(source).unwrap();
        assert_eq!(doc.to_string(), source);
    }
}
