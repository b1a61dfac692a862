//! Dotted-path addressing for TOML documents
//!
//! A [`TablePath`] names a node in a document by its chain of keys.
//!
//! # Path Syntax
//!
//! - Dot-separated keys: `crio.runtime.default_runtime`
//! - Quoted keys containing dots: `crio.runtime.runtimes."kata.v2"`
//!
//! # Examples
//!
//! ```
//! use ociconf_document::TablePath;
//!
//! let path = TablePath::parse("crio.runtime.runtimes.\"kata.v2\"");
//! assert_eq!(path.segments(), ["crio", "runtime", "runtimes", "kata.v2"]);
//! assert_eq!(path.to_string(), "crio.runtime.runtimes.\"kata.v2\"");
//! ```

use std::fmt;
use std::str::FromStr;

/// An owned chain of keys addressing a node in a document
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TablePath {
    segments: Vec<String>,
}

impl TablePath {
    /// Build a path from already-split segments.
    ///
    /// Segments are taken verbatim; no quoting or splitting is applied.
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a dotted path string into segments.
    ///
    /// Quoted segments (`"..."` or `'...'`) may contain dots. Inside double
    /// quotes a backslash escapes the next character. Empty unquoted
    /// segments are skipped.
    ///
    /// # Examples
    ///
    /// ```
    /// use ociconf_document::TablePath;
    ///
    /// let path = TablePath::parse("crio.runtime.default_runtime");
    /// assert_eq!(path.segments(), ["crio", "runtime", "default_runtime"]);
    ///
    /// let path = TablePath::parse("a..b");
    /// assert_eq!(path.segments(), ["a", "b"]);
    /// ```
    pub fn parse(path: &str) -> Self {
        let mut segments = Vec::new();
        let mut current = String::new();
        let mut quoted = false;
        let mut chars = path.chars();

        while let Some(ch) = chars.next() {
            match ch {
                '.' => {
                    if quoted || !current.is_empty() {
                        segments.push(std::mem::take(&mut current));
                    }
                    quoted = false;
                }
                '"' if current.is_empty() && !quoted => {
                    quoted = true;
                    while let Some(ch) = chars.next() {
                        match ch {
                            '"' => break,
                            '\\' => {
                                if let Some(escaped) = chars.next() {
                                    current.push(escaped);
                                }
                            }
                            _ => current.push(ch),
                        }
                    }
                }
                '\'' if current.is_empty() && !quoted => {
                    quoted = true;
                    for ch in chars.by_ref() {
                        if ch == '\'' {
                            break;
                        }
                        current.push(ch);
                    }
                }
                _ => current.push(ch),
            }
        }

        if quoted || !current.is_empty() {
            segments.push(current);
        }

        Self { segments }
    }

    /// Return a new path with `key` appended.
    pub fn child(&self, key: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(key.into());
        Self { segments }
    }

    /// Return the path of the enclosing table, or `None` at the root.
    pub fn parent(&self) -> Option<Self> {
        let (_, parent) = self.segments.split_last()?;
        Some(Self {
            segments: parent.to_vec(),
        })
    }

    /// The final key of the path.
    pub fn leaf(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }
}

impl FromStr for TablePath {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for TablePath {
    fn from(path: &str) -> Self {
        Self::parse(path)
    }
}

impl From<&TablePath> for TablePath {
    fn from(path: &TablePath) -> Self {
        path.clone()
    }
}

impl fmt::Display for TablePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            if is_bare_key(segment) {
                f.write_str(segment)?;
            } else {
                f.write_str("\"")?;
                for ch in segment.chars() {
                    if ch == '"' || ch == '\\' {
                        f.write_str("\\")?;
                    }
                    write!(f, "{ch}")?;
                }
                f.write_str("\"")?;
            }
        }
        Ok(())
    }
}

fn is_bare_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
