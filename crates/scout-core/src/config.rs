//! The immutable scan request.
//!
//! A [`FindConfig`] describes one scan: which roots to enumerate, which
//! extensions to accept, and which traversal backend to use. The caller's
//! ignore predicate is held separately by the finder because it is a function
//! value and not serializable configuration.
//!
//! Defaults follow the finder's permissive conventions: scan the current
//! directory, match every file, use the in-process walker.

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::extensions::ExtensionFilter;

/// Which traversal strategy a scan uses.
///
/// Both backends produce result sets that are equal as multisets over the
/// same static tree; only discovery order differs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Recursive asynchronous walk performed in-process.
    #[default]
    InProcess,

    /// Delegation to the external `find(1)` utility, with a transparent
    /// fall back to the in-process walker where it is unavailable.
    Native,
}

/// Configuration for one scan.
///
/// Immutable for the lifetime of a scan; no two scans share state.
///
/// # Examples
///
/// ```
/// use scout_core::{BackendKind, ExtensionFilter, FindConfig};
///
/// let config = FindConfig::default();
/// assert_eq!(config.roots.len(), 1);
/// assert_eq!(config.roots[0].as_str(), ".");
/// assert!(config.extensions.is_all());
/// assert_eq!(config.backend, BackendKind::InProcess);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FindConfig {
    /// Root directories to scan, in order.
    pub roots: Vec<Utf8PathBuf>,

    /// Extension filter applied to candidate files.
    pub extensions: ExtensionFilter,

    /// Traversal backend to use.
    pub backend: BackendKind,
}

impl Default for FindConfig {
    fn default() -> Self {
        Self {
            roots: vec![Utf8PathBuf::from(".")],
            extensions: ExtensionFilter::All,
            backend: BackendKind::InProcess,
        }
    }
}

impl FindConfig {
    /// Creates a config scanning the given roots with default filtering.
    ///
    /// An empty root list is replaced with the current directory.
    #[must_use]
    pub fn new<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Utf8PathBuf>,
    {
        let roots: Vec<Utf8PathBuf> = roots.into_iter().map(Into::into).collect();
        Self {
            roots,
            ..Self::default()
        }
        .normalized()
    }

    /// Replaces an empty root list with the current directory.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        if self.roots.is_empty() {
            self.roots.push(Utf8PathBuf::from("."));
        }
        self
    }

    /// Validates the request.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyRoot`] if any root is the empty string.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.roots.iter().any(|root| root.as_str().is_empty()) {
            return Err(ConfigError::EmptyRoot);
        }
        Ok(())
    }
}
