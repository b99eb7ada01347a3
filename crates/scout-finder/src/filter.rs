//! Caller-supplied ignore predicates.
//!
//! An [`IgnoreRule`] is evaluated on the *candidate path string* before any
//! filesystem I/O is issued for that path. A path the rule ignores is
//! excluded silently: no metadata lookup is dispatched for it, and an ignored
//! directory is never descended into.
//!
//! The trait has a blanket implementation for closures, so plain functions
//! work directly:
//!
//! ```
//! use scout_finder::IgnoreRule;
//! use camino::Utf8Path;
//!
//! let rule = |path: &Utf8Path| path.as_str().ends_with(".min.js");
//! assert!(rule.is_ignored(Utf8Path::new("vendor/app.min.js")));
//! assert!(!rule.is_ignored(Utf8Path::new("src/app.js")));
//! ```

use camino::Utf8Path;

/// A predicate deciding which candidate paths to exclude from a scan.
///
/// # Thread Safety
///
/// Rules must be [`Send`] and [`Sync`] because both backends evaluate them
/// from spawned tasks, and `'static` so they can be shared across those
/// tasks for the lifetime of the scan.
pub trait IgnoreRule: Send + Sync + 'static {
    /// Returns `true` if the path should be excluded before any I/O on it.
    fn is_ignored(&self, path: &Utf8Path) -> bool;
}

impl<F> IgnoreRule for F
where
    F: Fn(&Utf8Path) -> bool + Send + Sync + 'static,
{
    #[inline]
    fn is_ignored(&self, path: &Utf8Path) -> bool {
        self(path)
    }
}

/// Ignores any path containing one of the given substrings.
///
/// This is the rule behind the CLI's `--ignore` flag; library callers with
/// richer needs implement [`IgnoreRule`] themselves.
///
/// # Examples
///
/// ```
/// use scout_finder::{IgnoreRule, SubstringIgnore};
/// use camino::Utf8Path;
///
/// let rule = SubstringIgnore::new(["node_modules", ".git"]);
///
/// assert!(rule.is_ignored(Utf8Path::new("web/node_modules/x.js")));
/// assert!(rule.is_ignored(Utf8Path::new(".git/config")));
/// assert!(!rule.is_ignored(Utf8Path::new("src/main.js")));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SubstringIgnore {
    substrings: Vec<String>,
}

impl SubstringIgnore {
    /// Creates a rule from a list of substrings.
    ///
    /// An empty list ignores nothing.
    #[must_use]
    pub fn new<I, S>(substrings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            substrings: substrings.into_iter().map(Into::into).collect(),
        }
    }
}

impl IgnoreRule for SubstringIgnore {
    fn is_ignored(&self, path: &Utf8Path) -> bool {
        let path = path.as_str();
        self.substrings.iter().any(|s| path.contains(s.as_str()))
    }
}
