//! Extension-set matching for candidate paths.
//!
//! [`ExtensionFilter`] is either the wildcard sentinel ([`ExtensionFilter::All`])
//! that accepts every file, or a normalized set of extensions. Matching is
//! ASCII case-insensitive in both traversal backends; this mirrors the
//! case-insensitive name globs handed to the external search utility, so the
//! two backends converge on the same result set.
//!
//! # Examples
//!
//! ```
//! use scout_core::ExtensionFilter;
//! use camino::Utf8Path;
//!
//! let filter = ExtensionFilter::try_from_extensions([".js", ".CSS"]).unwrap();
//!
//! assert!(filter.matches(Utf8Path::new("app/main.js")));
//! assert!(filter.matches(Utf8Path::new("styles/site.css")));
//! assert!(filter.matches(Utf8Path::new("styles/SITE.CSS")));
//! assert!(!filter.matches(Utf8Path::new("readme.md")));
//! assert!(!filter.matches(Utf8Path::new("Makefile")));
//! ```

use camino::Utf8Path;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::ConfigError;

/// Which file extensions a scan should accept.
///
/// Extensions are stored normalized: leading dot stripped and ASCII
/// lowercased. A path with no extension (no `.` in its final segment) never
/// matches a [`Set`](ExtensionFilter::Set) filter, only [`All`](ExtensionFilter::All).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtensionFilter {
    /// Wildcard sentinel: every regular file matches.
    #[default]
    All,

    /// A set of normalized extensions; a file matches if its extension is in
    /// the set. An empty set matches nothing.
    Set(SmallVec<[String; 4]>),
}

impl ExtensionFilter {
    /// Builds a filter from caller-supplied extensions.
    ///
    /// Each extension may be given with or without its leading dot
    /// (`".js"` and `"js"` are equivalent) and is lowercased for matching.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyExtension`] for an extension that is empty
    /// after stripping the leading dot.
    pub fn try_from_extensions<I, S>(extensions: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set: SmallVec<[String; 4]> = SmallVec::new();
        for ext in extensions {
            let normalized = Self::normalize(ext.as_ref());
            if normalized.is_empty() {
                return Err(ConfigError::EmptyExtension(ext.as_ref().to_owned()));
            }
            if !set.contains(&normalized) {
                set.push(normalized);
            }
        }
        Ok(Self::Set(set))
    }

    /// Strips a single leading dot and lowercases.
    fn normalize(ext: &str) -> String {
        ext.strip_prefix('.').unwrap_or(ext).to_ascii_lowercase()
    }

    /// Returns `true` if `path` passes this filter.
    ///
    /// The extension is taken from the final path segment: the substring
    /// after the last `.`. Matching is ASCII case-insensitive.
    #[must_use]
    pub fn matches(&self, path: &Utf8Path) -> bool {
        match self {
            Self::All => true,
            Self::Set(set) => path
                .extension()
                .is_some_and(|ext| set.iter().any(|e| e.eq_ignore_ascii_case(ext))),
        }
    }

    /// Returns `true` if this is the wildcard sentinel.
    #[inline]
    #[must_use]
    pub const fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// Returns the normalized extensions, or `None` for the wildcard.
    #[must_use]
    pub fn extensions(&self) -> Option<&[String]> {
        match self {
            Self::All => None,
            Self::Set(set) => Some(set),
        }
    }
}
