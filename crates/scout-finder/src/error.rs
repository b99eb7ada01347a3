//! Error types for the scout-finder crate.
//!
//! This module provides [`FindError`], the single failure type a scan can
//! deliver. Every variant is fatal to its scan: there is no partial-success
//! mode, and no retries are attempted anywhere in this crate.
//!
//! Symbolic links and ignored paths are *not* errors; they are silently
//! excluded from results.

use camino::Utf8PathBuf;

/// Errors that can terminate a scan.
///
/// A scan delivers either a complete result set or exactly one of these.
///
/// # Examples
///
/// ```
/// use scout_finder::FindError;
/// use camino::Utf8PathBuf;
/// use std::io;
///
/// let err = FindError::read_dir(
///     Utf8PathBuf::from("/missing"),
///     io::Error::new(io::ErrorKind::NotFound, "no such directory"),
/// );
/// assert!(err.to_string().contains("/missing"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum FindError {
    /// A directory could not be read (nonexistent root, permission denied).
    #[error("failed to read directory {path}: {source}")]
    ReadDir {
        /// The directory that could not be read.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A metadata lookup failed for a candidate path.
    #[error("failed to stat {path}: {source}")]
    Stat {
        /// The path whose metadata could not be read.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The external search utility ran but reported an error.
    #[error("external search failed ({status}): {stderr}")]
    External {
        /// The process exit status.
        status: std::process::ExitStatus,
        /// Captured standard error, trimmed.
        stderr: String,
    },

    /// The external search utility could not be spawned at all.
    #[error("failed to spawn external search utility: {0}")]
    ExternalSpawn(#[source] std::io::Error),

    /// The external search utility is not installed on this system.
    ///
    /// The platform-fallback decorator consumes this by rerunning the scan
    /// with the in-process walker.
    #[error("external search utility not found on this system")]
    ExternalUnavailable,

    /// A traversed path was not valid UTF-8.
    #[error("path is not valid UTF-8: {}", .0.display())]
    NonUtf8Path(std::path::PathBuf),

    /// The external search utility produced non-UTF-8 output.
    #[error("external search output was not valid UTF-8")]
    NonUtf8Output,

    /// The scan request was invalid.
    #[error("invalid scan configuration: {0}")]
    Config(#[from] scout_core::ConfigError),

    /// The scan ended without delivering a terminal outcome.
    ///
    /// Only reachable if the runtime tears down mid-scan; ordinary failures
    /// surface as one of the variants above.
    #[error("scan aborted before a terminal result was delivered")]
    Aborted,
}

impl FindError {
    /// Creates a new [`FindError::ReadDir`] error.
    #[inline]
    pub fn read_dir(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::ReadDir {
            path: path.into(),
            source,
        }
    }

    /// Creates a new [`FindError::Stat`] error.
    #[inline]
    pub fn stat(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Stat {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` if the external utility was missing, which triggers
    /// the in-process fallback rather than failing the scan.
    #[inline]
    #[must_use]
    pub const fn is_external_unavailable(&self) -> bool {
        matches!(self, Self::ExternalUnavailable)
    }

    /// Returns the path associated with this error, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Utf8PathBuf> {
        match self {
            Self::ReadDir { path, .. } | Self::Stat { path, .. } => Some(path),
            _ => None,
        }
    }
}
