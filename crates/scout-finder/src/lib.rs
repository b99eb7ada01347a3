//! Concurrent file enumeration with interchangeable traversal backends.
//!
//! This crate finds regular files under a set of root directories that match
//! a set of extensions, excluding symbolic links, optionally filtered by a
//! caller-supplied [`IgnoreRule`], returning each match's path together with
//! its last-modification timestamp in milliseconds.
//!
//! # Architecture
//!
//! ```text
//! Finder::find()
//! │
//! ├── BackendKind::InProcess ──► walker: read_dir ──► inspect (lstat)
//! │                                  ▲                    │
//! │                                  └──── recurse ───────┘
//! │
//! └── BackendKind::Native ────► fallback decorator
//!                                  │
//!                                  ├── find(1) ──► stdout lines ──► stat
//!                                  └── (windows / utility missing)
//!                                        └──► in-process walker
//!
//!        all sub-operations fan in through one Coordinator:
//!        outstanding counter + accumulator + one-shot terminal outcome
//! ```
//!
//! Both backends converge on result sets equal as multisets over the same
//! static tree. Discovery order is backend- and filesystem-dependent and
//! deliberately unspecified.
//!
//! # Example
//!
//! ```no_run
//! use scout_core::ExtensionFilter;
//! use scout_finder::Finder;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), scout_finder::FindError> {
//!     let records = Finder::new(["html"])
//!         .with_extensions(ExtensionFilter::try_from_extensions([".js"])?)
//!         .find()
//!         .await?;
//!
//!     for record in &records {
//!         println!("{}\t{}", record.path, record.modified_ms);
//!     }
//!     Ok(())
//! }
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

mod backend;
mod coordinator;
pub mod error;
pub mod filter;
mod native;
mod walker;

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use camino::Utf8PathBuf;
use tracing::info;

use scout_core::{BackendKind, ExtensionFilter, FileRecord, FindConfig};

use crate::backend::{Backend, NativeWithFallback, ScanRequest};
use crate::walker::InProcessBackend;

pub use error::FindError;
pub use filter::{IgnoreRule, SubstringIgnore};

/// A configured file finder.
///
/// Immutable once built; one [`find`](Finder::find) call is one scan, and no
/// two scans share state.
///
/// # Examples
///
/// ```no_run
/// use scout_core::{BackendKind, ExtensionFilter};
/// use scout_finder::Finder;
///
/// # async fn example() -> Result<(), scout_finder::FindError> {
/// let records = Finder::new(["html", "static"])
///     .with_extensions(ExtensionFilter::try_from_extensions([".js", ".css"])?)
///     .with_ignore(|path: &camino::Utf8Path| path.as_str().contains("node_modules"))
///     .with_backend(BackendKind::Native)
///     .find()
///     .await?;
/// # let _ = records;
/// # Ok(())
/// # }
/// ```
pub struct Finder {
    config: FindConfig,
    ignore: Option<Arc<dyn IgnoreRule>>,
}

impl Finder {
    /// Creates a finder over the given roots with default settings:
    /// every file matches, no ignore rule, in-process backend.
    ///
    /// An empty root list is replaced with the current directory.
    #[must_use]
    pub fn new<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Utf8PathBuf>,
    {
        Self::from_config(FindConfig::new(roots))
    }

    /// Creates a finder from a full scan request.
    #[must_use]
    pub fn from_config(config: FindConfig) -> Self {
        Self {
            config: config.normalized(),
            ignore: None,
        }
    }

    /// Sets the extension filter.
    #[must_use]
    pub fn with_extensions(mut self, extensions: ExtensionFilter) -> Self {
        self.config.extensions = extensions;
        self
    }

    /// Sets the ignore rule, evaluated on candidate paths before any I/O.
    #[must_use]
    pub fn with_ignore(mut self, rule: impl IgnoreRule) -> Self {
        self.ignore = Some(Arc::new(rule));
        self
    }

    /// Selects the traversal backend.
    #[must_use]
    pub fn with_backend(mut self, backend: BackendKind) -> Self {
        self.config.backend = backend;
        self
    }

    /// Returns the scan request this finder was built with.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &FindConfig {
        &self.config
    }

    /// Runs one scan to completion.
    ///
    /// Delivers either the full record set or the scan's single failure;
    /// there is no partial-success mode. No timeout is imposed internally,
    /// so deadline handling is the caller's concern.
    ///
    /// # Errors
    ///
    /// Returns [`FindError`] on an invalid request, an unreadable directory
    /// or metadata lookup, or an external-utility failure. See the
    /// [`error`] module for the taxonomy.
    pub async fn find(&self) -> Result<Vec<FileRecord>, FindError> {
        self.config.validate()?;

        let started = Instant::now();
        let request = ScanRequest {
            roots: self.config.roots.iter().cloned().collect(),
            extensions: self.config.extensions.clone(),
            ignore: self.ignore.clone(),
        };

        let records = match self.config.backend {
            BackendKind::InProcess => InProcessBackend.scan(request).await?,
            BackendKind::Native => NativeWithFallback::default().scan(request).await?,
        };

        info!(
            backend = ?self.config.backend,
            records = records.len(),
            elapsed = ?started.elapsed(),
            "scan finished"
        );
        Ok(records)
    }
}

impl fmt::Debug for Finder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Finder")
            .field("config", &self.config)
            .field("ignore", &self.ignore.as_ref().map(|_| "<rule>"))
            .finish()
    }
}

/// Runs one scan with the in-process walker, regardless of
/// `config.backend`.
///
/// # Errors
///
/// See [`Finder::find`].
pub async fn find_in_process(config: FindConfig) -> Result<Vec<FileRecord>, FindError> {
    Finder::from_config(FindConfig {
        backend: BackendKind::InProcess,
        ..config
    })
    .find()
    .await
}

/// Runs one scan with the external backend (with platform fallback),
/// regardless of `config.backend`.
///
/// # Errors
///
/// See [`Finder::find`].
pub async fn find_native(config: FindConfig) -> Result<Vec<FileRecord>, FindError> {
    Finder::from_config(FindConfig {
        backend: BackendKind::Native,
        ..config
    })
    .find()
    .await
}
