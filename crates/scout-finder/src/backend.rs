//! Backend selection and the platform-fallback decorator.
//!
//! The two traversal strategies implement one capability: take a scan
//! request, return the full record set or the scan's single failure. The
//! [`Backend`] trait models that seam, and [`NativeWithFallback`] wraps the
//! external backend so platform concerns (Windows, missing utility) stay out
//! of the traversal code itself.

use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, warn};

use scout_core::{ExtensionFilter, FileRecord};

use crate::error::FindError;
use crate::filter::IgnoreRule;
use crate::native::NativeBackend;
use crate::walker::InProcessBackend;

/// One scan's immutable inputs, shared across its spawned tasks.
///
/// Cloning is cheap; all clones refer to the same roots and ignore rule.
#[derive(Clone)]
pub(crate) struct ScanRequest {
    /// Root directories, in order.
    pub(crate) roots: Arc<[Utf8PathBuf]>,

    /// Extension filter applied to candidate files.
    pub(crate) extensions: ExtensionFilter,

    /// Optional caller ignore predicate.
    pub(crate) ignore: Option<Arc<dyn IgnoreRule>>,
}

impl ScanRequest {
    /// Returns `true` if the caller's ignore rule excludes `path`.
    pub(crate) fn is_ignored(&self, path: &Utf8Path) -> bool {
        self.ignore.as_ref().is_some_and(|rule| rule.is_ignored(path))
    }
}

/// A traversal strategy: scan a request to a full result set or a failure.
///
/// Both implementations must converge on semantically equivalent output over
/// the same static tree (equal as multisets; discovery order is unspecified).
pub(crate) trait Backend {
    /// Runs one scan to completion.
    async fn scan(&self, request: ScanRequest) -> Result<Vec<FileRecord>, FindError>;
}

/// Decorator around the external backend that falls back to the in-process
/// walker on Windows or when the search utility is not installed.
#[derive(Default)]
pub(crate) struct NativeWithFallback {
    native: NativeBackend,
    fallback: InProcessBackend,
}

impl Backend for NativeWithFallback {
    async fn scan(&self, request: ScanRequest) -> Result<Vec<FileRecord>, FindError> {
        if cfg!(windows) {
            debug!("external search utility is not used on windows, using in-process walker");
            return self.fallback.scan(request).await;
        }

        match self.native.scan(request.clone()).await {
            Err(err) if err.is_external_unavailable() => {
                warn!("external search utility unavailable, falling back to in-process walker");
                self.fallback.scan(request).await
            }
            outcome => outcome,
        }
    }
}
