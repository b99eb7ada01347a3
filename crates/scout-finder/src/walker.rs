//! In-process traversal backend.
//!
//! Recursively enumerates all non-symlink regular files under each root by
//! fanning out one task per directory read and one task per entry
//! inspection, all funneled through the scan's [`Coordinator`].
//!
//! # Algorithm
//!
//! 1. Each root dispatches a directory-read operation.
//! 2. A directory read dispatches a per-entry inspection for every child
//!    whose path survives the ignore rule; ignored paths incur no I/O.
//!    A failed read is fatal to the whole scan.
//! 3. An inspection takes metadata *without following symlinks*. Symlinks
//!    are dropped silently; directories recurse with a fresh directory-read;
//!    regular files passing the extension filter contribute one record.
//! 4. The scan is done when the outstanding count returns to zero. Children
//!    are always registered before their parent operation completes, so the
//!    count cannot touch zero mid-dispatch.
//!
//! Every failure path decrements the outstanding count and settles the scan
//! through the coordinator; no error is swallowed and no scan can stall.

use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::debug;

use scout_core::{mtime_millis, FileRecord};

use crate::backend::{Backend, ScanRequest};
use crate::coordinator::{Coordinator, Completion};
use crate::error::FindError;

/// The recursive in-process walker.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct InProcessBackend;

/// Per-scan state shared by all spawned walk tasks.
struct WalkContext {
    coordinator: Coordinator,
    request: ScanRequest,
}

impl Backend for InProcessBackend {
    async fn scan(&self, request: ScanRequest) -> Result<Vec<FileRecord>, FindError> {
        start(request).wait().await
    }
}

/// Dispatches the root directory reads and hands back the completion handle.
fn start(request: ScanRequest) -> Completion {
    let (coordinator, completion) = Coordinator::new();
    let ctx = Arc::new(WalkContext {
        coordinator,
        request,
    });

    debug!(roots = ctx.request.roots.len(), "starting in-process walk");

    // Register every root before any task can run its completion handler,
    // so the counter cannot reach zero until the whole tree is visited.
    for _ in 0..ctx.request.roots.len() {
        ctx.coordinator.register();
    }
    for root in ctx.request.roots.iter() {
        spawn_read_dir(Arc::clone(&ctx), root.clone());
    }

    completion
}

/// Dispatches one directory-read operation (already registered).
fn spawn_read_dir(ctx: Arc<WalkContext>, dir: Utf8PathBuf) {
    tokio::spawn(async move {
        if !ctx.coordinator.is_settled() {
            read_dir(&ctx, &dir).await;
        }
        ctx.coordinator.complete();
    });
}

/// Reads one directory and dispatches a per-entry inspection for each child.
async fn read_dir(ctx: &Arc<WalkContext>, dir: &Utf8Path) {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(err) => {
            ctx.coordinator.fail(FindError::read_dir(dir, err));
            return;
        }
    };

    loop {
        match entries.next_entry().await {
            Ok(Some(entry)) => {
                let path = match Utf8PathBuf::from_path_buf(entry.path()) {
                    Ok(path) => path,
                    Err(raw) => {
                        ctx.coordinator.fail(FindError::NonUtf8Path(raw));
                        return;
                    }
                };

                // Evaluated before any I/O is dispatched for the candidate;
                // an ignored directory is never descended into.
                if ctx.request.is_ignored(&path) {
                    continue;
                }

                ctx.coordinator.register();
                spawn_inspect(Arc::clone(ctx), path);
            }
            Ok(None) => break,
            Err(err) => {
                ctx.coordinator.fail(FindError::read_dir(dir, err));
                return;
            }
        }
    }
}

/// Dispatches one per-entry inspection (already registered).
fn spawn_inspect(ctx: Arc<WalkContext>, path: Utf8PathBuf) {
    tokio::spawn(async move {
        if !ctx.coordinator.is_settled() {
            inspect(&ctx, path).await;
        }
        ctx.coordinator.complete();
    });
}

/// Classifies one entry from its lstat metadata and acts on it.
async fn inspect(ctx: &Arc<WalkContext>, path: Utf8PathBuf) {
    // lstat: never follows symlinks.
    let meta = match tokio::fs::symlink_metadata(&path).await {
        Ok(meta) => meta,
        Err(err) => {
            ctx.coordinator.fail(FindError::stat(path, err));
            return;
        }
    };

    let file_type = meta.file_type();
    if file_type.is_symlink() {
        // Dropped silently: no contribution, no error.
    } else if file_type.is_dir() {
        ctx.coordinator.register();
        spawn_read_dir(Arc::clone(ctx), path);
    } else if file_type.is_file() && ctx.request.extensions.matches(&path) {
        match mtime_millis(&meta) {
            Ok(modified_ms) => ctx.coordinator.push(FileRecord::new(path, modified_ms)),
            Err(err) => ctx.coordinator.fail(FindError::stat(path, err)),
        }
    }
    // Other entry kinds (fifos, sockets, devices) are not regular files and
    // contribute nothing, matching the external utility's files-only output.
}
