//! External-process traversal backend.
//!
//! Delegates traversal to the `find(1)` utility, scoped to the scan's roots
//! with a regular-files-only constraint and, for a non-wildcard extension
//! filter, an OR-chain of case-insensitive name globs. Standard output is
//! buffered until the process exits, split into lines, filtered through the
//! caller's ignore rule, and each surviving path is resolved to metadata
//! through the scan's [`Coordinator`].
//!
//! The utility's exit does not finish the scan by itself: all dispatched
//! metadata lookups must complete first.
//!
//! Platform fallback (Windows, utility missing) is the wrapping decorator's
//! concern; this module reports [`FindError::ExternalUnavailable`] and does
//! nothing else about it.

use std::io;
use std::process::Stdio;

use camino::Utf8PathBuf;
use tokio::process::Command;
use tracing::debug;

use scout_core::{mtime_millis, FileRecord};

use crate::backend::{Backend, ScanRequest};
use crate::coordinator::Coordinator;
use crate::error::FindError;

/// The `find(1)` delegation backend.
pub(crate) struct NativeBackend {
    program: String,
}

impl Default for NativeBackend {
    fn default() -> Self {
        Self {
            program: "find".to_owned(),
        }
    }
}

impl NativeBackend {
    /// Overrides the searched-for program name. Test hook.
    #[cfg(test)]
    pub(crate) fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Backend for NativeBackend {
    async fn scan(&self, request: ScanRequest) -> Result<Vec<FileRecord>, FindError> {
        // An empty extension set matches nothing; `find` has no glob to
        // express that, so short-circuit instead of running it.
        if request.extensions.extensions().is_some_and(<[String]>::is_empty) {
            return Ok(Vec::new());
        }

        let args = build_args(&request);
        debug!(program = %self.program, ?args, "running external search");

        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|err| {
                if err.kind() == io::ErrorKind::NotFound {
                    FindError::ExternalUnavailable
                } else {
                    FindError::ExternalSpawn(err)
                }
            })?;

        if !output.status.success() {
            return Err(FindError::External {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }

        let stdout = String::from_utf8(output.stdout).map_err(|_| FindError::NonUtf8Output)?;

        let (coordinator, completion) = Coordinator::new();

        // Guard operation covering the dispatch loop itself: an empty result
        // still delivers, and the counter cannot touch zero mid-dispatch.
        coordinator.register();
        for line in split_lines(&stdout) {
            let path = Utf8PathBuf::from(line);

            // Post-search, pre-stat: ignored paths incur no metadata lookup.
            if request.is_ignored(&path) {
                continue;
            }

            coordinator.register();
            spawn_stat(coordinator.clone(), path);
        }
        coordinator.complete();

        completion.wait().await
    }
}

/// Builds the `find` argument list: roots, files-only, name globs.
fn build_args(request: &ScanRequest) -> Vec<String> {
    let mut args: Vec<String> = request
        .roots
        .iter()
        .map(|root| root.as_str().to_owned())
        .collect();

    args.push("-type".to_owned());
    args.push("f".to_owned());

    if let Some(extensions) = request.extensions.extensions() {
        // Grouped so the OR-chain binds tighter than the implicit AND with
        // `-type f`. The tokens are plain arguments; no shell is involved.
        args.push("(".to_owned());
        for (index, ext) in extensions.iter().enumerate() {
            if index > 0 {
                args.push("-o".to_owned());
            }
            args.push("-iname".to_owned());
            args.push(format!("*.{ext}"));
        }
        args.push(")".to_owned());
    }

    args
}

/// Splits buffered output into lines, discarding the single trailing empty
/// line a newline-terminated stream produces. No other trimming.
fn split_lines(stdout: &str) -> Vec<&str> {
    let mut lines: Vec<&str> = stdout.split('\n').collect();
    if lines.last() == Some(&"") {
        lines.pop();
    }
    lines
}

/// Dispatches one metadata lookup (already registered).
fn spawn_stat(coordinator: Coordinator, path: Utf8PathBuf) {
    tokio::spawn(async move {
        if !coordinator.is_settled() {
            stat(&coordinator, path).await;
        }
        coordinator.complete();
    });
}

/// Resolves one reported path to a record, or fails the scan.
async fn stat(coordinator: &Coordinator, path: Utf8PathBuf) {
    match tokio::fs::metadata(&path).await {
        Ok(meta) => {
            // The utility already constrained output to regular files; the
            // directory re-check guards against racing tree mutations.
            if !meta.is_dir() {
                match mtime_millis(&meta) {
                    Ok(modified_ms) => coordinator.push(FileRecord::new(path, modified_ms)),
                    Err(err) => coordinator.fail(FindError::stat(path, err)),
                }
            }
        }
        Err(err) => coordinator.fail(FindError::stat(path, err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scout_core::ExtensionFilter;
    use std::sync::Arc;

    fn request(roots: &[&str], extensions: ExtensionFilter) -> ScanRequest {
        ScanRequest {
            roots: roots.iter().map(|root| Utf8PathBuf::from(*root)).collect(),
            extensions,
            ignore: None,
        }
    }

    #[test]
    fn test_build_args_wildcard() {
        let req = request(&["html", "static"], ExtensionFilter::All);

        assert_eq!(build_args(&req), vec!["html", "static", "-type", "f"]);
    }

    #[test]
    fn test_build_args_single_extension() {
        let extensions = ExtensionFilter::try_from_extensions([".js"]).unwrap();
        let req = request(&["html"], extensions);

        assert_eq!(
            build_args(&req),
            vec!["html", "-type", "f", "(", "-iname", "*.js", ")"]
        );
    }

    #[test]
    fn test_build_args_or_chain() {
        let extensions = ExtensionFilter::try_from_extensions([".js", ".css"]).unwrap();
        let req = request(&["html"], extensions);

        assert_eq!(
            build_args(&req),
            vec![
                "html", "-type", "f", "(", "-iname", "*.js", "-o", "-iname", "*.css", ")"
            ]
        );
    }

    #[test]
    fn test_split_lines_drops_single_trailing_empty() {
        assert_eq!(split_lines("a\nb\n"), vec!["a", "b"]);
        assert_eq!(split_lines("a\nb"), vec!["a", "b"]);
        assert_eq!(split_lines(""), Vec::<&str>::new());
    }

    #[test]
    fn test_split_lines_preserves_interior_empties_and_whitespace() {
        assert_eq!(split_lines("a\n\nb \n"), vec!["a", "", "b "]);
    }

    #[tokio::test]
    async fn test_missing_utility_reports_unavailable() {
        let backend = NativeBackend::with_program("scout-no-such-utility");
        let req = request(&["."], ExtensionFilter::All);

        let err = backend.scan(req).await.unwrap_err();
        assert!(err.is_external_unavailable());
    }

    #[tokio::test]
    async fn test_empty_extension_set_short_circuits() {
        // Would otherwise produce an unparseable empty glob group.
        let backend = NativeBackend::with_program("scout-no-such-utility");
        let extensions = ExtensionFilter::try_from_extensions(Vec::<&str>::new()).unwrap();
        let req = request(&["."], extensions);

        let records = backend.scan(req).await.unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_request_ignore_helper() {
        let mut req = request(&["."], ExtensionFilter::All);
        req.ignore = Some(Arc::new(|path: &camino::Utf8Path| {
            path.as_str().ends_with(".js")
        }));

        assert!(req.is_ignored(camino::Utf8Path::new("foo/b.js")));
        assert!(!req.is_ignored(camino::Utf8Path::new("foo/c.css")));
    }
}
