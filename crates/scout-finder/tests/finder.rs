//! End-to-end scans over real temporary trees.
//!
//! Result order is unspecified, so every assertion treats the result set as
//! a multiset (sorted before comparison).

use std::fs;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use parking_lot::Mutex;
use tempfile::TempDir;

use scout_core::{record::system_time_millis, BackendKind, ExtensionFilter, FileRecord, FindConfig};
use scout_finder::{find_in_process, find_native, FindError, Finder, SubstringIgnore};

/// Builds the reference tree:
///
/// ```text
/// root/
/// ├── a.txt
/// ├── foo/
/// │   ├── b.js
/// │   └── c.css
/// └── link -> a.txt        (unix only)
/// ```
fn build_tree() -> (TempDir, Utf8PathBuf) {
    let dir = TempDir::new().expect("failed to create temp directory");
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("non-UTF-8 temp path");

    fs::write(root.join("a.txt"), "a").expect("write a.txt");
    fs::create_dir(root.join("foo")).expect("mkdir foo");
    fs::write(root.join("foo/b.js"), "b").expect("write b.js");
    fs::write(root.join("foo/c.css"), "c").expect("write c.css");

    #[cfg(unix)]
    std::os::unix::fs::symlink(root.join("a.txt"), root.join("link")).expect("create symlink");

    (dir, root)
}

/// File names of the records, sorted for multiset comparison.
fn sorted_names(records: &[FileRecord]) -> Vec<String> {
    let mut names: Vec<String> = records
        .iter()
        .map(|r| r.path.file_name().unwrap_or_default().to_owned())
        .collect();
    names.sort();
    names
}

/// Records sorted by path, for whole-multiset equality checks.
fn sorted_records(mut records: Vec<FileRecord>) -> Vec<FileRecord> {
    records.sort_by(|a, b| a.path.cmp(&b.path));
    records
}

fn extensions(exts: &[&str]) -> ExtensionFilter {
    ExtensionFilter::try_from_extensions(exts).expect("valid extensions")
}

#[tokio::test]
async fn single_extension_yields_one_record() {
    let (_dir, root) = build_tree();

    let records = Finder::new([root.clone()])
        .with_extensions(extensions(&[".js"]))
        .find()
        .await
        .expect("scan failed");

    assert_eq!(sorted_names(&records), vec!["b.js"]);
    assert_eq!(records[0].path, root.join("foo/b.js"));

    let meta = fs::metadata(&records[0].path).expect("stat b.js");
    let expected = system_time_millis(meta.modified().expect("mtime"));
    assert_eq!(records[0].modified_ms, expected);
}

#[tokio::test]
async fn multiple_extensions_yield_both_records() {
    let (_dir, root) = build_tree();

    let records = Finder::new([root])
        .with_extensions(extensions(&[".js", ".css"]))
        .find()
        .await
        .expect("scan failed");

    assert_eq!(sorted_names(&records), vec!["b.js", "c.css"]);
}

#[tokio::test]
async fn wildcard_lists_every_regular_file() {
    let (_dir, root) = build_tree();

    let records = Finder::new([root]).find().await.expect("scan failed");

    assert_eq!(sorted_names(&records), vec!["a.txt", "b.js", "c.css"]);
}

#[cfg(unix)]
#[tokio::test]
async fn symlinks_never_appear_in_results() {
    let (_dir, root) = build_tree();

    let records = Finder::new([root]).find().await.expect("scan failed");

    assert!(records.iter().all(|r| r.path.file_name() != Some("link")));
}

#[tokio::test]
async fn ignore_all_matching_paths_yields_empty() {
    let (_dir, root) = build_tree();

    let records = Finder::new([root])
        .with_extensions(extensions(&[".js"]))
        .with_ignore(|path: &Utf8Path| path.as_str().ends_with(".js"))
        .find()
        .await
        .expect("scan failed");

    assert!(records.is_empty());
}

#[tokio::test]
async fn ignored_directory_is_never_descended() {
    let (_dir, root) = build_tree();

    // Record every candidate the predicate is asked about; children of an
    // ignored directory must never show up, proving no I/O was issued below it.
    let seen: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let observed = Arc::clone(&seen);

    let records = Finder::new([root])
        .with_ignore(move |path: &Utf8Path| {
            observed.lock().push(path.as_str().to_owned());
            path.as_str().ends_with("/foo")
        })
        .find()
        .await
        .expect("scan failed");

    assert_eq!(sorted_names(&records), vec!["a.txt"]);

    let seen = seen.lock();
    assert!(seen.iter().any(|p| p.ends_with("/foo")));
    assert!(!seen.iter().any(|p| p.ends_with("b.js") || p.ends_with("c.css")));
}

#[tokio::test]
async fn nonexistent_root_fails_the_scan() {
    let (_dir, root) = build_tree();

    let err = Finder::new([root.join("does-not-exist")])
        .find()
        .await
        .expect_err("scan must fail");

    assert!(matches!(err, FindError::ReadDir { .. }));
}

#[tokio::test]
async fn scans_are_idempotent_over_a_static_tree() {
    let (_dir, root) = build_tree();
    let finder = Finder::new([root]).with_extensions(extensions(&[".js", ".css"]));

    let first = finder.find().await.expect("first scan failed");
    let second = finder.find().await.expect("second scan failed");

    assert_eq!(sorted_records(first), sorted_records(second));
}

#[tokio::test]
async fn multiple_roots_are_all_scanned() {
    let (_dir_a, root_a) = build_tree();
    let (_dir_b, root_b) = build_tree();

    let records = Finder::new([root_a, root_b])
        .with_extensions(extensions(&[".js"]))
        .find()
        .await
        .expect("scan failed");

    assert_eq!(sorted_names(&records), vec!["b.js", "b.js"]);
}

#[tokio::test]
async fn empty_directory_yields_empty_result() {
    let dir = TempDir::new().expect("failed to create temp directory");
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("non-UTF-8 temp path");

    let records = Finder::new([root]).find().await.expect("scan failed");

    assert!(records.is_empty());
}

#[tokio::test]
async fn substring_ignore_rule_excludes_subtrees() {
    let (_dir, root) = build_tree();

    let records = Finder::new([root])
        .with_ignore(SubstringIgnore::new(["foo"]))
        .find()
        .await
        .expect("scan failed");

    assert_eq!(sorted_names(&records), vec!["a.txt"]);
}

// The external backend requires find(1); these are unix-only.
#[cfg(unix)]
mod native {
    use super::*;

    #[tokio::test]
    async fn backends_agree_on_the_wildcard_multiset() {
        let (_dir, root) = build_tree();
        let config = FindConfig::new([root]);

        let walked = find_in_process(config.clone()).await.expect("walk failed");
        let delegated = find_native(config).await.expect("native scan failed");

        assert_eq!(sorted_records(walked), sorted_records(delegated));
    }

    #[tokio::test]
    async fn backends_agree_on_a_filtered_multiset() {
        let (_dir, root) = build_tree();
        let config = FindConfig {
            extensions: extensions(&[".js", ".css"]),
            ..FindConfig::new([root])
        };

        let walked = find_in_process(config.clone()).await.expect("walk failed");
        let delegated = find_native(config).await.expect("native scan failed");

        assert_eq!(sorted_records(walked.clone()), sorted_records(delegated));
        assert_eq!(walked.len(), 2);
    }

    #[tokio::test]
    async fn native_backend_excludes_symlinks() {
        let (_dir, root) = build_tree();

        let records = Finder::new([root])
            .with_backend(BackendKind::Native)
            .find()
            .await
            .expect("scan failed");

        assert!(records.iter().all(|r| r.path.file_name() != Some("link")));
    }

    #[tokio::test]
    async fn native_backend_fails_on_nonexistent_root() {
        let (_dir, root) = build_tree();

        let err = Finder::new([root.join("does-not-exist")])
            .with_backend(BackendKind::Native)
            .find()
            .await
            .expect_err("scan must fail");

        assert!(matches!(err, FindError::External { .. }));
    }

    #[tokio::test]
    async fn native_backend_applies_the_ignore_rule() {
        let (_dir, root) = build_tree();

        let records = Finder::new([root])
            .with_extensions(extensions(&[".js"]))
            .with_backend(BackendKind::Native)
            .with_ignore(|path: &Utf8Path| path.as_str().ends_with(".js"))
            .find()
            .await
            .expect("scan failed");

        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn extension_matching_is_case_insensitive_in_both_backends() {
        let dir = TempDir::new().expect("failed to create temp directory");
        let root =
            Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("non-UTF-8 temp path");
        fs::write(root.join("UPPER.JS"), "x").expect("write UPPER.JS");

        let config = FindConfig {
            extensions: extensions(&[".js"]),
            ..FindConfig::new([root])
        };

        let walked = find_in_process(config.clone()).await.expect("walk failed");
        let delegated = find_native(config).await.expect("native scan failed");

        assert_eq!(sorted_records(walked.clone()), sorted_records(delegated));
        assert_eq!(sorted_names(&walked), vec!["UPPER.JS"]);
    }
}
