//! The unit of result produced by a scan.
//!
//! A [`FileRecord`] pairs a matched path with its last-modification time in
//! milliseconds since the Unix epoch. Records are immutable once produced and
//! are appended to a scan's result set in discovery order, which is backend-
//! and filesystem-dependent and deliberately unspecified.

use std::time::{SystemTime, UNIX_EPOCH};

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

/// A matched file: its path and last-modification timestamp.
///
/// The path is relative or absolute exactly as constructed from the scanned
/// root plus traversal; no cross-backend normalization is guaranteed.
///
/// # Examples
///
/// ```
/// use scout_core::FileRecord;
/// use camino::Utf8PathBuf;
///
/// let record = FileRecord::new(Utf8PathBuf::from("src/main.rs"), 1_700_000_000_000);
/// assert_eq!(record.path.as_str(), "src/main.rs");
/// assert_eq!(record.modified_ms, 1_700_000_000_000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileRecord {
    /// Path of the matched file.
    pub path: Utf8PathBuf,

    /// Last-modification time in milliseconds since the Unix epoch.
    ///
    /// Negative for files with a pre-epoch modification time.
    pub modified_ms: i64,
}

impl FileRecord {
    /// Creates a new record from a path and a millisecond timestamp.
    #[inline]
    #[must_use]
    pub const fn new(path: Utf8PathBuf, modified_ms: i64) -> Self {
        Self { path, modified_ms }
    }
}

/// Extracts the modification time of `meta` as milliseconds since the epoch.
///
/// Pre-epoch timestamps are returned as negative values rather than an error,
/// so files with unusual mtimes still produce records.
///
/// # Errors
///
/// Returns an error if the platform does not report modification times.
pub fn mtime_millis(meta: &std::fs::Metadata) -> std::io::Result<i64> {
    let modified = meta.modified()?;
    Ok(system_time_millis(modified))
}

/// Converts a [`SystemTime`] to signed milliseconds since the epoch.
#[must_use]
pub fn system_time_millis(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(after) => i64::try_from(after.as_millis()).unwrap_or(i64::MAX),
        Err(before) => {
            let ms = i64::try_from(before.duration().as_millis()).unwrap_or(i64::MAX);
            -ms
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_record_equality() {
        let a = FileRecord::new(Utf8PathBuf::from("a.txt"), 42);
        let b = FileRecord::new(Utf8PathBuf::from("a.txt"), 42);
        let c = FileRecord::new(Utf8PathBuf::from("a.txt"), 43);

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_record_serde_roundtrip() {
        let record = FileRecord::new(Utf8PathBuf::from("foo/b.js"), 1_700_000_000_000);
        let json = serde_json::to_string(&record).unwrap();
        let parsed: FileRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, parsed);
    }

    #[test]
    fn test_system_time_millis_epoch() {
        assert_eq!(system_time_millis(UNIX_EPOCH), 0);
    }

    #[test]
    fn test_system_time_millis_after_epoch() {
        let time = UNIX_EPOCH + Duration::from_millis(1_500);
        assert_eq!(system_time_millis(time), 1_500);
    }

    #[test]
    fn test_system_time_millis_before_epoch() {
        let time = UNIX_EPOCH - Duration::from_millis(2_000);
        assert_eq!(system_time_millis(time), -2_000);
    }
}
