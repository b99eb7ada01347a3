//! Fan-out/fan-in completion tracking for one scan.
//!
//! Both backends dispatch many independent asynchronous sub-operations
//! (directory reads, metadata lookups) and need to know when all of them have
//! finished. The [`Coordinator`] owns the shared state for one scan: an
//! outstanding-operation counter, the append-only result accumulator, and a
//! one-shot terminal channel that delivers exactly one outcome, success or
//! failure, never both.
//!
//! # Protocol
//!
//! - [`register`](Coordinator::register) before dispatching a sub-operation.
//! - [`push`](Coordinator::push) zero or one records from inside it.
//! - [`complete`](Coordinator::complete) exactly once when it finishes,
//!   success or failure. When the count returns to zero the accumulated
//!   records are delivered.
//! - [`fail`](Coordinator::fail) on a fatal error. The first failure wins;
//!   everything completing afterwards is a no-op for delivery.
//!
//! The invariant that prevents a premature "all done": a handler registers
//! every sub-operation it spawns *before* its own `complete` call, so the
//! counter can never be observed at zero mid-dispatch.
//!
//! Sub-operations run on real runtime threads, so the counter and accumulator
//! live behind one mutex rather than relying on cooperative scheduling.

use std::mem;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::oneshot;

use scout_core::FileRecord;

use crate::error::FindError;

type Outcome = Result<Vec<FileRecord>, FindError>;

/// Shared fan-in state for one scan.
///
/// Cheap to clone; every clone refers to the same scan. Created in pairs with
/// a [`Completion`] via [`Coordinator::new`].
#[derive(Clone)]
pub(crate) struct Coordinator {
    inner: Arc<Mutex<Inner>>,
}

/// The receiving half: awaits the scan's single terminal outcome.
pub(crate) struct Completion {
    rx: oneshot::Receiver<Outcome>,
}

struct Inner {
    /// In-flight sub-operations. Zero means the scan is finished.
    outstanding: usize,

    /// Records accumulated in discovery order.
    records: Vec<FileRecord>,

    /// Terminal sender; `None` once the outcome has been delivered.
    terminal: Option<oneshot::Sender<Outcome>>,
}

impl Coordinator {
    /// Creates the shared state and its completion handle for one scan.
    pub(crate) fn new() -> (Self, Completion) {
        let (tx, rx) = oneshot::channel();
        let inner = Inner {
            outstanding: 0,
            records: Vec::new(),
            terminal: Some(tx),
        };
        (
            Self {
                inner: Arc::new(Mutex::new(inner)),
            },
            Completion { rx },
        )
    }

    /// Registers one sub-operation as outstanding.
    ///
    /// Must be called before the operation is dispatched, and in particular
    /// before the completion handler that spawns it calls its own
    /// [`complete`](Self::complete).
    pub(crate) fn register(&self) {
        self.inner.lock().outstanding += 1;
    }

    /// Appends a record to the accumulator.
    ///
    /// No-op once the scan has settled (a failure was already delivered).
    pub(crate) fn push(&self, record: FileRecord) {
        let mut inner = self.inner.lock();
        if inner.terminal.is_some() {
            inner.records.push(record);
        }
    }

    /// Marks one sub-operation finished.
    ///
    /// When the outstanding count returns to zero, the accumulated records
    /// are delivered, unless a failure already settled the scan.
    pub(crate) fn complete(&self) {
        let mut inner = self.inner.lock();
        inner.outstanding = inner.outstanding.saturating_sub(1);
        if inner.outstanding == 0 {
            if let Some(tx) = inner.terminal.take() {
                let records = mem::take(&mut inner.records);
                // Receiver dropped means the caller went away; nothing to do.
                let _ = tx.send(Ok(records));
            }
        }
    }

    /// Delivers the scan's failure.
    ///
    /// Only the first failure is delivered; later calls (and later
    /// completions) are no-ops for delivery.
    pub(crate) fn fail(&self, error: FindError) {
        let mut inner = self.inner.lock();
        if let Some(tx) = inner.terminal.take() {
            let _ = tx.send(Err(error));
        }
    }

    /// Returns `true` once a terminal outcome has been delivered.
    ///
    /// Handlers use this to avoid fanning out further work for a scan that
    /// has already failed.
    pub(crate) fn is_settled(&self) -> bool {
        self.inner.lock().terminal.is_none()
    }
}

impl Completion {
    /// Waits for the scan's single terminal outcome.
    pub(crate) async fn wait(self) -> Outcome {
        self.rx.await.unwrap_or(Err(FindError::Aborted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;

    fn record(path: &str) -> FileRecord {
        FileRecord::new(Utf8PathBuf::from(path), 0)
    }

    #[tokio::test]
    async fn test_delivers_once_outstanding_reaches_zero() {
        let (coordinator, completion) = Coordinator::new();

        coordinator.register();
        coordinator.register();
        coordinator.push(record("a"));
        coordinator.complete();
        coordinator.push(record("b"));
        coordinator.complete();

        let records = completion.wait().await.unwrap();
        assert_eq!(records.len(), 2);
    }

    #[tokio::test]
    async fn test_no_premature_delivery_mid_dispatch() {
        let (coordinator, completion) = Coordinator::new();

        // Parent registers its child before its own complete, so the counter
        // never touches zero in between.
        coordinator.register();
        coordinator.register();
        coordinator.complete();
        assert!(!coordinator.is_settled());

        coordinator.push(record("child"));
        coordinator.complete();

        let records = completion.wait().await.unwrap();
        assert_eq!(records.len(), 1);
    }

    #[tokio::test]
    async fn test_first_failure_wins() {
        let (coordinator, completion) = Coordinator::new();

        coordinator.register();
        coordinator.register();
        coordinator.fail(FindError::Aborted);
        assert!(coordinator.is_settled());

        // Late completions and pushes must not resurrect the scan.
        coordinator.push(record("late"));
        coordinator.complete();
        coordinator.complete();

        let outcome = completion.wait().await;
        assert!(matches!(outcome, Err(FindError::Aborted)));
    }

    #[tokio::test]
    async fn test_second_failure_is_ignored() {
        let (coordinator, completion) = Coordinator::new();

        coordinator.register();
        coordinator.fail(FindError::Aborted);
        coordinator.fail(FindError::NonUtf8Output);
        coordinator.complete();

        let outcome = completion.wait().await;
        assert!(matches!(outcome, Err(FindError::Aborted)));
    }

    #[tokio::test]
    async fn test_records_arrive_in_push_order() {
        let (coordinator, completion) = Coordinator::new();

        coordinator.register();
        coordinator.push(record("first"));
        coordinator.push(record("second"));
        coordinator.complete();

        let records = completion.wait().await.unwrap();
        assert_eq!(records[0].path.as_str(), "first");
        assert_eq!(records[1].path.as_str(), "second");
    }

    #[tokio::test]
    async fn test_dropped_coordinator_reports_aborted() {
        let (coordinator, completion) = Coordinator::new();
        drop(coordinator);

        let outcome = completion.wait().await;
        assert!(matches!(outcome, Err(FindError::Aborted)));
    }
}
