//! Settle-all fetch coordination.
//!
//! Every query in a batch is started at once and the batch resolves only
//! when each one has either produced a value or failed. Failures are kept
//! per slot, in input order, so the caller can degrade section by section.

use std::future::Future;

use futures::future::{join_all, BoxFuture};
use futures::FutureExt;

use crate::attrove::ApiError;
use crate::diagnostics::{Diagnostic, DiagnosticSink};

/// A labelled remote operation, issued exactly once by [`settle_all`].
pub struct RemoteQuery<'a, T> {
    label: String,
    op: BoxFuture<'a, Result<T, ApiError>>,
}

impl<'a, T> RemoteQuery<'a, T> {
    pub fn new<F>(label: impl Into<String>, op: F) -> Self
    where
        F: Future<Output = Result<T, ApiError>> + Send + 'a,
    {
        Self {
            label: label.into(),
            op: op.boxed(),
        }
    }
}

/// Terminal result of one query.
#[derive(Debug)]
pub enum SettledOutcome<T> {
    Ok(T),
    Failed(ApiError),
}

impl<T> SettledOutcome<T> {
    pub fn is_ok(&self) -> bool {
        matches!(self, SettledOutcome::Ok(_))
    }

    pub fn is_failed(&self) -> bool {
        !self.is_ok()
    }

    pub fn ok(&self) -> Option<&T> {
        match self {
            SettledOutcome::Ok(value) => Some(value),
            SettledOutcome::Failed(_) => None,
        }
    }
}

impl<T> From<Result<T, ApiError>> for SettledOutcome<T> {
    fn from(result: Result<T, ApiError>) -> Self {
        match result {
            Ok(value) => SettledOutcome::Ok(value),
            Err(err) => SettledOutcome::Failed(err),
        }
    }
}

/// One slot of a settled batch.
#[derive(Debug)]
pub struct Settled<T> {
    pub label: String,
    pub outcome: SettledOutcome<T>,
}

/// All outcomes of a batch, in the order the queries were given.
#[derive(Debug)]
pub struct SettledBatch<T> {
    slots: Vec<Settled<T>>,
}

impl<T> SettledBatch<T> {
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slots(&self) -> &[Settled<T>] {
        &self.slots
    }

    pub fn into_slots(self) -> Vec<Settled<T>> {
        self.slots
    }

    pub fn failure_count(&self) -> usize {
        self.slots.iter().filter(|s| s.outcome.is_failed()).count()
    }

    /// True when there was at least one query and none succeeded.
    pub fn all_failed(&self) -> bool {
        !self.slots.is_empty() && self.failure_count() == self.slots.len()
    }

    /// Emit one `SourceFailed` diagnostic per failed slot, in input order.
    pub fn report_failures(&self, sink: &dyn DiagnosticSink) {
        for slot in &self.slots {
            if let SettledOutcome::Failed(err) = &slot.outcome {
                sink.emit(Diagnostic::SourceFailed {
                    label: slot.label.clone(),
                    reason: err.to_string(),
                });
            }
        }
    }
}

/// Run every query concurrently and wait for all of them to settle.
pub async fn settle_all<'a, T>(queries: Vec<RemoteQuery<'a, T>>) -> SettledBatch<T> {
    let (labels, ops): (Vec<String>, Vec<_>) =
        queries.into_iter().map(|q| (q.label, q.op)).unzip();

    log::debug!("settling {} queries: {}", labels.len(), labels.join(", "));
    let results = join_all(ops).await;

    let slots = labels
        .into_iter()
        .zip(results)
        .map(|(label, result)| Settled {
            label,
            outcome: result.into(),
        })
        .collect();

    SettledBatch { slots }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::MemorySink;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn boom(message: &str) -> ApiError {
        ApiError::Api {
            code: "INTERNAL_ERROR".to_string(),
            message: message.to_string(),
            status: Some(500),
        }
    }

    #[tokio::test]
    async fn test_middle_failure_keeps_order() {
        let batch = settle_all(vec![
            RemoteQuery::new("first", async { Ok(1) }),
            RemoteQuery::new("second", async { Err(boom("down")) }),
            RemoteQuery::new("third", async { Ok(3) }),
        ])
        .await;

        assert_eq!(batch.len(), 3);
        let slots = batch.slots();
        assert!(matches!(slots[0].outcome, SettledOutcome::Ok(1)));
        assert!(slots[1].outcome.is_failed());
        assert!(matches!(slots[2].outcome, SettledOutcome::Ok(3)));
        assert_eq!(batch.failure_count(), 1);
        assert!(!batch.all_failed());
    }

    #[tokio::test]
    async fn test_all_failing_is_total_failure() {
        let batch: SettledBatch<()> = settle_all(vec![
            RemoteQuery::new("a", async { Err(boom("1")) }),
            RemoteQuery::new("b", async { Err(boom("2")) }),
            RemoteQuery::new("c", async { Err(boom("3")) }),
        ])
        .await;

        assert_eq!(batch.len(), 3);
        assert!(batch.all_failed());
    }

    #[tokio::test]
    async fn test_empty_batch_is_not_total_failure() {
        let batch: SettledBatch<()> = settle_all(Vec::new()).await;
        assert!(batch.is_empty());
        assert!(!batch.all_failed());
    }

    #[tokio::test]
    async fn test_output_order_ignores_completion_order() {
        let batch = settle_all(vec![
            RemoteQuery::new("slow", async {
                tokio::time::sleep(Duration::from_millis(40)).await;
                Ok("slow")
            }),
            RemoteQuery::new("fast", async { Ok("fast") }),
        ])
        .await;

        let labels: Vec<&str> = batch.slots().iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["slow", "fast"]);
        assert!(matches!(batch.slots()[0].outcome, SettledOutcome::Ok("slow")));
    }

    #[tokio::test]
    async fn test_every_query_runs_despite_early_failure() {
        let started = AtomicUsize::new(0);
        let batch = settle_all(vec![
            RemoteQuery::new("fails", async {
                started.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(boom("nope"))
            }),
            RemoteQuery::new("later", async {
                tokio::time::sleep(Duration::from_millis(10)).await;
                started.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }),
        ])
        .await;

        assert_eq!(started.load(Ordering::SeqCst), 2);
        assert_eq!(batch.failure_count(), 1);
    }

    #[tokio::test]
    async fn test_report_failures_names_label_and_reason() {
        let sink = MemorySink::new();
        let batch = settle_all(vec![
            RemoteQuery::new("fetch calendar events", async { Err::<(), _>(boom("Server exploded")) }),
            RemoteQuery::new("search recent threads", async { Ok(()) }),
        ])
        .await;

        batch.report_failures(&sink);
        assert_eq!(
            sink.entries(),
            vec![Diagnostic::SourceFailed {
                label: "fetch calendar events".to_string(),
                reason: "Server exploded".to_string(),
            }]
        );
    }
}
