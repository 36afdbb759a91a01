//! Store-and-forward submission gateway
//!
//! A submission gets exactly one delivery attempt. If the device is offline
//! or the attempt fails, the full snapshot is appended to the pending queue.
//! Nothing here drains that queue; a separate sync process owns it.

mod queue;
mod worker;

pub use queue::{PendingQueue, PENDING_QUEUE_KEY};
pub use worker::{SubmissionChannel, SubmissionReport};

use crate::backend::{ConnectivityOracle, SubmissionSink};
use crate::error::StoreError;
use crate::state::{AnswerSet, Identity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// A completed form, frozen at submit time.
///
/// Fields are private so a submission cannot change after creation; a
/// queued entry is byte-for-byte what the sink would have received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    id: Uuid,
    sector: String,
    #[serde(rename = "formData")]
    answers: AnswerSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    submitted_by: Option<String>,
    #[serde(rename = "timestamp")]
    submitted_at: DateTime<Utc>,
}

impl Submission {
    pub fn new(sector: &str, answers: AnswerSet, submitted_by: Option<&Identity>) -> Self {
        Self {
            id: Uuid::new_v4(),
            sector: sector.to_string(),
            answers,
            submitted_by: submitted_by.map(|i| i.uid.clone()),
            submitted_at: Utc::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn sector(&self) -> &str {
        &self.sector
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    pub fn submitted_by(&self) -> Option<&str> {
        self.submitted_by.as_deref()
    }

    pub fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }
}

/// Why a submission ended up in the pending queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueReason {
    Offline,
    DeliveryFailed(String),
}

/// Result of a submit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Delivered,
    Queued(QueueReason),
}

pub struct SubmissionGateway {
    sink: Arc<dyn SubmissionSink>,
    connectivity: Arc<dyn ConnectivityOracle>,
    queue: PendingQueue,
}

impl SubmissionGateway {
    pub fn new(
        sink: Arc<dyn SubmissionSink>,
        connectivity: Arc<dyn ConnectivityOracle>,
        queue: PendingQueue,
    ) -> Self {
        Self {
            sink,
            connectivity,
            queue,
        }
    }

    pub fn queue(&self) -> &PendingQueue {
        &self.queue
    }

    /// Deliver once, or preserve the submission locally.
    ///
    /// Errors only when the local append fails, i.e. the submission could
    /// not be preserved at all.
    pub async fn submit(&self, submission: Submission) -> Result<SubmissionOutcome, StoreError> {
        let reason = if !self.connectivity.is_online().await {
            tracing::info!("Offline, queuing submission {}", submission.id);
            QueueReason::Offline
        } else {
            match self.sink.deliver(&submission).await {
                Ok(ack) => {
                    tracing::info!(
                        "Delivered submission {} for sector {} by {} ({})",
                        submission.id,
                        submission.sector,
                        submission.submitted_by().unwrap_or("anonymous"),
                        ack.body
                    );
                    return Ok(SubmissionOutcome::Delivered);
                }
                Err(e) => {
                    tracing::warn!("Delivery of submission {} failed: {e}", submission.id);
                    QueueReason::DeliveryFailed(e.to_string())
                }
            }
        };

        // File I/O stays off the async worker threads
        let queue = self.queue.clone();
        let snapshot = submission.clone();
        tokio::task::spawn_blocking(move || queue.append(&snapshot))
            .await
            .map_err(|e| StoreError::Io(std::io::Error::other(e)))
            .and_then(|appended| appended)
            .map_err(|e| {
                tracing::error!("Could not queue submission {}: {e}", submission.id);
                e
            })?;
        Ok(SubmissionOutcome::Queued(reason))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{
        Ack, FileStore, MockConnectivityOracle, MockLocalStore, MockSubmissionSink,
    };
    use crate::error::DeliveryError;
    use crate::state::{FieldEdit, FormSchemaRegistry};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tokio_test::{assert_err, assert_ok};

    fn connectivity(online: bool) -> Arc<MockConnectivityOracle> {
        let mut oracle = MockConnectivityOracle::new();
        oracle.expect_is_online().return_const(online);
        Arc::new(oracle)
    }

    fn failing_sink() -> Arc<MockSubmissionSink> {
        let mut sink = MockSubmissionSink::new();
        sink.expect_deliver()
            .times(1)
            .returning(|_| Err(DeliveryError::Rejected(502)));
        Arc::new(sink)
    }

    fn unused_sink() -> Arc<MockSubmissionSink> {
        let mut sink = MockSubmissionSink::new();
        sink.expect_deliver().never();
        Arc::new(sink)
    }

    fn gbv_submission() -> Submission {
        let registry = FormSchemaRegistry::builtin();
        let form = registry.lookup("gbv").unwrap();
        let mut answers = AnswerSet::new();
        answers.apply(
            form.field("incidentType").unwrap(),
            FieldEdit::Input("Sexual".to_string()),
        );
        let referral = form.field("referral").unwrap();
        answers.apply(referral, FieldEdit::Toggle("Medical".to_string()));
        answers.apply(referral, FieldEdit::Toggle("Legal".to_string()));
        Submission::new("gbv", answers, None)
    }

    #[tokio::test]
    async fn test_offline_submission_is_queued_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let queue = PendingQueue::new(Arc::new(FileStore::new(dir.path())));
        let gateway = SubmissionGateway::new(unused_sink(), connectivity(false), queue.clone());

        let submission = gbv_submission();
        let outcome = assert_ok!(gateway.submit(submission.clone()).await);

        assert_eq!(outcome, SubmissionOutcome::Queued(QueueReason::Offline));
        assert_eq!(queue.entries().unwrap(), vec![submission]);
    }

    #[tokio::test]
    async fn test_offline_gbv_entry_shape() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FileStore::new(dir.path()));
        let gateway = SubmissionGateway::new(
            unused_sink(),
            connectivity(false),
            PendingQueue::new(store.clone()),
        );
        gateway.submit(gbv_submission()).await.unwrap();

        let raw = crate::backend::LocalStore::read(store.as_ref(), PENDING_QUEUE_KEY)
            .unwrap()
            .unwrap();
        let entry = &raw[0];
        assert_eq!(entry["sector"], json!("gbv"));
        assert_eq!(
            entry["formData"],
            json!({"incidentType": "Sexual", "referral": ["Legal", "Medical"]})
        );
        assert!(entry["timestamp"].is_string());
        assert!(entry.get("submittedBy").is_none());
    }

    #[tokio::test]
    async fn test_failed_delivery_is_queued() {
        let dir = tempfile::tempdir().unwrap();
        let queue = PendingQueue::new(Arc::new(FileStore::new(dir.path())));
        let gateway = SubmissionGateway::new(failing_sink(), connectivity(true), queue.clone());

        let submission = gbv_submission();
        let outcome = gateway.submit(submission.clone()).await.unwrap();

        assert!(matches!(
            outcome,
            SubmissionOutcome::Queued(QueueReason::DeliveryFailed(ref msg)) if msg.contains("502")
        ));
        assert_eq!(queue.entries().unwrap(), vec![submission]);
    }

    #[tokio::test]
    async fn test_successful_delivery_leaves_queue_alone() {
        let dir = tempfile::tempdir().unwrap();
        let queue = PendingQueue::new(Arc::new(FileStore::new(dir.path())));
        let mut sink = MockSubmissionSink::new();
        sink.expect_deliver()
            .times(1)
            .returning(|_| Ok(Ack { body: json!({"result": "success"}) }));
        let gateway = SubmissionGateway::new(Arc::new(sink), connectivity(true), queue.clone());

        let outcome = gateway.submit(gbv_submission()).await.unwrap();

        assert_eq!(outcome, SubmissionOutcome::Delivered);
        assert_eq!(queue.len().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_queue_grows_in_submit_order() {
        let dir = tempfile::tempdir().unwrap();
        let queue = PendingQueue::new(Arc::new(FileStore::new(dir.path())));
        let gateway = SubmissionGateway::new(unused_sink(), connectivity(false), queue.clone());

        let first = gbv_submission();
        let second = Submission::new("health", AnswerSet::new(), None);
        gateway.submit(first.clone()).await.unwrap();
        gateway.submit(second.clone()).await.unwrap();

        assert_eq!(queue.entries().unwrap(), vec![first, second]);
    }

    #[tokio::test]
    async fn test_store_failure_is_reported() {
        let mut store = MockLocalStore::new();
        store.expect_append().returning(|_, _| {
            Err(StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "disk full",
            )))
        });
        let gateway = SubmissionGateway::new(
            unused_sink(),
            connectivity(false),
            PendingQueue::new(Arc::new(store)),
        );

        let result = gateway.submit(gbv_submission()).await;
        assert_err!(result);
    }

    #[tokio::test]
    async fn test_queue_append_runs_on_blocking_thread() {
        let runtime_thread = std::thread::current().id();
        let mut store = MockLocalStore::new();
        store.expect_append().times(1).returning(move |_, _| {
            assert_ne!(std::thread::current().id(), runtime_thread);
            Ok(())
        });
        let gateway = SubmissionGateway::new(
            unused_sink(),
            connectivity(false),
            PendingQueue::new(Arc::new(store)),
        );

        let outcome = assert_ok!(gateway.submit(gbv_submission()).await);
        assert_eq!(outcome, SubmissionOutcome::Queued(QueueReason::Offline));
    }

    #[test]
    fn test_submission_records_submitter_uid() {
        let identity = Identity {
            uid: "uid-7".to_string(),
            email: "officer@example.org".to_string(),
        };
        let submission = Submission::new("wash", AnswerSet::new(), Some(&identity));
        assert_eq!(submission.submitted_by(), Some("uid-7"));
        assert_eq!(submission.sector(), "wash");
        assert!(submission.answers().is_empty());
        assert!(submission.submitted_at() <= Utc::now());
    }
}
