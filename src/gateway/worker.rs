//! Background worker that runs gateway submits off the UI loop
//!
//! Submissions are processed one at a time in the order they were sent, so
//! queue appends keep submit order and never interleave.

use super::{Submission, SubmissionGateway, SubmissionOutcome};
use crate::error::StoreError;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use uuid::Uuid;

/// Completion of one submit, delivered back to the UI loop
#[derive(Debug)]
pub struct SubmissionReport {
    pub submission_id: Uuid,
    pub sector: String,
    pub result: Result<SubmissionOutcome, StoreError>,
}

/// UI-side handle to the submission worker
pub struct SubmissionChannel {
    sender: Option<mpsc::UnboundedSender<Submission>>,
    reports: mpsc::UnboundedReceiver<SubmissionReport>,
    worker: Option<JoinHandle<()>>,
}

impl SubmissionChannel {
    /// Spawn the worker on the current tokio runtime
    pub fn spawn(gateway: Arc<SubmissionGateway>) -> Self {
        let (sender, mut inbox) = mpsc::unbounded_channel::<Submission>();
        let (report_tx, reports) = mpsc::unbounded_channel();

        let worker = tokio::spawn(async move {
            while let Some(submission) = inbox.recv().await {
                let submission_id = submission.id();
                let sector = submission.sector().to_string();
                let result = gateway.submit(submission).await;
                let report = SubmissionReport {
                    submission_id,
                    sector,
                    result,
                };
                if report_tx.send(report).is_err() {
                    tracing::debug!("Report receiver dropped, stopping submission worker");
                    break;
                }
            }
        });

        Self {
            sender: Some(sender),
            reports,
            worker: Some(worker),
        }
    }

    /// Hand a submission to the worker. Gives it back if the worker is gone.
    pub fn send(&self, submission: Submission) -> Result<(), Submission> {
        match &self.sender {
            Some(sender) => sender.send(submission).map_err(|e| e.0),
            None => Err(submission),
        }
    }

    /// Stop accepting submissions and wait until the worker has delivered or
    /// queued everything already sent. Reports stay readable afterwards.
    pub async fn shutdown(&mut self) {
        self.sender.take();
        if let Some(worker) = self.worker.take() {
            if let Err(e) = worker.await {
                tracing::error!("Submission worker ended abnormally: {e}");
            }
        }
    }

    /// Next finished report, without waiting
    pub fn try_next_report(&mut self) -> Option<SubmissionReport> {
        self.reports.try_recv().ok()
    }

    /// Wait for the next finished report
    #[cfg(test)]
    pub async fn next_report(&mut self) -> Option<SubmissionReport> {
        self.reports.recv().await
    }
}
