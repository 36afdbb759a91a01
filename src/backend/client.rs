//! HTTP client for the remote submission endpoint
//!
//! Submissions are posted as JSON to a single script endpoint. Any non-2xx
//! status, or a body that is not JSON, counts as a failed delivery.

use super::traits::{Ack, SubmissionSink};
use crate::error::DeliveryError;
use crate::gateway::Submission;
use async_trait::async_trait;
use reqwest::{Client, Url};

/// Sink that posts submissions to the configured endpoint
pub struct HttpSink {
    client: Client,
    endpoint: Option<Url>,
}

impl HttpSink {
    pub fn new(endpoint: Option<Url>) -> Self {
        Self {
            client: Client::new(),
            endpoint,
        }
    }
}

#[async_trait]
impl SubmissionSink for HttpSink {
    async fn deliver(&self, submission: &Submission) -> Result<Ack, DeliveryError> {
        let endpoint = self.endpoint.as_ref().ok_or(DeliveryError::NotConfigured)?;

        tracing::debug!("Posting submission {} to {}", submission.id(), endpoint);
        let response = self
            .client
            .post(endpoint.clone())
            .json(submission)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DeliveryError::Rejected(status.as_u16()));
        }

        let body = response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| DeliveryError::InvalidResponse(e.to_string()))?;

        Ok(Ack { body })
    }
}
