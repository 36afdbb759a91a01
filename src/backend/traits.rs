//! Trait abstractions for the external collaborators, enabling mocking in tests

use crate::error::{AuthError, DeliveryError, StoreError};
use crate::gateway::Submission;
use crate::state::{Credentials, Identity};
use async_trait::async_trait;
use tokio::sync::watch;

/// Sign-in provider
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityService: Send + Sync {
    /// Verify credentials and start a session
    async fn sign_in(&self, credentials: &Credentials) -> Result<Identity, AuthError>;

    /// End the current session
    async fn sign_out(&self) -> Result<(), AuthError>;

    /// Identity of the current session, if any
    fn current_identity(&self) -> Option<Identity>;

    /// Notified whenever the session starts or ends
    fn subscribe(&self) -> watch::Receiver<Option<Identity>>;
}

/// Acknowledgement returned by the remote sink
#[derive(Debug, Clone, PartialEq)]
pub struct Ack {
    pub body: serde_json::Value,
}

/// Remote destination for completed submissions
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubmissionSink: Send + Sync {
    /// Single request/response delivery attempt
    async fn deliver(&self, submission: &Submission) -> Result<Ack, DeliveryError>;
}

/// Storage that survives restarts, used for the pending queue
#[cfg_attr(test, mockall::automock)]
pub trait LocalStore: Send + Sync {
    /// Append a value to the list stored under `key`
    fn append(&self, key: &str, value: serde_json::Value) -> Result<(), StoreError>;

    /// Read the value stored under `key`
    fn read(&self, key: &str) -> Result<Option<serde_json::Value>, StoreError>;
}

/// Point-in-time connectivity check
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConnectivityOracle: Send + Sync {
    async fn is_online(&self) -> bool;
}
