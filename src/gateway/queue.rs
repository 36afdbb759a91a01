//! Pending queue of submissions awaiting sync

use super::Submission;
use crate::backend::LocalStore;
use crate::error::StoreError;
use serde_json::Value;
use std::sync::Arc;

/// Local store key holding the queue
pub const PENDING_QUEUE_KEY: &str = "offlineForms";

/// Append-only view of the submissions that could not be delivered.
///
/// Entries are only ever added here; an external sync process removes them.
#[derive(Clone)]
pub struct PendingQueue {
    store: Arc<dyn LocalStore>,
}

impl PendingQueue {
    pub fn new(store: Arc<dyn LocalStore>) -> Self {
        Self { store }
    }

    pub fn append(&self, submission: &Submission) -> Result<(), StoreError> {
        let value = serde_json::to_value(submission)?;
        self.store.append(PENDING_QUEUE_KEY, value)
    }

    /// Queued submissions, oldest first
    pub fn entries(&self) -> Result<Vec<Submission>, StoreError> {
        match self.store.read(PENDING_QUEUE_KEY)? {
            None => Ok(Vec::new()),
            Some(Value::Array(items)) => items
                .into_iter()
                .map(|item| serde_json::from_value(item).map_err(StoreError::from))
                .collect(),
            Some(_) => Err(StoreError::Corrupt(PENDING_QUEUE_KEY.to_string())),
        }
    }

    /// Number of queued entries, counted without decoding them
    pub fn len(&self) -> Result<usize, StoreError> {
        match self.store.read(PENDING_QUEUE_KEY)? {
            None => Ok(0),
            Some(Value::Array(items)) => Ok(items.len()),
            Some(_) => Err(StoreError::Corrupt(PENDING_QUEUE_KEY.to_string())),
        }
    }
}
