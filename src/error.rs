//! Domain error types
//!
//! Application glue uses `anyhow`; these enums cover the failures the
//! form, gateway and backend layers can report to their callers.

use thiserror::Error;

/// Sign-in and session failures
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("email and password are required")]
    MissingCredentials,
    #[error("session storage failed: {0}")]
    Session(#[from] StoreError),
}

/// Failures delivering a submission to the remote sink.
///
/// None of these are fatal: the gateway recovers by queuing locally.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("no submission endpoint configured")]
    NotConfigured,
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("endpoint rejected submission with status {0}")]
    Rejected(u16),
    #[error("endpoint returned an unreadable response: {0}")]
    InvalidResponse(String),
}

/// Schema definition and lookup failures
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("no form registered for sector '{0}'")]
    UnknownSector(String),
    #[error("form '{sector}' has no field named '{field}'")]
    UnknownField { sector: String, field: String },
    #[error("form '{sector}' declares field '{field}' more than once")]
    DuplicateField { sector: String, field: String },
    #[error("field '{field}' in form '{sector}' needs at least one option")]
    MissingOptions { sector: String, field: String },
    #[error("field '{field}' in form '{sector}' does not take options")]
    UnexpectedOptions { sector: String, field: String },
    #[error("form '{0}' has no fields")]
    EmptyForm(String),
    #[error("form '{0}' has no title")]
    MissingTitle(String),
    #[error("dashboard lists sector '{0}' more than once")]
    DuplicateSector(String),
    #[error("invalid schema file: {0}")]
    Parse(String),
}

/// Local persistence failures
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("store encoding failed: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("store entry '{0}' is not a list")]
    Corrupt(String),
}
