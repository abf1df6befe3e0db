//! Error types for the submission coordinator

use thiserror::Error;

/// Coordinator error type
///
/// Only configuration errors escape [`submit`](crate::SubmissionCoordinator::submit)
/// as `Err`; everything the network does is folded into a terminal
/// [`Outcome`](crate::Outcome) instead.
#[derive(Error, Debug)]
pub enum Error {
    /// Expiration bound already elapsed when `submit` was called
    #[error("expiration bound already elapsed before submission: {0}")]
    ExpiredBeforeSubmission(String),

    /// Operation failed local validation
    #[error("invalid operation: {0}")]
    InvalidOperation(String),
}

/// Transport-level failure talking to the ledger client
///
/// Always retryable: a transport error carries no information about whether
/// the operation was applied, so the coordinator re-submits while attempts
/// remain and relies on the network's duplicate detection.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("transport error: {message}")]
pub struct TransportError {
    /// Human-readable description of the failure
    pub message: String,
}

impl TransportError {
    /// Create a new transport error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
