//! Ledger client interface
//!
//! The narrow seam between the coordinator and whatever SDK actually talks to
//! the network. The client is injected per call so tests can script exact
//! response sequences.
//!
//! Classification is data-driven: the client maps its SDK's responses into
//! [`SubmitAck`] / [`ConfirmationStatus`] variants once, and the coordinator
//! never inspects error message strings.

use crate::error::TransportError;
use crate::operation::{ConfirmationId, Operation};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Why the network deterministically rejected an operation
///
/// The kind drives retry policy; the raw code is surfaced verbatim to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectionKind {
    /// Operation is structurally invalid
    Malformed,

    /// Signature or permission check failed
    Unauthorized,

    /// Fee or balance requirements not met
    InsufficientResources,

    /// Expiration bound already passed relative to network time
    Expired,

    /// Any other deterministic rejection
    Other,
}

/// Deterministic rejection with the network's reason code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectReason {
    /// Network reason code, surfaced verbatim
    pub code: String,

    /// Structured classification of the code
    pub kind: RejectionKind,
}

impl RejectReason {
    /// Create a new rejection reason
    pub fn new(code: impl Into<String>, kind: RejectionKind) -> Self {
        Self {
            code: code.into(),
            kind,
        }
    }
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({:?})", self.code, self.kind)
    }
}

/// Immediate response to a submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitAck {
    /// Network accepted the operation; poll for finality
    Accepted {
        /// Identifier to poll status with
        confirmation: ConfirmationId,
    },

    /// An operation with the same (account, sequence) identity has already
    /// been applied; the effect has landed
    AlreadyApplied {
        /// Confirmation identifier of the applied operation, if known
        confirmation: Option<ConfirmationId>,
    },

    /// Network deterministically rejected the operation
    Rejected {
        /// Reason for the rejection
        reason: RejectReason,
    },
}

/// Final application result reported by the network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedResult {
    /// Network result code
    pub code: String,

    /// Whether the operation's effect was applied successfully
    pub success: bool,
}

/// Status of a confirmation identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationStatus {
    /// Not yet finalized
    Pending,

    /// Finalized with a definitive result
    Applied {
        /// The application result
        result: AppliedResult,
    },

    /// Unknown to the network (not yet seen, or dropped)
    NotFound,
}

/// Result of a dry-run preflight check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreflightVerdict {
    /// The operation would be accepted as of the current state
    Pass,

    /// The operation would be deterministically rejected
    WouldReject {
        /// Reason the network would reject it
        reason: RejectReason,
    },
}

/// Client for submitting operations to a ledger and querying their status
///
/// Implementations wrap a concrete SDK; all methods may fail with a
/// [`TransportError`], which the coordinator treats as retryable.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Submit a signed operation to the network
    async fn submit(&self, operation: &Operation) -> Result<SubmitAck, TransportError>;

    /// Query the finality status of a previously accepted submission
    async fn query_status(
        &self,
        confirmation: &ConfirmationId,
    ) -> Result<ConfirmationStatus, TransportError>;

    /// Dry-run the operation against current state without applying it
    ///
    /// Default implementation passes unconditionally, for ledgers without a
    /// simulation facility.
    async fn preflight(&self, operation: &Operation) -> Result<PreflightVerdict, TransportError> {
        let _ = operation;
        Ok(PreflightVerdict::Pass)
    }
}
