//! Submission outcomes and attempt records
//!
//! Every call to the coordinator resolves to exactly one terminal [`Outcome`],
//! with an [`AttemptRecord`] for each network round trip made along the way.

use crate::client::RejectReason;
use crate::operation::{ConfirmationId, OperationIdentity};
use serde::{Deserialize, Serialize};

/// Why a submission ended without a definitive result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndeterminateReason {
    /// All attempts were used without observing a definitive signal
    AttemptsExhausted,

    /// The expiration bound was reached while awaiting finality
    ExpirationReached,
}

/// Terminal classification of an operation's fate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Deterministically applied
    Confirmed {
        /// Confirmation identifier, if the network reported one
        confirmation: Option<ConfirmationId>,

        /// Network result code, if observed via polling
        result_code: Option<String>,
    },

    /// Deterministically not applied
    Rejected {
        /// Reason code, surfaced verbatim
        reason: RejectReason,
    },

    /// Neither confirmed nor rejected; the caller must query authoritative
    /// state before re-acting, since the operation may or may not have applied
    Indeterminate {
        /// Why no definitive signal was observed
        reason: IndeterminateReason,
    },
}

impl Outcome {
    /// Check whether the operation was confirmed
    pub fn is_confirmed(&self) -> bool {
        matches!(self, Outcome::Confirmed { .. })
    }

    /// Check whether the operation was rejected
    pub fn is_rejected(&self) -> bool {
        matches!(self, Outcome::Rejected { .. })
    }

    /// Check whether the outcome is indeterminate
    pub fn is_indeterminate(&self) -> bool {
        matches!(self, Outcome::Indeterminate { .. })
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Confirmed { .. } => write!(f, "Confirmed"),
            Outcome::Rejected { reason } => write!(f, "Rejected ({})", reason.code),
            Outcome::Indeterminate { reason } => write!(f, "Indeterminate ({:?})", reason),
        }
    }
}

/// How a single submission attempt resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttemptClassification {
    /// Transport-level failure; no response from the network
    TransportFailed,

    /// Deterministic rejection on submission
    Rejected,

    /// Rejected because the expiration bound had already passed
    ExpiredOnArrival,

    /// Same-identity operation already applied (duplicate signal)
    DuplicateApplied,

    /// Accepted and later observed applied successfully
    Confirmed,

    /// Accepted and later observed applied with a failure code
    AppliedFailed,

    /// Accepted but no definitive signal before the attempt timeout
    Inconclusive,

    /// Accepted but the expiration bound was reached while polling
    ExpirationReached,
}

/// Record of one try to place the operation onto the network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptRecord {
    /// 1-based attempt index
    pub index: u32,

    /// Attempt start timestamp (Unix milliseconds)
    pub started_at_ms: u64,

    /// How the attempt resolved
    pub classification: AttemptClassification,

    /// Confirmation identifier, if the network returned one
    pub confirmation: Option<ConfirmationId>,
}

/// Full account of a submission: terminal outcome plus the attempt trail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReport {
    /// Identity of the submitted operation
    pub identity: OperationIdentity,

    /// Terminal outcome
    pub outcome: Outcome,

    /// One record per submission attempt, in order
    pub attempts: Vec<AttemptRecord>,

    /// Submission start timestamp (Unix milliseconds)
    pub started_at_ms: u64,

    /// Submission finish timestamp (Unix milliseconds)
    pub finished_at_ms: u64,
}

impl SubmissionReport {
    /// Number of submission attempts performed
    pub fn attempt_count(&self) -> usize {
        self.attempts.len()
    }

    /// Total wall-clock time spent (milliseconds)
    pub fn total_time_ms(&self) -> u64 {
        self.finished_at_ms.saturating_sub(self.started_at_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::RejectionKind;
    use crate::operation::AccountId;

    fn report(outcome: Outcome) -> SubmissionReport {
        SubmissionReport {
            identity: OperationIdentity {
                account: AccountId::new("acct-1"),
                sequence: 1,
            },
            outcome,
            attempts: vec![AttemptRecord {
                index: 1,
                started_at_ms: 1000,
                classification: AttemptClassification::TransportFailed,
                confirmation: None,
            }],
            started_at_ms: 1000,
            finished_at_ms: 3500,
        }
    }

    #[test]
    fn test_outcome_predicates() {
        let confirmed = Outcome::Confirmed {
            confirmation: None,
            result_code: None,
        };
        assert!(confirmed.is_confirmed());
        assert!(!confirmed.is_rejected());

        let rejected = Outcome::Rejected {
            reason: RejectReason::new("insufficient-resources", RejectionKind::InsufficientResources),
        };
        assert!(rejected.is_rejected());

        let indeterminate = Outcome::Indeterminate {
            reason: IndeterminateReason::AttemptsExhausted,
        };
        assert!(indeterminate.is_indeterminate());
        assert!(!indeterminate.is_confirmed());
    }

    #[test]
    fn test_outcome_display_carries_reason_code() {
        let rejected = Outcome::Rejected {
            reason: RejectReason::new("bad-auth", RejectionKind::Unauthorized),
        };
        assert_eq!(rejected.to_string(), "Rejected (bad-auth)");
    }

    #[test]
    fn test_report_timing() {
        let report = report(Outcome::Indeterminate {
            reason: IndeterminateReason::AttemptsExhausted,
        });

        assert_eq!(report.attempt_count(), 1);
        assert_eq!(report.total_time_ms(), 2500);
    }
}
