//! Operation data model
//!
//! An operation is an opaque, caller-prepared payload carrying just enough
//! metadata for the coordinator to reason about identity and expiration.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Originating account identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(String);

impl AccountId {
    /// Create a new account identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque confirmation identifier returned by the network on acceptance
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConfirmationId(String);

impl ConfirmationId {
    /// Create a new confirmation identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ConfirmationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Horizon beyond which an unconfirmed operation is no longer valid
///
/// Expressed either as a ledger height or as a Unix timestamp (seconds),
/// matching the two deadline forms ledgers commonly enforce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpirationBound {
    /// Expires once the ledger height reaches this value
    Height(u64),

    /// Expires once network time (Unix seconds) reaches this value
    Time(u64),
}

impl ExpirationBound {
    /// Check whether the bound has elapsed
    pub fn is_expired(&self, current_time: u64, current_height: u64) -> bool {
        match self {
            ExpirationBound::Height(h) => current_height >= *h,
            ExpirationBound::Time(t) => current_time >= *t,
        }
    }

    /// Compute a fresh bound of the same kind, `offset` ahead of now
    pub fn refreshed(&self, current_time: u64, current_height: u64, offset: u64) -> Self {
        match self {
            ExpirationBound::Height(_) => ExpirationBound::Height(current_height + offset),
            ExpirationBound::Time(_) => ExpirationBound::Time(current_time + offset),
        }
    }
}

impl std::fmt::Display for ExpirationBound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExpirationBound::Height(h) => write!(f, "height {}", h),
            ExpirationBound::Time(t) => write!(f, "time {}", t),
        }
    }
}

/// The network-wide at-most-once key of an operation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OperationIdentity {
    /// Originating account
    pub account: AccountId,

    /// Per-account sequence number
    pub sequence: u32,
}

impl std::fmt::Display for OperationIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.account, self.sequence)
    }
}

/// A prepared, signed operation ready for submission
///
/// The payload is never interpreted by the coordinator; it is handed to the
/// [`LedgerClient`](crate::LedgerClient) as-is. Sequence number and expiration
/// bound must be assigned by the caller before submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Operation {
    /// Originating account
    pub account: AccountId,

    /// Per-account sequence number (assigned by the caller)
    pub sequence: u32,

    /// Expiration bound for this operation
    pub expiration: ExpirationBound,

    /// Fee bid in the ledger's smallest unit
    pub fee: u64,

    /// Opaque signed payload
    pub payload: Vec<u8>,
}

impl Operation {
    /// Create a new operation
    ///
    /// Returns [`Error::InvalidOperation`] if the payload is empty or the
    /// sequence number is zero (ledgers start per-account sequences at 1).
    pub fn new(
        account: AccountId,
        sequence: u32,
        expiration: ExpirationBound,
        fee: u64,
        payload: Vec<u8>,
    ) -> Result<Self> {
        if payload.is_empty() {
            return Err(Error::InvalidOperation(
                "operation payload must not be empty".to_string(),
            ));
        }
        if sequence == 0 {
            return Err(Error::InvalidOperation(
                "operation sequence number must be non-zero".to_string(),
            ));
        }

        Ok(Self {
            account,
            sequence,
            expiration,
            fee,
            payload,
        })
    }

    /// Get the (account, sequence) identity of this operation
    pub fn identity(&self) -> OperationIdentity {
        OperationIdentity {
            account: self.account.clone(),
            sequence: self.sequence,
        }
    }

    /// Check whether the expiration bound has elapsed
    pub fn is_expired(&self, current_time: u64, current_height: u64) -> bool {
        self.expiration.is_expired(current_time, current_height)
    }

    /// Replace the expiration bound with a fresh one, `offset` ahead of now
    pub fn refresh_expiration(&mut self, current_time: u64, current_height: u64, offset: u64) {
        self.expiration = self
            .expiration
            .refreshed(current_time, current_height, offset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_operation(expiration: ExpirationBound) -> Operation {
        Operation::new(
            AccountId::new("acct-1"),
            7,
            expiration,
            1000,
            vec![0xde, 0xad],
        )
        .unwrap()
    }

    #[test]
    fn test_height_bound_expiry() {
        let bound = ExpirationBound::Height(100);

        assert!(!bound.is_expired(0, 99));
        assert!(bound.is_expired(0, 100));
        assert!(bound.is_expired(0, 150));
    }

    #[test]
    fn test_time_bound_expiry() {
        let bound = ExpirationBound::Time(5000);

        assert!(!bound.is_expired(4999, 0));
        assert!(bound.is_expired(5000, 0));
    }

    #[test]
    fn test_refresh_preserves_bound_kind() {
        let height = ExpirationBound::Height(10).refreshed(9999, 200, 100);
        assert_eq!(height, ExpirationBound::Height(300));

        let time = ExpirationBound::Time(10).refreshed(9999, 200, 60);
        assert_eq!(time, ExpirationBound::Time(10059));
    }

    #[test]
    fn test_empty_payload_rejected() {
        let result = Operation::new(
            AccountId::new("acct-1"),
            1,
            ExpirationBound::Height(100),
            1000,
            vec![],
        );
        assert!(matches!(result, Err(Error::InvalidOperation(_))));
    }

    #[test]
    fn test_zero_sequence_rejected() {
        let result = Operation::new(
            AccountId::new("acct-1"),
            0,
            ExpirationBound::Height(100),
            1000,
            vec![0xab],
        );
        assert!(matches!(result, Err(Error::InvalidOperation(_))));
    }

    #[test]
    fn test_identity() {
        let op = test_operation(ExpirationBound::Height(100));
        let identity = op.identity();

        assert_eq!(identity.account.as_str(), "acct-1");
        assert_eq!(identity.sequence, 7);
        assert_eq!(identity.to_string(), "acct-1#7");
    }

    #[test]
    fn test_refresh_expiration() {
        let mut op = test_operation(ExpirationBound::Height(100));
        assert!(op.is_expired(0, 120));

        op.refresh_expiration(0, 120, 100);
        assert_eq!(op.expiration, ExpirationBound::Height(220));
        assert!(!op.is_expired(0, 120));
    }
}
