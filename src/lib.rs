//! # Ledger Submission Coordinator
//!
//! Coordinator that reliably submits a prepared, signed operation to an
//! eventually-finalized ledger and resolves it to a definitive outcome
//! despite network flakiness and finality delay.
//!
//! This crate provides:
//! - A narrow [`LedgerClient`] trait the caller implements over their SDK
//! - Structured classification of submission responses (no string matching)
//! - A bounded retry loop with per-attempt polling for finality
//! - Idempotent retries backed by the network's duplicate detection
//! - Expiration-bound handling with optional deadline refresh
//!
//! The coordinator never fabricates sequence numbers and never interprets the
//! operation payload; sequence assignment and fee selection stay with the
//! caller.

#![warn(missing_docs, rust_2018_idioms)]
#![forbid(unsafe_code)]

mod client;
mod coordinator;
mod error;
mod operation;
mod report;

pub use client::{
    AppliedResult, ConfirmationStatus, LedgerClient, PreflightVerdict, RejectReason,
    RejectionKind, SubmitAck,
};
pub use coordinator::{CoordinatorConfig, SubmissionCoordinator};
pub use error::{Error, Result, TransportError};
pub use operation::{AccountId, ConfirmationId, ExpirationBound, Operation, OperationIdentity};
pub use report::{
    AttemptClassification, AttemptRecord, IndeterminateReason, Outcome, SubmissionReport,
};
