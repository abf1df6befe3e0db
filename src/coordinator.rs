//! Submission coordinator
//!
//! Drives a prepared operation through submission, finality polling, and
//! bounded retries until it resolves to a terminal outcome.
//!
//! Retries are safe because the network applies a given (account, sequence)
//! identity at most once: a re-submission of an already-applied operation
//! comes back as a duplicate signal, which the coordinator short-circuits to
//! `Confirmed`. The whole design rests on that property.

use crate::client::{ConfirmationStatus, LedgerClient, PreflightVerdict, RejectionKind, SubmitAck};
use crate::operation::{ConfirmationId, Operation};
use crate::report::{
    AttemptClassification, AttemptRecord, IndeterminateReason, Outcome, SubmissionReport,
};
use crate::{Error, RejectReason, Result};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Coordinator configuration
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// Maximum number of submission attempts
    pub max_attempts: u32,

    /// How long to await a definitive signal per attempt before concluding
    /// the attempt is inconclusive and eligible for retry
    pub attempt_timeout: Duration,

    /// Interval between finality polls
    pub poll_interval: Duration,

    /// When an operation arrives expired at the network, push its bound this
    /// far ahead of the current height/time and retry; `None` disables
    /// refresh, so an expired-on-arrival rejection ends the submission
    pub refresh_offset: Option<u64>,

    /// Dry-run the operation against current state before the first attempt
    pub preflight: bool,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            attempt_timeout: Duration::from_secs(15),
            poll_interval: Duration::from_secs(1),
            refresh_offset: Some(100),
            preflight: false,
        }
    }
}

/// How one finality-polling phase resolved
enum PollVerdict {
    /// Network reported a definitive application result
    Applied(crate::client::AppliedResult),

    /// Attempt timeout elapsed without a definitive signal
    TimedOut,

    /// Operation's expiration bound was reached while polling
    ExpirationReached,
}

/// Submission coordinator
///
/// Stateless across invocations: each [`submit`](Self::submit) call is an
/// independent attempt loop over a caller-supplied [`LedgerClient`]. Callers
/// running multiple operations for the same account must serialize sequence
/// assignment themselves; the coordinator never fabricates sequence numbers.
pub struct SubmissionCoordinator {
    /// Configuration
    config: CoordinatorConfig,

    /// Current time provider, Unix milliseconds (for testing)
    current_time_fn: Box<dyn Fn() -> u64 + Send + Sync>,

    /// Current ledger height provider (for testing; callers wire a real one)
    current_height_fn: Box<dyn Fn() -> u64 + Send + Sync>,
}

impl SubmissionCoordinator {
    /// Create a new coordinator
    pub fn new(config: CoordinatorConfig) -> Self {
        Self {
            config,
            current_time_fn: Box::new(|| {
                std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .unwrap()
                    .as_millis() as u64
            }),
            current_height_fn: Box::new(|| 0),
        }
    }

    /// Set the current time function (for testing)
    pub fn with_time_fn<F>(mut self, f: F) -> Self
    where
        F: Fn() -> u64 + Send + Sync + 'static,
    {
        self.current_time_fn = Box::new(f);
        self
    }

    /// Set the current ledger height function
    pub fn with_height_fn<F>(mut self, f: F) -> Self
    where
        F: Fn() -> u64 + Send + Sync + 'static,
    {
        self.current_height_fn = Box::new(f);
        self
    }

    fn now_ms(&self) -> u64 {
        (self.current_time_fn)()
    }

    fn now_secs(&self) -> u64 {
        (self.current_time_fn)() / 1000
    }

    fn height(&self) -> u64 {
        (self.current_height_fn)()
    }

    /// Submit an operation and drive it to a terminal outcome
    ///
    /// The operation must carry a valid sequence number and an expiration
    /// bound strictly ahead of the current height/time; an already-elapsed
    /// bound is a configuration error raised before any network call.
    ///
    /// Every call resolves to exactly one of `Confirmed`, `Rejected`, or
    /// `Indeterminate`. An `Indeterminate` outcome means the operation may or
    /// may not have applied; the caller must query authoritative state before
    /// re-acting, and must not blindly re-submit.
    pub async fn submit<C>(&self, mut operation: Operation, client: &C) -> Result<SubmissionReport>
    where
        C: LedgerClient + ?Sized,
    {
        let started_at_ms = self.now_ms();

        if operation.is_expired(started_at_ms / 1000, self.height()) {
            return Err(Error::ExpiredBeforeSubmission(format!(
                "bound {} is not ahead of time {} / height {}",
                operation.expiration,
                started_at_ms / 1000,
                self.height()
            )));
        }

        let identity = operation.identity();
        info!("Submitting operation {}", identity);

        let mut attempts: Vec<AttemptRecord> = Vec::new();

        if self.config.preflight {
            match client.preflight(&operation).await {
                Ok(PreflightVerdict::WouldReject { reason }) => {
                    warn!("Operation {} failed preflight: {}", identity, reason);
                    return Ok(self.finish(
                        identity,
                        Outcome::Rejected { reason },
                        attempts,
                        started_at_ms,
                    ));
                }
                Ok(PreflightVerdict::Pass) => debug!("Operation {} passed preflight", identity),
                // Preflight is advisory; a flaky dry-run never blocks submission
                Err(e) => debug!("Preflight for {} hit transport error: {}", identity, e),
            }
        }

        let mut outcome = Outcome::Indeterminate {
            reason: IndeterminateReason::AttemptsExhausted,
        };

        for index in 1..=self.config.max_attempts {
            let attempt_started_ms = self.now_ms();

            if operation.is_expired(attempt_started_ms / 1000, self.height()) {
                outcome = Outcome::Indeterminate {
                    reason: IndeterminateReason::ExpirationReached,
                };
                break;
            }

            debug!(
                "Attempt {}/{} for operation {}",
                index, self.config.max_attempts, identity
            );

            match client.submit(&operation).await {
                Err(e) => {
                    // No response carries no information about application;
                    // retry while attempts remain
                    warn!("Attempt {} for {} failed in transport: {}", index, identity, e);
                    attempts.push(AttemptRecord {
                        index,
                        started_at_ms: attempt_started_ms,
                        classification: AttemptClassification::TransportFailed,
                        confirmation: None,
                    });
                }
                Ok(SubmitAck::AlreadyApplied { confirmation }) => {
                    // The effect already landed, likely via an earlier attempt
                    // the network processed after we timed out
                    debug!("Operation {} already applied", identity);
                    attempts.push(AttemptRecord {
                        index,
                        started_at_ms: attempt_started_ms,
                        classification: AttemptClassification::DuplicateApplied,
                        confirmation: confirmation.clone(),
                    });
                    outcome = Outcome::Confirmed {
                        confirmation,
                        result_code: None,
                    };
                    break;
                }
                Ok(SubmitAck::Rejected { reason }) if reason.kind == RejectionKind::Expired => {
                    attempts.push(AttemptRecord {
                        index,
                        started_at_ms: attempt_started_ms,
                        classification: AttemptClassification::ExpiredOnArrival,
                        confirmation: None,
                    });

                    match self.config.refresh_offset {
                        Some(offset) if index < self.config.max_attempts => {
                            operation.refresh_expiration(self.now_secs(), self.height(), offset);
                            debug!(
                                "Refreshed expiration of {} to {}",
                                identity, operation.expiration
                            );
                        }
                        _ => {
                            outcome = Outcome::Indeterminate {
                                reason: IndeterminateReason::ExpirationReached,
                            };
                            break;
                        }
                    }
                }
                Ok(SubmitAck::Rejected { reason }) => {
                    // Deterministic: retrying cannot change the result
                    warn!("Operation {} rejected: {}", identity, reason);
                    attempts.push(AttemptRecord {
                        index,
                        started_at_ms: attempt_started_ms,
                        classification: AttemptClassification::Rejected,
                        confirmation: None,
                    });
                    outcome = Outcome::Rejected { reason };
                    break;
                }
                Ok(SubmitAck::Accepted { confirmation }) => {
                    debug!("Operation {} accepted as {}", identity, confirmation);

                    match self.poll_for_finality(client, &confirmation, &operation).await {
                        PollVerdict::Applied(result) => {
                            let classification = if result.success {
                                AttemptClassification::Confirmed
                            } else {
                                AttemptClassification::AppliedFailed
                            };
                            attempts.push(AttemptRecord {
                                index,
                                started_at_ms: attempt_started_ms,
                                classification,
                                confirmation: Some(confirmation.clone()),
                            });
                            outcome = if result.success {
                                Outcome::Confirmed {
                                    confirmation: Some(confirmation),
                                    result_code: Some(result.code),
                                }
                            } else {
                                // Applied with a failure code is as final as a
                                // rejection at submission
                                Outcome::Rejected {
                                    reason: RejectReason::new(result.code, RejectionKind::Other),
                                }
                            };
                            break;
                        }
                        PollVerdict::TimedOut => {
                            debug!(
                                "Attempt {} for {} inconclusive after {:?}",
                                index, identity, self.config.attempt_timeout
                            );
                            attempts.push(AttemptRecord {
                                index,
                                started_at_ms: attempt_started_ms,
                                classification: AttemptClassification::Inconclusive,
                                confirmation: Some(confirmation),
                            });
                        }
                        PollVerdict::ExpirationReached => {
                            attempts.push(AttemptRecord {
                                index,
                                started_at_ms: attempt_started_ms,
                                classification: AttemptClassification::ExpirationReached,
                                confirmation: Some(confirmation),
                            });
                            outcome = Outcome::Indeterminate {
                                reason: IndeterminateReason::ExpirationReached,
                            };
                            break;
                        }
                    }
                }
            }
        }

        Ok(self.finish(identity, outcome, attempts, started_at_ms))
    }

    /// Poll the network for a confirmation's finality status
    ///
    /// Ends at the first definitive result, the attempt timeout, or the
    /// operation's expiration bound, whichever comes first. Transport errors
    /// while polling are inconclusive and do not end the phase.
    async fn poll_for_finality<C>(
        &self,
        client: &C,
        confirmation: &ConfirmationId,
        operation: &Operation,
    ) -> PollVerdict
    where
        C: LedgerClient + ?Sized,
    {
        let deadline = tokio::time::Instant::now() + self.config.attempt_timeout;

        loop {
            if operation.is_expired(self.now_secs(), self.height()) {
                return PollVerdict::ExpirationReached;
            }
            if tokio::time::Instant::now() >= deadline {
                return PollVerdict::TimedOut;
            }

            match client.query_status(confirmation).await {
                Ok(ConfirmationStatus::Applied { result }) => {
                    return PollVerdict::Applied(result);
                }
                Ok(ConfirmationStatus::Pending) | Ok(ConfirmationStatus::NotFound) => {}
                Err(e) => {
                    debug!("Status poll for {} hit transport error: {}", confirmation, e);
                }
            }

            tokio::time::sleep(self.config.poll_interval).await;
        }
    }

    fn finish(
        &self,
        identity: crate::OperationIdentity,
        outcome: Outcome,
        attempts: Vec<AttemptRecord>,
        started_at_ms: u64,
    ) -> SubmissionReport {
        match &outcome {
            Outcome::Confirmed { .. } => {
                info!("Operation {} confirmed after {} attempt(s)", identity, attempts.len())
            }
            Outcome::Rejected { reason } => {
                warn!("Operation {} rejected: {}", identity, reason)
            }
            Outcome::Indeterminate { reason } => warn!(
                "Operation {} indeterminate ({:?}); reconcile state before re-acting",
                identity, reason
            ),
        }

        SubmissionReport {
            identity,
            outcome,
            attempts,
            started_at_ms,
            finished_at_ms: self.now_ms(),
        }
    }
}
