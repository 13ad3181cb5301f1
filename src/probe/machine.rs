//! Transition rules of a probe run.
//!
//! `Machine` decides the next state from the current attempt's outcome (or from a
//! mismatch resolution). It performs no I/O; `Prober::run` drives it.

use log::{info, warn};

use super::types::{Attempt, Outcome, Verdict};
use crate::config::MAX_ATTEMPTS;
use crate::error_handling::ErrorType;
use crate::mismatch::Resolution;

/// A certificate name mismatch waiting for the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PendingMismatch {
    pub(crate) hostname: String,
    pub(crate) reason: String,
    /// The attempt that failed; its URI is the one to correct.
    pub(crate) attempt: Attempt,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum State {
    Attempting(Attempt),
    Resolving(PendingMismatch),
    Terminal(Verdict),
}

#[derive(Debug)]
pub(crate) struct Machine {
    recovery_enabled: bool,
    issued: usize,
    fix_used: bool,
}

impl Machine {
    pub(crate) fn new(recovery_enabled: bool) -> Self {
        Self {
            recovery_enabled,
            issued: 0,
            fix_used: false,
        }
    }

    /// Counts an attempt handed to the HTTP client.
    pub(crate) fn record_issue(&mut self) {
        self.issued += 1;
    }

    pub(crate) fn issued(&self) -> usize {
        self.issued
    }

    /// Whether a mismatch would be sent to the resolver right now.
    ///
    /// Only one resolved mismatch is honoured per run.
    pub(crate) fn can_resolve(&self) -> bool {
        self.recovery_enabled && !self.fix_used
    }

    fn budget_left(&self) -> bool {
        self.issued < MAX_ATTEMPTS
    }

    pub(crate) fn after_outcome(&mut self, attempt: &Attempt, outcome: &Outcome) -> State {
        match outcome {
            Outcome::Success {
                status_code: 200,
                elapsed,
            } => State::Terminal(Verdict::Alive {
                status_code: 200,
                elapsed: *elapsed,
            }),
            Outcome::Success {
                status_code,
                elapsed,
            } => {
                if attempt.retry_allowed() && self.budget_left() {
                    info!("{} returned {status_code}, retrying with GET", attempt.method());
                    State::Attempting(attempt.get_fallback())
                } else {
                    State::Terminal(Verdict::NonStandardStatus {
                        status_code: *status_code,
                        elapsed: *elapsed,
                    })
                }
            }
            Outcome::ConnectTimeout => self.fallback(attempt, ErrorType::ConnectTimeout),
            Outcome::ReadTimeout => self.fallback(attempt, ErrorType::ReadTimeout),
            Outcome::DnsNotFound => self.fallback(attempt, ErrorType::DnsNotFound),
            Outcome::TlsMismatch {
                hostname, reason, ..
            } => {
                if self.can_resolve() {
                    State::Resolving(PendingMismatch {
                        hostname: hostname.clone(),
                        reason: reason.clone(),
                        attempt: attempt.clone(),
                    })
                } else {
                    self.fallback(attempt, ErrorType::TlsMismatch)
                }
            }
            Outcome::Unclassified { .. } => {
                State::Terminal(Verdict::Failed(ErrorType::UnclassifiedError))
            }
        }
    }

    pub(crate) fn after_resolution(
        &mut self,
        pending: PendingMismatch,
        resolution: Resolution,
    ) -> State {
        match resolution {
            Resolution::Corrected(uri) if self.budget_left() => {
                self.fix_used = true;
                // A fresh cycle, unless this HEAD is the last request allowed
                let retry_allowed = self.issued + 1 < MAX_ATTEMPTS;
                State::Attempting(Attempt::head(uri, retry_allowed))
            }
            Resolution::Corrected(uri) => {
                warn!("Mismatch resolved to {uri} but no attempts are left");
                State::Terminal(Verdict::Failed(ErrorType::TlsMismatch))
            }
            Resolution::NoFix => self.fallback(&pending.attempt, ErrorType::TlsMismatch),
        }
    }

    /// GET retry if the attempt allows one and the budget has room; terminal failure otherwise.
    fn fallback(&self, attempt: &Attempt, failure: ErrorType) -> State {
        if attempt.retry_allowed() && self.budget_left() {
            info!("{} failed ({failure}), retrying with GET", attempt.method());
            State::Attempting(attempt.get_fallback())
        } else {
            State::Terminal(Verdict::Failed(failure))
        }
    }
}
