//! Values produced and consumed by a probe run.

use std::time::Duration;

use crate::config::ProbeConfig;
use crate::error_handling::ErrorType;
use crate::transport::{Method, ProbeRequest};

/// One request try. Immutable: a retry is a new `Attempt`, never a modified one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    uri: String,
    method: Method,
    retry_allowed: bool,
}

impl Attempt {
    /// The first attempt of every run: HEAD with a retry available.
    pub fn initial(uri: impl Into<String>) -> Self {
        Self::head(uri, true)
    }

    pub(crate) fn head(uri: impl Into<String>, retry_allowed: bool) -> Self {
        Self {
            uri: uri.into(),
            method: Method::Head,
            retry_allowed,
        }
    }

    /// The GET fallback for this attempt; it never allows a further retry.
    pub(crate) fn get_fallback(&self) -> Self {
        Self {
            uri: self.uri.clone(),
            method: Method::Get,
            retry_allowed: false,
        }
    }

    /// Target URI.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// HTTP method.
    pub fn method(&self) -> Method {
        self.method
    }

    /// Whether a failure of this attempt may be followed by another one.
    pub fn retry_allowed(&self) -> bool {
        self.retry_allowed
    }

    /// The request the HTTP client executes for this attempt.
    pub fn request(&self, config: &ProbeConfig) -> ProbeRequest {
        ProbeRequest {
            uri: self.uri.clone(),
            method: self.method,
            timeout: config.timeout(),
            max_redirects: config.max_redirects(),
        }
    }
}

/// Classified result of one attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A response arrived; any status code.
    Success {
        /// Final status code.
        status_code: u16,
        /// Request round-trip time.
        elapsed: Duration,
    },
    /// Timed out establishing the connection.
    ConnectTimeout,
    /// Timed out waiting for the response.
    ReadTimeout,
    /// Host name did not resolve.
    DnsNotFound,
    /// Certificate does not cover the host name.
    TlsMismatch {
        /// Host the handshake was made for, without trailing dot.
        hostname: String,
        /// Reason listing the certificate's `DNS:` names.
        reason: String,
        /// URI of the failed attempt.
        requested_uri: String,
    },
    /// Anything else.
    Unclassified {
        /// Error text for display.
        detail: String,
    },
}

impl Outcome {
    /// Failure class of this outcome; `None` for a 200 response.
    pub fn error_type(&self) -> Option<ErrorType> {
        match self {
            Outcome::Success {
                status_code: 200, ..
            } => None,
            Outcome::Success { .. } => Some(ErrorType::NonStandardStatus),
            Outcome::ConnectTimeout => Some(ErrorType::ConnectTimeout),
            Outcome::ReadTimeout => Some(ErrorType::ReadTimeout),
            Outcome::DnsNotFound => Some(ErrorType::DnsNotFound),
            Outcome::TlsMismatch { .. } => Some(ErrorType::TlsMismatch),
            Outcome::Unclassified { .. } => Some(ErrorType::UnclassifiedError),
        }
    }
}

/// Final state of a probe run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Answered with 200.
    Alive {
        /// Always 200.
        status_code: u16,
        /// Round-trip time of the successful attempt.
        elapsed: Duration,
    },
    /// Answered, but not with 200, and no retry was left.
    NonStandardStatus {
        /// Status of the last attempt.
        status_code: u16,
        /// Round-trip time of the last attempt.
        elapsed: Duration,
    },
    /// Unreachable: the last attempt failed with no retry left.
    Failed(ErrorType),
}

impl Verdict {
    /// Process exit code for this verdict: 1 for failures, 0 otherwise.
    pub fn exit_code(&self) -> i32 {
        match self {
            Verdict::Failed(_) => 1,
            Verdict::Alive { .. } | Verdict::NonStandardStatus { .. } => 0,
        }
    }
}

/// An attempt together with its outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptRecord {
    /// The attempt as issued.
    pub attempt: Attempt,
    /// Its classified outcome.
    pub outcome: Outcome,
}

/// Everything a probe run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeReport {
    /// Final verdict.
    pub verdict: Verdict,
    /// Attempts in the order they were issued.
    pub attempts: Vec<AttemptRecord>,
    /// URI adopted after a resolved certificate name mismatch, if any.
    pub mismatch_fix: Option<String>,
}

impl ProbeReport {
    /// Process exit code for this run.
    pub fn exit_code(&self) -> i32 {
        self.verdict.exit_code()
    }

    /// Number of HTTP requests issued.
    pub fn request_count(&self) -> usize {
        self.attempts.len()
    }
}
