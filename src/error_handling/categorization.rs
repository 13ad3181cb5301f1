//! Outcome classification.
//!
//! Maps one raw HTTP client result onto exactly one `Outcome`. Retry decisions are
//! not made here; a non-200 response is still a `Success` carrying its status.

use url::Url;

use crate::mismatch::strip_trailing_dot;
use crate::probe::{Attempt, Outcome};
use crate::transport::{TransportError, TransportErrorKind, TransportResult};

/// Classifies the result of `attempt`.
///
/// # Arguments
///
/// * `attempt` - The attempt the result belongs to (supplies the requested URI)
/// * `result` - What the HTTP client returned
pub fn classify(attempt: &Attempt, result: TransportResult) -> Outcome {
    match result {
        Ok(response) => Outcome::Success {
            status_code: response.status_code,
            elapsed: response.elapsed,
        },
        Err(error) => classify_error(attempt, error),
    }
}

fn classify_error(attempt: &Attempt, error: TransportError) -> Outcome {
    match error.kind {
        TransportErrorKind::Timeout if error.connect => Outcome::ConnectTimeout,
        TransportErrorKind::Timeout => Outcome::ReadTimeout,
        TransportErrorKind::HostNotFound => Outcome::DnsNotFound,
        TransportErrorKind::Other => match error.reason.filter(|r| !r.trim().is_empty()) {
            Some(reason) => {
                let hostname = error
                    .host
                    .or_else(|| host_of(attempt.uri()))
                    .unwrap_or_default();
                Outcome::TlsMismatch {
                    hostname: strip_trailing_dot(&hostname).to_string(),
                    reason,
                    requested_uri: attempt.uri().to_string(),
                }
            }
            None => Outcome::Unclassified {
                detail: error.detail,
            },
        },
    }
}

fn host_of(uri: &str) -> Option<String> {
    Url::parse(uri)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
}
