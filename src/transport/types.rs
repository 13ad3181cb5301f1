//! Request, response and error types exchanged with the HTTP client.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// HTTP method used by a probe attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// Headers only; the cheap first try.
    Head,
    /// Full request; the fallback.
    Get,
}

impl Method {
    /// Upper-case method name as sent on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Head => "HEAD",
            Method::Get => "GET",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(m: Method) -> Self {
        match m {
            Method::Head => reqwest::Method::HEAD,
            Method::Get => reqwest::Method::GET,
        }
    }
}

/// One request handed to the HTTP client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeRequest {
    /// Target URI.
    pub uri: String,
    /// HTTP method.
    pub method: Method,
    /// Timeout covering connection establishment and the response.
    pub timeout: Duration,
    /// Maximum redirects to follow.
    pub max_redirects: usize,
}

/// A response that arrived, whatever its status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeResponse {
    /// HTTP status code of the final response (after redirects).
    pub status_code: u16,
    /// Time from sending the request to receiving the response head.
    pub elapsed: Duration,
}

/// Coarse classification code attached to a transport error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// The connection or the response timed out.
    Timeout,
    /// The host name did not resolve.
    HostNotFound,
    /// Anything else, including TLS failures.
    Other,
}

/// A failed request.
///
/// `reason` is only set for TLS handshakes that failed on a host name mismatch;
/// it lists the certificate's alternative names as `DNS:<name>` entries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{detail}")]
pub struct TransportError {
    /// Classification code.
    pub kind: TransportErrorKind,
    /// For timeouts: whether the connection was never established.
    pub connect: bool,
    /// Mismatch reason for TLS name mismatches.
    pub reason: Option<String>,
    /// Host the failing request was talking to, if known.
    pub host: Option<String>,
    /// Full error text for display.
    pub detail: String,
}

impl TransportError {
    /// A timeout, during connection establishment if `connect` is set.
    pub fn timeout(connect: bool, detail: impl Into<String>) -> Self {
        Self {
            kind: TransportErrorKind::Timeout,
            connect,
            reason: None,
            host: None,
            detail: detail.into(),
        }
    }

    /// A host resolution failure.
    pub fn host_not_found(detail: impl Into<String>) -> Self {
        Self {
            kind: TransportErrorKind::HostNotFound,
            connect: true,
            reason: None,
            host: None,
            detail: detail.into(),
        }
    }

    /// Any other failure.
    pub fn other(detail: impl Into<String>) -> Self {
        Self {
            kind: TransportErrorKind::Other,
            connect: false,
            reason: None,
            host: None,
            detail: detail.into(),
        }
    }

    /// A TLS host name mismatch with its alt-names reason.
    pub fn name_mismatch(
        host: impl Into<String>,
        reason: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            kind: TransportErrorKind::Other,
            connect: true,
            reason: Some(reason.into()),
            host: Some(host.into()),
            detail: detail.into(),
        }
    }
}

/// Result of one HTTP client call.
pub type TransportResult = Result<ProbeResponse, TransportError>;
