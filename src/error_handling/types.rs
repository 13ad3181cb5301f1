//! Error type definitions.
//!
//! This module defines the probe failure taxonomy and the process-level error types.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for configuration failures.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No target URL was supplied.
    #[error("no url was given")]
    MissingUrl,

    /// The target URL could not be parsed or uses an unsupported scheme.
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// The target URL exceeds `MAX_URL_LENGTH`.
    #[error("url too long ({0} characters)")]
    UrlTooLong(usize),

    /// The timeout must be greater than zero.
    #[error("timeout must be greater than 0 ms")]
    InvalidTimeout,
}

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Failure classes a probe attempt can end in.
///
/// `NonStandardStatus` is not a failure of the run: the server answered, just not
/// with 200. It is kept in the taxonomy because it drives the GET fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorType {
    /// Timed out while establishing the connection.
    ConnectTimeout,
    /// Connected, but the response did not arrive in time.
    ReadTimeout,
    /// The host name could not be resolved.
    DnsNotFound,
    /// TLS handshake failed because the certificate does not cover the host name.
    TlsMismatch,
    /// The server answered with a status other than 200.
    NonStandardStatus,
    /// Any other transport failure (refused connection, protocol error, ...).
    UnclassifiedError,
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ErrorType {
    /// Stable human-readable label.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::ConnectTimeout => "Connection timeout",
            ErrorType::ReadTimeout => "HTTP/read timeout",
            ErrorType::DnsNotFound => "Site could not be found",
            ErrorType::TlsMismatch => "TLS certificate name mismatch",
            ErrorType::NonStandardStatus => "Non-standard status code",
            ErrorType::UnclassifiedError => "Request failed",
        }
    }

    /// Whether ending a run with this type means the target is unreachable.
    pub fn is_failure(&self) -> bool {
        !matches!(self, ErrorType::NonStandardStatus)
    }
}
