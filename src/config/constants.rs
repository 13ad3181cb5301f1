//! Configuration constants.
//!
//! Defaults for the CLI options and the fixed limits of a probe run.

use std::time::Duration;

/// Default per-request timeout in milliseconds.
/// Covers both the connection phase and the request/response phase.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Default number of redirects the HTTP client will follow per request.
pub const DEFAULT_MAX_REDIRECTS: usize = 5;

/// Maximum number of HTTP requests a single probe run may issue.
///
/// HEAD, the GET fallback, and one extra HEAD granted by a resolved
/// certificate name mismatch.
pub const MAX_ATTEMPTS: usize = 3;

/// Maximum URL length accepted on the command line.
pub const MAX_URL_LENGTH: usize = 2048;

/// Timeout for the side connection that reads certificate SANs after a name mismatch.
pub const CERT_INSPECTION_TIMEOUT: Duration = Duration::from_secs(5);

/// Marker preceding each subject alternative name in a mismatch reason.
pub const ALT_NAME_MARKER: &str = "DNS:";

/// Host prefix toggled by mismatch recovery.
pub const WWW_PREFIX: &str = "www.";

/// User-Agent sent with every probe request.
pub const DEFAULT_USER_AGENT: &str = concat!("link_health/", env!("CARGO_PKG_VERSION"));

/// Message printed when `--url` is missing.
pub const MISSING_URL_MESSAGE: &str =
    "Exiting as no url was given. Remember -u http://urltotest.com";
