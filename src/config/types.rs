//! Configuration types and CLI options.
//!
//! This module defines the enums and structs used for command-line argument parsing
//! and the validated configuration consumed by the prober.

use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::config::constants::{DEFAULT_MAX_REDIRECTS, DEFAULT_TIMEOUT_MS};
use crate::config::url::validate_and_normalize_url;
use crate::error_handling::ConfigError;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Command-line options.
///
/// # Examples
///
/// ```bash
/// # HEAD, then GET if needed
/// link_health -u https://example.com
///
/// # Short timeout, no redirects, www. mismatch recovery enabled
/// link_health -u https://www.example.com -t 2000 -r 0 -m
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "link_health",
    version,
    about = "Checks whether a URL is alive: HEAD first, GET fallback."
)]
pub struct Opt {
    /// URL to check (scheme defaults to https://)
    #[arg(short = 'u', long)]
    pub url: Option<String>,

    /// Per-request timeout in milliseconds (connection and response)
    #[arg(short = 't', long = "timeout", default_value_t = DEFAULT_TIMEOUT_MS)]
    pub timeout_ms: u64,

    /// Maximum number of redirects to follow
    #[arg(short = 'r', long = "redirects", default_value_t = DEFAULT_MAX_REDIRECTS)]
    pub redirects: usize,

    /// Retry with/without a leading "www." when the certificate only covers the other form
    #[arg(short = 'm', long)]
    pub mismatch: bool,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,
}

/// Validated probe configuration.
///
/// Built once from CLI input (or programmatically) and only read afterwards;
/// there are no setters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeConfig {
    url: String,
    timeout: Duration,
    max_redirects: usize,
    mismatch_recovery: bool,
}

impl ProbeConfig {
    /// Creates a configuration, normalizing and validating the URL.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the URL is empty or invalid, or if the timeout is zero.
    pub fn new(
        url: &str,
        timeout: Duration,
        max_redirects: usize,
        mismatch_recovery: bool,
    ) -> Result<Self, ConfigError> {
        if timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout);
        }
        Ok(Self {
            url: validate_and_normalize_url(url)?,
            timeout,
            max_redirects,
            mismatch_recovery,
        })
    }

    /// Builds the configuration from parsed command-line options.
    pub fn from_opt(opt: &Opt) -> Result<Self, ConfigError> {
        let url = opt.url.as_deref().ok_or(ConfigError::MissingUrl)?;
        Self::new(
            url,
            Duration::from_millis(opt.timeout_ms),
            opt.redirects,
            opt.mismatch,
        )
    }

    /// The normalized target URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Maximum redirects followed per request.
    pub fn max_redirects(&self) -> usize {
        self.max_redirects
    }

    /// Whether www. certificate mismatch recovery is enabled.
    pub fn mismatch_recovery(&self) -> bool {
        self.mismatch_recovery
    }
}
