//! link_health library: single-URL reachability probing
//!
//! This library checks whether one URL is alive. A probe sends a HEAD request,
//! falls back to GET when HEAD does not return 200, and can optionally recover from
//! TLS certificates that only cover the other `www.` form of the host name.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use link_health::{ProbeConfig, Prober, ReqwestClient};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ProbeConfig::new("https://www.example.com", Duration::from_secs(10), 5, true)?;
//! let client = ReqwestClient::new(&config)?;
//!
//! let report = Prober::new(&config, &client).run(&mut ()).await;
//! println!("{:?} after {} request(s)", report.verdict, report.request_count());
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

#![warn(missing_docs)]

pub mod config;
pub mod error_handling;
pub mod initialization;
pub mod mismatch;
pub mod probe;
pub mod report;
mod tls;
pub mod transport;

// Re-export public API
pub use config::{LogFormat, LogLevel, Opt, ProbeConfig};
pub use error_handling::{ConfigError, ErrorType, InitializationError};
pub use initialization::ClientOverrides;
pub use mismatch::{resolve_mismatch, Resolution};
pub use probe::{Attempt, AttemptRecord, Outcome, ProbeObserver, ProbeReport, Prober, Verdict};
pub use report::ConsoleReporter;
pub use transport::{HttpClient, ReqwestClient};
