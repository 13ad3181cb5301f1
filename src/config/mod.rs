//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (timeouts, attempt budget, etc.)
//! - CLI option types and parsing
//! - The validated, immutable `ProbeConfig` handed to the prober

mod constants;
mod types;
mod url;

// Re-export all constants
pub use constants::*;
pub use types::{LogFormat, LogLevel, Opt, ProbeConfig};
pub use url::validate_and_normalize_url;
