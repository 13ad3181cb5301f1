//! Error handling and outcome classification.
//!
//! This module provides:
//! - The probe failure taxonomy (`ErrorType`)
//! - Configuration and initialization error types
//! - Classification of HTTP client results into `Outcome`s

mod categorization;
mod types;

// Re-export public API
pub use categorization::classify;
pub use types::{ConfigError, ErrorType, InitializationError};

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use strum::IntoEnumIterator;

    #[test]
    fn test_error_type_labels_are_unique() {
        let labels: HashSet<&str> = ErrorType::iter().map(|t| t.as_str()).collect();
        assert_eq!(labels.len(), ErrorType::iter().count());
    }

    #[test]
    fn test_error_type_display_matches_as_str() {
        for error_type in ErrorType::iter() {
            assert_eq!(error_type.to_string(), error_type.as_str());
        }
    }

    #[test]
    fn test_only_non_standard_status_is_not_a_failure() {
        let non_failures: Vec<ErrorType> = ErrorType::iter().filter(|t| !t.is_failure()).collect();
        assert_eq!(non_failures, vec![ErrorType::NonStandardStatus]);
    }

    #[test]
    fn test_config_error_messages() {
        assert_eq!(ConfigError::MissingUrl.to_string(), "no url was given");
        assert_eq!(
            ConfigError::InvalidUrl("x".to_string()).to_string(),
            "invalid url: x"
        );
    }
}
