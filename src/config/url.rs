//! URL validation and normalization for the probe target.

use crate::config::constants::MAX_URL_LENGTH;
use crate::error_handling::ConfigError;

/// Validates and normalizes the target URL.
///
/// Trims surrounding whitespace and adds an `https://` prefix if no scheme is given,
/// then checks that the URL is syntactically valid and uses the http/https scheme.
/// URLs longer than `MAX_URL_LENGTH` (before or after normalization) are rejected.
///
/// # Errors
///
/// Returns `ConfigError::MissingUrl` for an empty string, `ConfigError::UrlTooLong`
/// for oversized input and `ConfigError::InvalidUrl` for anything that does not
/// parse as an http(s) URL.
pub fn validate_and_normalize_url(url: &str) -> Result<String, ConfigError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(ConfigError::MissingUrl);
    }
    if url.len() > MAX_URL_LENGTH {
        return Err(ConfigError::UrlTooLong(url.len()));
    }

    let normalized = if url.contains("://") {
        url.to_string()
    } else {
        format!("https://{url}")
    };

    if normalized.len() > MAX_URL_LENGTH {
        return Err(ConfigError::UrlTooLong(normalized.len()));
    }

    match ::url::Url::parse(&normalized) {
        Ok(parsed) => match parsed.scheme() {
            "http" | "https" if parsed.host_str().is_some() => Ok(normalized),
            "http" | "https" => Err(ConfigError::InvalidUrl(format!("{url}: missing host"))),
            scheme => Err(ConfigError::InvalidUrl(format!(
                "{url}: unsupported scheme '{scheme}'"
            ))),
        },
        Err(e) => Err(ConfigError::InvalidUrl(format!("{url}: {e}"))),
    }
}
