//! Recovery from `www.` certificate name mismatches.
//!
//! Handles TLS failures where the only discrepancy between the requested host and
//! the certificate's alternative names is a leading `www.` (e.g. `www.example.com`
//! requested, certificate only valid for `example.com`, or the reverse).
//!
//! Matching is literal and case-sensitive: no wildcard certificates, no IDN
//! normalization, no other kinds of mismatch.

use url::Url;

use crate::config::{ALT_NAME_MARKER, WWW_PREFIX};

/// Result of trying to resolve a certificate name mismatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The request URI with the `www.` prefix of its host toggled.
    Corrected(String),
    /// The mismatch is not a plain `www.` discrepancy.
    NoFix,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Toggle {
    Strip,
    Add,
}

/// Proposes a corrected URI for a TLS host name mismatch.
///
/// `reason` lists the certificate's names, each preceded by `DNS:`; anything before
/// the first marker is ignored. `hostname` is the host the handshake was made for,
/// with at most one trailing dot. `uri` is the request URI whose host gets the
/// same `www.` toggle when the toggled hostname is among the certificate's names.
///
/// Pure and deterministic: the same inputs always produce the same `Resolution`.
pub fn resolve_mismatch(hostname: &str, reason: &str, uri: &str) -> Resolution {
    let alt_names: Vec<&str> = reason
        .split(ALT_NAME_MARKER)
        .skip(1)
        .map(clean_alt_name)
        .filter(|name| !name.is_empty())
        .collect();
    if alt_names.is_empty() {
        return Resolution::NoFix;
    }

    let hostname = strip_trailing_dot(hostname);
    let (candidate, toggle) = match hostname.strip_prefix(WWW_PREFIX) {
        Some(bare) => (bare.to_string(), Toggle::Strip),
        None => (format!("{WWW_PREFIX}{hostname}"), Toggle::Add),
    };

    if !alt_names.iter().any(|name| *name == candidate) {
        return Resolution::NoFix;
    }

    match toggle_uri_host(uri, toggle) {
        Some(corrected) => Resolution::Corrected(corrected),
        None => Resolution::NoFix,
    }
}

/// Removes exactly one trailing `.` (fully-qualified form) from a host name.
pub(crate) fn strip_trailing_dot(hostname: &str) -> &str {
    hostname.strip_suffix('.').unwrap_or(hostname)
}

/// Drops the whitespace and `,` separator that follow each name in a rendered list.
fn clean_alt_name(segment: &str) -> &str {
    segment.trim().trim_end_matches(',').trim_end()
}

/// Applies the `www.` toggle to the host of `uri`, leaving every other byte untouched.
///
/// Returns `None` if the URI has no host or its host already has the target form.
fn toggle_uri_host(uri: &str, toggle: Toggle) -> Option<String> {
    let parsed = Url::parse(uri).ok()?;
    let host = parsed.host_str()?;

    let authority_start = uri.find("://")? + 3;
    let authority_len = uri[authority_start..]
        .find(|c| matches!(c, '/' | '?' | '#'))
        .unwrap_or(uri.len() - authority_start);
    let authority = &uri[authority_start..authority_start + authority_len];
    let host_start = authority_start + authority.rfind('@').map_or(0, |i| i + 1);

    let rest = &uri[host_start..];
    // Url lower-cases hosts; the raw URI may not be
    if !rest.to_ascii_lowercase().starts_with(host) {
        return None;
    }
    let has_www = host.starts_with(WWW_PREFIX);

    match toggle {
        Toggle::Strip if has_www => Some(format!(
            "{}{}",
            &uri[..host_start],
            &rest[WWW_PREFIX.len()..]
        )),
        Toggle::Add if !has_www => Some(format!("{}{WWW_PREFIX}{rest}", &uri[..host_start])),
        _ => None,
    }
}
