//! Certificate extraction utilities.

use anyhow::Result;
use x509_parser::extensions::{GeneralName, ParsedExtension};

/// Extracts the DNS Subject Alternative Names from a DER-encoded certificate.
///
/// Only DNS names are returned; IP addresses, e-mail addresses and other name
/// forms are ignored since host name matching only looks at DNS names.
pub(crate) fn extract_dns_alt_names(der: &[u8]) -> Result<Vec<String>> {
    let (_, cert) = x509_parser::parse_x509_certificate(der)?;
    let mut sans = Vec::new();

    for ext in cert.extensions() {
        if let ParsedExtension::SubjectAlternativeName(ref san) = ext.parsed_extension() {
            for general_name in &san.general_names {
                if let GeneralName::DNSName(dns_name) = general_name {
                    sans.push(dns_name.to_string());
                }
            }
        }
    }

    Ok(sans)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_dns_alt_names_rejects_garbage() {
        assert!(extract_dns_alt_names(b"definitely not DER").is_err());
    }

    #[test]
    fn test_extract_dns_alt_names_rejects_empty() {
        assert!(extract_dns_alt_names(&[]).is_err());
    }
}
