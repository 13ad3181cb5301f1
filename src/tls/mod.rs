//! TLS certificate name inspection.
//!
//! When a handshake fails because the certificate does not cover the requested host,
//! the HTTP client reconnects with an inspect-only verifier and reads the leaf
//! certificate's DNS alternative names. They are rendered into the mismatch reason
//! the prober hands to the mismatch resolver.
//!
//! Uses `tokio-rustls` for the connection and `x509-parser` for certificate parsing.

mod extract;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use log::debug;
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::crypto::{ring, verify_tls12_signature, verify_tls13_signature, CryptoProvider};
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{ClientConfig, DigitallySignedStruct, SignatureScheme};
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;

use crate::config::ALT_NAME_MARKER;

use extract::extract_dns_alt_names;

/// Accepts any certificate chain while still checking handshake signatures.
///
/// Only used to read a certificate that normal verification already rejected;
/// nothing is sent over connections made with it.
#[derive(Debug)]
struct InspectOnlyVerifier(Arc<CryptoProvider>);

impl ServerCertVerifier for InspectOnlyVerifier {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls12_signature(message, cert, dss, &self.0.signature_verification_algorithms)
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls13_signature(message, cert, dss, &self.0.signature_verification_algorithms)
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.0.signature_verification_algorithms.supported_schemes()
    }
}

fn inspect_only_config() -> Result<ClientConfig> {
    let provider = Arc::new(ring::default_provider());
    let config = ClientConfig::builder_with_provider(provider.clone())
        .with_safe_default_protocol_versions()
        .context("Failed to select TLS protocol versions")?
        .dangerous()
        .with_custom_certificate_verifier(Arc::new(InspectOnlyVerifier(provider)))
        .with_no_client_auth();
    Ok(config)
}

/// Reads the DNS subject alternative names of the certificate served by `host:port`.
///
/// `connect_to` replaces DNS resolution of `host` when set; SNI still uses `host`.
///
/// # Errors
///
/// Returns an error if:
/// - The host name is not a valid TLS server name
/// - The TCP connection or TLS handshake fails or exceeds `timeout`
/// - The server presents no certificate, or it cannot be parsed
pub async fn fetch_alt_names(
    host: &str,
    port: u16,
    connect_to: Option<SocketAddr>,
    timeout: Duration,
) -> Result<Vec<String>> {
    let server_name = ServerName::try_from(host.to_string())
        .map_err(|e| anyhow!("Invalid domain name {host}: {e}"))?;

    let connect = async {
        match connect_to {
            Some(addr) => TcpStream::connect(addr).await,
            None => TcpStream::connect((host, port)).await,
        }
    };
    let sock = tokio::time::timeout(timeout, connect)
        .await
        .map_err(|_| anyhow!("TCP connection timeout for {host}:{port}"))?
        .with_context(|| format!("Failed to connect to {host}:{port}"))?;

    let connector = TlsConnector::from(Arc::new(inspect_only_config()?));
    let tls_stream = tokio::time::timeout(timeout, connector.connect(server_name, sock))
        .await
        .map_err(|_| anyhow!("TLS handshake timeout for {host}"))?
        .with_context(|| format!("TLS connection failed for {host}"))?;

    let cert = tls_stream
        .get_ref()
        .1
        .peer_certificates()
        .and_then(|certs| certs.first())
        .ok_or_else(|| anyhow!("No certificate presented by {host}"))?;

    let names = extract_dns_alt_names(cert.as_ref())?;
    debug!("Certificate for {host} lists {} DNS name(s): {names:?}", names.len());
    Ok(names)
}

/// Renders a host name mismatch reason listing the certificate's alternative names.
///
/// The format is `Host: <host>. is not in the cert's altnames: DNS:a, DNS:b`;
/// each name is preceded by `ALT_NAME_MARKER`.
pub fn mismatch_reason(host: &str, alt_names: &[String]) -> String {
    let names = alt_names
        .iter()
        .map(|name| format!("{ALT_NAME_MARKER}{name}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!("Host: {host}. is not in the cert's altnames: {names}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mismatch_reason_lists_names() {
        let reason = mismatch_reason(
            "www.example.com",
            &["example.com".to_string(), "other.com".to_string()],
        );
        assert_eq!(
            reason,
            "Host: www.example.com. is not in the cert's altnames: DNS:example.com, DNS:other.com"
        );
    }

    #[test]
    fn test_mismatch_reason_without_names_has_no_marker() {
        let reason = mismatch_reason("example.com", &[]);
        assert!(!reason.contains(ALT_NAME_MARKER));
    }

    #[test]
    fn test_inspect_only_config_builds() {
        assert!(inspect_only_config().is_ok());
    }

    #[tokio::test]
    async fn test_fetch_alt_names_rejects_invalid_server_name() {
        let result =
            fetch_alt_names("not a host name", 443, None, Duration::from_millis(100)).await;
        assert!(result.is_err());
    }
}
