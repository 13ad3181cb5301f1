//! HTTP client initialization.

use std::net::SocketAddr;
use std::time::Duration;

use reqwest::ClientBuilder;

use crate::config::DEFAULT_USER_AGENT;
use crate::error_handling::InitializationError;

/// Extra trust roots and host name overrides applied to every client built for a run.
///
/// Empty by default. Useful for targets behind a private CA, or to pin a host name
/// to an address without touching system DNS.
#[derive(Debug, Clone, Default)]
pub struct ClientOverrides {
    root_certificates: Vec<Vec<u8>>,
    resolve: Vec<(String, SocketAddr)>,
}

impl ClientOverrides {
    /// Trusts an additional DER-encoded root certificate.
    pub fn add_root_certificate_der(mut self, der: impl Into<Vec<u8>>) -> Self {
        self.root_certificates.push(der.into());
        self
    }

    /// Resolves `host` to `addr` instead of asking DNS.
    ///
    /// Only the IP of `addr` is used; the port always comes from the request URL.
    pub fn resolve(mut self, host: impl Into<String>, addr: SocketAddr) -> Self {
        self.resolve.push((host.into(), addr));
        self
    }

    /// The overridden address for `host`, with `port` applied.
    pub(crate) fn resolved_addr(&self, host: &str, port: u16) -> Option<SocketAddr> {
        self.resolve
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(host))
            .map(|(_, addr)| SocketAddr::new(addr.ip(), port))
    }
}

/// Initializes the HTTP client used for probe requests.
///
/// Creates a `reqwest::Client` configured with:
/// - `timeout` as the connect timeout (TCP and TLS handshake)
/// - `timeout` as the read timeout, restarted by every successful read
/// - Redirect following limited to `max_redirects` hops
/// - Rustls TLS backend with the bundled web PKI roots plus any override roots
///
/// No total timeout is set; it would also run during connect and mask connect timeouts.
///
/// # Errors
///
/// Returns `InitializationError::HttpClientError` if an override root certificate
/// cannot be parsed or client creation fails.
pub fn init_client(
    timeout: Duration,
    max_redirects: usize,
    overrides: &ClientOverrides,
) -> Result<reqwest::Client, InitializationError> {
    let mut builder = ClientBuilder::new()
        .redirect(reqwest::redirect::Policy::limited(max_redirects))
        .connect_timeout(timeout)
        .read_timeout(timeout)
        .user_agent(DEFAULT_USER_AGENT);

    for der in &overrides.root_certificates {
        builder = builder.add_root_certificate(reqwest::Certificate::from_der(der)?);
    }
    for (host, addr) in &overrides.resolve {
        builder = builder.resolve(host, *addr);
    }

    Ok(builder.build()?)
}
