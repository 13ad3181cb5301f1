//! reqwest-backed `HttpClient`.

use std::error::Error as StdError;
use std::time::{Duration, Instant};

use log::debug;
use url::Url;

use super::types::{ProbeRequest, ProbeResponse, TransportError, TransportResult};
use super::HttpClient;
use crate::config::{ProbeConfig, CERT_INSPECTION_TIMEOUT};
use crate::error_handling::InitializationError;
use crate::initialization::{init_client, ClientOverrides};
use crate::tls::{fetch_alt_names, mismatch_reason};

/// Production HTTP client.
///
/// Holds one `reqwest::Client` configured from the `ProbeConfig`. A request asking
/// for a different timeout or redirect limit gets a dedicated client for that call,
/// since reqwest fixes both at construction.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: reqwest::Client,
    timeout: Duration,
    max_redirects: usize,
    overrides: ClientOverrides,
    cert_inspection_timeout: Duration,
}

impl ReqwestClient {
    /// Builds the client for a probe run.
    ///
    /// # Errors
    ///
    /// Returns `InitializationError::HttpClientError` if reqwest cannot build the client
    /// (e.g. the TLS backend fails to initialize).
    pub fn new(config: &ProbeConfig) -> Result<Self, InitializationError> {
        Self::with_overrides(config, ClientOverrides::default())
    }

    /// Builds the client with extra trust roots and host name overrides.
    ///
    /// The overrides also apply to the certificate inspection connection made after
    /// a host name mismatch.
    ///
    /// # Errors
    ///
    /// Returns `InitializationError::HttpClientError` if an override root cannot be
    /// parsed or reqwest cannot build the client.
    pub fn with_overrides(
        config: &ProbeConfig,
        overrides: ClientOverrides,
    ) -> Result<Self, InitializationError> {
        Ok(Self {
            client: init_client(config.timeout(), config.max_redirects(), &overrides)?,
            timeout: config.timeout(),
            max_redirects: config.max_redirects(),
            overrides,
            cert_inspection_timeout: CERT_INSPECTION_TIMEOUT.min(config.timeout()),
        })
    }

    fn client_for(&self, request: &ProbeRequest) -> Result<reqwest::Client, TransportError> {
        if request.timeout == self.timeout && request.max_redirects == self.max_redirects {
            return Ok(self.client.clone());
        }
        debug!(
            "Dedicated client for {} (timeout {:?}, {} redirects)",
            request.uri, request.timeout, request.max_redirects
        );
        init_client(request.timeout, request.max_redirects, &self.overrides)
            .map_err(|e| TransportError::other(e.to_string()))
    }

    /// Maps a `reqwest::Error` onto the transport error contract.
    ///
    /// Certificate name mismatches trigger a second, inspect-only TLS connection to
    /// read the certificate's alternative names for the mismatch reason.
    async fn categorize(&self, error: reqwest::Error, request: &ProbeRequest) -> TransportError {
        let detail = error_chain_message(&error);

        if error.is_timeout() {
            return TransportError::timeout(error.is_connect(), detail);
        }
        if is_dns_failure(&error) {
            return TransportError::host_not_found(detail);
        }
        if is_name_mismatch(&error) {
            // The failing URL may differ from the requested one after redirects
            let failed_url = error.url().cloned().or_else(|| Url::parse(&request.uri).ok());
            if let Some(url) = failed_url {
                if let Some(host) = url.host_str() {
                    let port = url.port_or_known_default().unwrap_or(443);
                    let connect_to = self.overrides.resolved_addr(host, port);
                    let reason = match fetch_alt_names(
                        host,
                        port,
                        connect_to,
                        self.cert_inspection_timeout,
                    )
                    .await
                    {
                        Ok(names) => mismatch_reason(host, &names),
                        Err(e) => {
                            debug!("Could not read certificate names for {host}: {e:#}");
                            detail.clone()
                        }
                    };
                    return TransportError::name_mismatch(host, reason, detail);
                }
            }
        }

        TransportError::other(detail)
    }
}

impl HttpClient for ReqwestClient {
    async fn execute(&self, request: &ProbeRequest) -> TransportResult {
        let client = self.client_for(request)?;

        debug!("{} {}", request.method, request.uri);
        let start = Instant::now();
        let result = client
            .request(request.method.into(), request.uri.as_str())
            .send()
            .await;

        match result {
            Ok(response) => Ok(ProbeResponse {
                status_code: response.status().as_u16(),
                elapsed: start.elapsed(),
            }),
            Err(e) => Err(self.categorize(e, request).await),
        }
    }
}

/// Iterates an error and all of its sources.
fn error_chain<'a>(
    error: &'a (dyn StdError + 'static),
) -> impl Iterator<Item = &'a (dyn StdError + 'static)> {
    std::iter::successors(Some(error), |e| (*e).source())
}

/// Joins the messages of an error chain, outermost first.
fn error_chain_message(error: &reqwest::Error) -> String {
    let mut parts: Vec<String> = Vec::new();
    for cause in error_chain(error) {
        let msg = cause.to_string();
        if !parts.iter().any(|p| p.contains(&msg)) {
            parts.push(msg);
        }
    }
    parts.join(": ")
}

fn is_dns_failure(error: &reqwest::Error) -> bool {
    error_chain(error).any(|cause| {
        let msg = cause.to_string().to_lowercase();
        msg.contains("dns error")
            || msg.contains("failed to lookup address")
            || msg.contains("name or service not known")
            || msg.contains("nodename nor servname")
            || msg.contains("no such host")
    })
}

fn is_name_mismatch(error: &reqwest::Error) -> bool {
    for cause in error_chain(error) {
        if let Some(tls_err) = cause.downcast_ref::<rustls::Error>() {
            if is_name_error(tls_err) {
                return true;
            }
        }
        // io::Error::source() skips the wrapped error itself
        if let Some(io_err) = cause.downcast_ref::<std::io::Error>() {
            if let Some(tls_err) = io_err
                .get_ref()
                .and_then(|inner| inner.downcast_ref::<rustls::Error>())
            {
                if is_name_error(tls_err) {
                    return true;
                }
            }
        }
        let msg = cause.to_string().to_lowercase();
        if msg.contains("notvalidforname") || msg.contains("not valid for name") {
            return true;
        }
    }
    false
}

/// Covers both `NotValidForName` and the context-carrying variant of newer rustls releases.
fn is_name_error(error: &rustls::Error) -> bool {
    match error {
        rustls::Error::InvalidCertificate(cert_err) => {
            format!("{cert_err:?}").starts_with("NotValidForName")
        }
        _ => false,
    }
}
