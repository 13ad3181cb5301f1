//! HTTP transport used by the prober.
//!
//! The prober only sees the `HttpClient` trait; `ReqwestClient` is the production
//! implementation. Redirect following, timeouts and TLS are left to reqwest.

mod client;
mod types;

use std::future::Future;

pub use client::ReqwestClient;
pub use types::{
    Method, ProbeRequest, ProbeResponse, TransportError, TransportErrorKind, TransportResult,
};

/// Executes single probe requests.
///
/// Implementations must not retry on their own: every call is one attempt
/// as far as the prober's attempt budget is concerned.
pub trait HttpClient {
    /// Sends `request` and reports either the response status or a structured error.
    fn execute(&self, request: &ProbeRequest) -> impl Future<Output = TransportResult> + Send;
}
