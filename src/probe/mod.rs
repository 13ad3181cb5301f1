//! Reachability probe.
//!
//! A run issues a HEAD request, falls back to GET when that does not return 200,
//! and optionally retries once against a `www.`-corrected URI when the TLS
//! certificate only covers the other form of the host name. At most
//! `MAX_ATTEMPTS` requests are issued per run.
//!
//! Each run owns its own state; independent `Prober`s can run concurrently.

mod machine;
mod types;

#[cfg(test)]
mod tests;

use log::{debug, info};

use crate::config::ProbeConfig;
use crate::error_handling::classify;
use crate::mismatch::{resolve_mismatch, Resolution};
use crate::transport::HttpClient;

use machine::{Machine, State};

pub use types::{Attempt, AttemptRecord, Outcome, ProbeReport, Verdict};

/// Receives progress notifications from a probe run.
///
/// All methods default to doing nothing; `()` is a silent observer.
pub trait ProbeObserver {
    /// Called once before the first attempt.
    fn on_start(&mut self, _config: &ProbeConfig) {}

    /// Called with every classified outcome. Certificate name mismatches are
    /// followed by `on_mismatch_fixed` or `on_mismatch_unresolved`.
    fn on_outcome(&mut self, _attempt: &Attempt, _outcome: &Outcome) {}

    /// A mismatch was resolved; the next attempt targets `uri`.
    fn on_mismatch_fixed(&mut self, _uri: &str) {}

    /// A mismatch could not be resolved (or recovery is disabled).
    fn on_mismatch_unresolved(&mut self, _reason: &str) {}

    /// Called once with the final report.
    fn on_finish(&mut self, _report: &ProbeReport) {}
}

impl ProbeObserver for () {}

/// Drives one probe run against an `HttpClient`.
pub struct Prober<'a, C> {
    config: &'a ProbeConfig,
    client: &'a C,
}

impl<'a, C: HttpClient> Prober<'a, C> {
    /// Creates a prober for `config` using `client` for requests.
    pub fn new(config: &'a ProbeConfig, client: &'a C) -> Self {
        Self { config, client }
    }

    /// Runs the probe to completion and returns its report.
    pub async fn run<O: ProbeObserver>(&self, observer: &mut O) -> ProbeReport {
        let mut machine = Machine::new(self.config.mismatch_recovery());
        let mut attempts: Vec<AttemptRecord> = Vec::new();
        let mut mismatch_fix: Option<String> = None;

        observer.on_start(self.config);
        let mut state = State::Attempting(Attempt::initial(self.config.url()));

        loop {
            state = match state {
                State::Attempting(attempt) => {
                    machine.record_issue();
                    debug!(
                        "Attempt {}: {} {} (retry allowed: {})",
                        machine.issued(),
                        attempt.method(),
                        attempt.uri(),
                        attempt.retry_allowed()
                    );

                    let result = self.client.execute(&attempt.request(self.config)).await;
                    let outcome = classify(&attempt, result);
                    observer.on_outcome(&attempt, &outcome);

                    if let Outcome::TlsMismatch { reason, .. } = &outcome {
                        if !machine.can_resolve() {
                            observer.on_mismatch_unresolved(reason);
                        }
                    }

                    let next = machine.after_outcome(&attempt, &outcome);
                    attempts.push(AttemptRecord { attempt, outcome });
                    next
                }
                State::Resolving(pending) => {
                    let resolution =
                        resolve_mismatch(&pending.hostname, &pending.reason, pending.attempt.uri());
                    let reason = pending.reason.clone();
                    let next = machine.after_resolution(pending, resolution.clone());

                    match (&resolution, &next) {
                        (Resolution::Corrected(uri), State::Attempting(_)) => {
                            info!("Fixed certificate name mismatch: {uri}");
                            observer.on_mismatch_fixed(uri);
                            mismatch_fix = Some(uri.clone());
                        }
                        _ => observer.on_mismatch_unresolved(&reason),
                    }
                    next
                }
                State::Terminal(verdict) => {
                    info!(
                        "Probe of {} finished after {} request(s): {:?}",
                        self.config.url(),
                        attempts.len(),
                        verdict
                    );
                    let report = ProbeReport {
                        verdict,
                        attempts,
                        mismatch_fix,
                    };
                    observer.on_finish(&report);
                    return report;
                }
            };
        }
    }
}
