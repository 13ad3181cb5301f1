//! Console reporting of probe runs.
//!
//! Human-readable, one block per attempt. Not meant to be parsed.

use std::fmt;
use std::io::Write;

use log::warn;

use crate::config::ProbeConfig;
use crate::probe::{Attempt, Outcome, ProbeObserver, ProbeReport, Verdict};

/// Writes the probe report to any `Write` sink (stdout in the binary).
pub struct ConsoleReporter<W: Write> {
    out: W,
    timeout_ms: u128,
}

impl<W: Write> ConsoleReporter<W> {
    /// Creates a reporter writing to `out`.
    pub fn new(out: W) -> Self {
        Self { out, timeout_ms: 0 }
    }

    /// Consumes the reporter and returns its sink.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, args: fmt::Arguments<'_>) {
        if let Err(e) = self.out.write_fmt(args).and_then(|_| self.out.write_all(b"\n")) {
            warn!("Failed to write report: {e}");
        }
    }
}

impl<W: Write> ProbeObserver for ConsoleReporter<W> {
    fn on_start(&mut self, config: &ProbeConfig) {
        self.timeout_ms = config.timeout().as_millis();
        self.line(format_args!(
            "\n######################## Trying to make a meaningful connection with {} ############################\n",
            config.url()
        ));
        self.line(format_args!("Results:\n"));
    }

    fn on_outcome(&mut self, attempt: &Attempt, outcome: &Outcome) {
        self.line(format_args!("\t{} Request:\n", attempt.method()));
        let timeout_ms = self.timeout_ms;
        match outcome {
            Outcome::Success {
                status_code,
                elapsed,
            } => {
                self.line(format_args!("\t\tStatus code returned:         {status_code}"));
                self.line(format_args!(
                    "\t\tTotal response time:          {}ms\n",
                    elapsed.as_millis()
                ));
            }
            Outcome::ConnectTimeout => self.line(format_args!(
                "\t\tConnection timeout occurred - couldn't establish connection to target in under {timeout_ms}ms\n"
            )),
            Outcome::ReadTimeout => self.line(format_args!(
                "\t\thttp/read timeout occurred - URL didn't respond in under {timeout_ms}ms\n"
            )),
            Outcome::DnsNotFound => self.line(format_args!("\t\tSite could not be found :(\n")),
            // Reported through on_mismatch_fixed / on_mismatch_unresolved
            Outcome::TlsMismatch { .. } => {}
            Outcome::Unclassified { detail } => {
                self.line(format_args!("\t\tRequest failed: {detail}\n"))
            }
        }
    }

    fn on_mismatch_fixed(&mut self, uri: &str) {
        self.line(format_args!("\t\tFixed basic SSL CN mismatch: {uri}\n"));
    }

    fn on_mismatch_unresolved(&mut self, reason: &str) {
        self.line(format_args!("\t\tStatus code 0"));
        self.line(format_args!("\t\t{reason}\n"));
    }

    fn on_finish(&mut self, report: &ProbeReport) {
        match report.verdict {
            Verdict::Alive { status_code, .. } => {
                self.line(format_args!("Verdict: alive ({status_code})"))
            }
            Verdict::NonStandardStatus { status_code, .. } => self.line(format_args!(
                "Verdict: responding with non-standard status ({status_code})"
            )),
            Verdict::Failed(error_type) => {
                self.line(format_args!("Verdict: unreachable ({error_type})"))
            }
        }
        if let Err(e) = self.out.flush() {
            warn!("Failed to flush report: {e}");
        }
    }
}
