//! Prober tests against a scripted HTTP client.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use super::*;
use crate::config::MAX_ATTEMPTS;
use crate::error_handling::ErrorType;
use crate::transport::{Method, ProbeRequest, ProbeResponse, TransportError, TransportResult};

const TARGET: &str = "https://www.example.com";

/// Replays canned results in order and records every request.
struct ScriptedClient {
    responses: Mutex<VecDeque<TransportResult>>,
    requests: Mutex<Vec<ProbeRequest>>,
}

impl ScriptedClient {
    fn new(responses: Vec<TransportResult>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn requests(&self) -> Vec<ProbeRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl HttpClient for ScriptedClient {
    async fn execute(&self, request: &ProbeRequest) -> TransportResult {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::other("script exhausted")))
    }
}

#[derive(Default)]
struct RecordingObserver {
    events: Vec<String>,
}

impl ProbeObserver for RecordingObserver {
    fn on_start(&mut self, config: &ProbeConfig) {
        self.events.push(format!("start {}", config.url()));
    }

    fn on_outcome(&mut self, attempt: &Attempt, outcome: &Outcome) {
        let kind = outcome
            .error_type()
            .map_or_else(|| "ok".to_string(), |t| format!("{t:?}"));
        self.events.push(format!("{} {kind}", attempt.method()));
    }

    fn on_mismatch_fixed(&mut self, uri: &str) {
        self.events.push(format!("fixed {uri}"));
    }

    fn on_mismatch_unresolved(&mut self, _reason: &str) {
        self.events.push("status 0".to_string());
    }

    fn on_finish(&mut self, report: &ProbeReport) {
        self.events.push(format!("finish {}", report.exit_code()));
    }
}

fn config(recovery: bool) -> ProbeConfig {
    ProbeConfig::new(TARGET, Duration::from_millis(1500), 3, recovery).expect("valid config")
}

fn status(status_code: u16) -> TransportResult {
    Ok(ProbeResponse {
        status_code,
        elapsed: Duration::from_millis(12),
    })
}

fn dns_failure() -> TransportResult {
    Err(TransportError::host_not_found("dns error: failed to lookup address"))
}

fn mismatch(host: &str, reason: &str) -> TransportResult {
    Err(TransportError::name_mismatch(
        host,
        reason,
        "invalid peer certificate: NotValidForName",
    ))
}

async fn run(
    recovery: bool,
    responses: Vec<TransportResult>,
) -> (ProbeReport, Vec<ProbeRequest>, Vec<String>) {
    let config = config(recovery);
    let client = ScriptedClient::new(responses);
    let mut observer = RecordingObserver::default();
    let report = Prober::new(&config, &client).run(&mut observer).await;
    (report, client.requests(), observer.events)
}

fn methods(requests: &[ProbeRequest]) -> Vec<Method> {
    requests.iter().map(|r| r.method).collect()
}

#[tokio::test]
async fn test_head_200_issues_single_request() {
    let (report, requests, events) = run(false, vec![status(200), status(200)]).await;

    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, Method::Head);
    assert_eq!(requests[0].uri, TARGET);
    assert_eq!(requests[0].timeout, Duration::from_millis(1500));
    assert_eq!(requests[0].max_redirects, 3);
    assert!(matches!(
        report.verdict,
        Verdict::Alive {
            status_code: 200,
            ..
        }
    ));
    assert_eq!(report.exit_code(), 0);
    assert_eq!(
        events,
        vec![
            format!("start {TARGET}"),
            "HEAD ok".to_string(),
            "finish 0".to_string()
        ]
    );
}

#[tokio::test]
async fn test_head_500_then_get_500_is_non_standard_status() {
    let (report, requests, _) = run(false, vec![status(500), status(500), status(200)]).await;

    assert_eq!(methods(&requests), vec![Method::Head, Method::Get]);
    assert!(!report.attempts[1].attempt.retry_allowed());
    assert!(matches!(
        report.verdict,
        Verdict::NonStandardStatus {
            status_code: 500,
            ..
        }
    ));
    assert_eq!(report.exit_code(), 0);
}

#[tokio::test]
async fn test_head_405_then_get_200_is_alive() {
    let (report, requests, _) = run(false, vec![status(405), status(200)]).await;

    assert_eq!(methods(&requests), vec![Method::Head, Method::Get]);
    assert!(matches!(report.verdict, Verdict::Alive { .. }));
}

#[tokio::test]
async fn test_dns_failure_twice_fails_with_exit_1() {
    let (report, requests, _) = run(false, vec![dns_failure(), dns_failure()]).await;

    assert_eq!(methods(&requests), vec![Method::Head, Method::Get]);
    assert_eq!(report.verdict, Verdict::Failed(ErrorType::DnsNotFound));
    assert_eq!(report.exit_code(), 1);
}

#[tokio::test]
async fn test_timeouts_retry_as_get() {
    let (report, requests, _) = run(
        false,
        vec![
            Err(TransportError::timeout(true, "connect timeout")),
            Err(TransportError::timeout(false, "operation timed out")),
        ],
    )
    .await;

    assert_eq!(methods(&requests), vec![Method::Head, Method::Get]);
    assert_eq!(report.attempts[0].outcome, Outcome::ConnectTimeout);
    assert_eq!(report.verdict, Verdict::Failed(ErrorType::ReadTimeout));
    assert_eq!(report.exit_code(), 1);
}

#[tokio::test]
async fn test_mismatch_without_recovery_reports_status_0_then_gets() {
    let (report, requests, events) = run(
        false,
        vec![mismatch("www.example.com", "DNS:example.com"), status(200)],
    )
    .await;

    assert_eq!(methods(&requests), vec![Method::Head, Method::Get]);
    assert_eq!(requests[1].uri, TARGET);
    assert!(matches!(report.verdict, Verdict::Alive { .. }));
    assert!(report.mismatch_fix.is_none());
    assert_eq!(
        events[1..3],
        ["HEAD TlsMismatch".to_string(), "status 0".to_string()]
    );
}

#[tokio::test]
async fn test_mismatch_without_recovery_and_no_retry_fails() {
    let (report, _, _) = run(
        false,
        vec![
            dns_failure(),
            mismatch("www.example.com", "DNS:example.com"),
        ],
    )
    .await;

    assert_eq!(report.verdict, Verdict::Failed(ErrorType::TlsMismatch));
    assert_eq!(report.exit_code(), 1);
}

#[tokio::test]
async fn test_resolved_mismatch_restarts_with_fresh_head() {
    let reason = "CN=example.com, DNS:example.com, DNS:other.com";
    let (report, requests, events) =
        run(true, vec![mismatch("www.example.com.", reason), status(200)]).await;

    assert_eq!(methods(&requests), vec![Method::Head, Method::Head]);
    assert_eq!(requests[1].uri, "https://example.com");
    assert!(report.attempts[1].attempt.retry_allowed());
    assert_eq!(report.mismatch_fix.as_deref(), Some("https://example.com"));
    assert!(matches!(report.verdict, Verdict::Alive { .. }));
    assert!(events.contains(&"fixed https://example.com".to_string()));
    assert!(!events.contains(&"status 0".to_string()));
}

#[tokio::test]
async fn test_corrected_head_keeps_its_get_fallback() {
    let (report, requests, _) = run(
        true,
        vec![
            mismatch("www.example.com", "DNS:example.com"),
            status(404),
            status(200),
        ],
    )
    .await;

    assert_eq!(
        methods(&requests),
        vec![Method::Head, Method::Head, Method::Get]
    );
    assert_eq!(requests[2].uri, "https://example.com");
    assert!(matches!(report.verdict, Verdict::Alive { .. }));
}

#[tokio::test]
async fn test_unmatched_mismatch_reduces_to_status_0_path() {
    let (report, requests, events) = run(
        true,
        vec![
            mismatch("www.example.com", "DNS:cdn.example.net, DNS:other.com"),
            status(200),
        ],
    )
    .await;

    assert_eq!(methods(&requests), vec![Method::Head, Method::Get]);
    assert_eq!(requests[1].uri, TARGET);
    assert!(report.mismatch_fix.is_none());
    assert!(events.contains(&"status 0".to_string()));
    assert!(matches!(report.verdict, Verdict::Alive { .. }));
}

#[tokio::test]
async fn test_repeated_mismatches_stay_within_budget() {
    let (report, requests, _) = run(
        true,
        vec![
            mismatch("www.example.com", "DNS:example.com"),
            mismatch("example.com", "DNS:www.example.com"),
            mismatch("example.com", "DNS:www.example.com"),
            mismatch("www.example.com", "DNS:example.com"),
        ],
    )
    .await;

    assert_eq!(requests.len(), MAX_ATTEMPTS);
    assert_eq!(
        methods(&requests),
        vec![Method::Head, Method::Head, Method::Get]
    );
    assert_eq!(report.verdict, Verdict::Failed(ErrorType::TlsMismatch));
    assert_eq!(report.exit_code(), 1);
}

#[tokio::test]
async fn test_mismatch_on_get_fallback_gets_last_head_without_retry() {
    let (report, requests, _) = run(
        true,
        vec![
            Err(TransportError::timeout(false, "operation timed out")),
            mismatch("www.example.com", "DNS:example.com"),
            Err(TransportError::timeout(false, "operation timed out")),
            status(200),
        ],
    )
    .await;

    assert_eq!(
        methods(&requests),
        vec![Method::Head, Method::Get, Method::Head]
    );
    assert!(!report.attempts[2].attempt.retry_allowed());
    assert_eq!(report.verdict, Verdict::Failed(ErrorType::ReadTimeout));
}

#[tokio::test]
async fn test_unclassified_error_is_terminal_failure() {
    let (report, requests, _) = run(
        false,
        vec![Err(TransportError::other("connection refused")), status(200)],
    )
    .await;

    assert_eq!(requests.len(), 1);
    assert_eq!(report.verdict, Verdict::Failed(ErrorType::UnclassifiedError));
    assert_eq!(report.exit_code(), 1);
}

#[tokio::test]
async fn test_first_attempt_is_always_head_with_retry() {
    for recovery in [false, true] {
        for first in [status(200), status(500), dns_failure()] {
            let (report, _, _) = run(recovery, vec![first]).await;
            assert_eq!(report.attempts[0].attempt, Attempt::initial(TARGET));
        }
    }
}

#[tokio::test]
async fn test_never_more_than_max_attempts() {
    let scripts: Vec<Vec<TransportResult>> = vec![
        vec![status(500); 5],
        (0..5).map(|_| dns_failure()).collect(),
        (0..5)
            .map(|_| mismatch("www.example.com", "DNS:example.com"))
            .collect(),
    ];
    for script in scripts {
        for recovery in [false, true] {
            let (report, requests, _) = run(recovery, script.clone()).await;
            assert!(requests.len() <= MAX_ATTEMPTS);
            assert_eq!(report.request_count(), requests.len());
        }
    }
}

#[tokio::test]
async fn test_independent_probers_run_concurrently() {
    let config = config(false);
    let ok = ScriptedClient::new(vec![status(200)]);
    let failing = ScriptedClient::new(vec![dns_failure(), dns_failure()]);

    let first = Prober::new(&config, &ok);
    let second = Prober::new(&config, &failing);
    let (mut quiet_a, mut quiet_b) = ((), ());

    let (a, b) = tokio::join!(first.run(&mut quiet_a), second.run(&mut quiet_b));

    assert_eq!(a.exit_code(), 0);
    assert_eq!(b.exit_code(), 1);
    assert_eq!(ok.requests().len(), 1);
    assert_eq!(failing.requests().len(), 2);
}
