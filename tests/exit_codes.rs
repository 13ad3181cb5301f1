//! Tests for the exit code policy: 1 when the target is unreachable, 0 when it answered.

use std::time::Duration;

use link_health::{ErrorType, ProbeReport, Verdict};
use strum::IntoEnumIterator;

fn report(verdict: Verdict) -> ProbeReport {
    ProbeReport {
        verdict,
        attempts: Vec::new(),
        mismatch_fix: None,
    }
}

#[test]
fn test_alive_exits_zero() {
    let verdict = Verdict::Alive {
        status_code: 200,
        elapsed: Duration::from_millis(30),
    };
    assert_eq!(report(verdict).exit_code(), 0);
}

#[test]
fn test_non_standard_status_exits_zero() {
    for status_code in [204, 301, 404, 500] {
        let verdict = Verdict::NonStandardStatus {
            status_code,
            elapsed: Duration::from_millis(30),
        };
        assert_eq!(report(verdict).exit_code(), 0, "status {status_code}");
    }
}

#[test]
fn test_every_failure_exits_one() {
    for error_type in ErrorType::iter().filter(ErrorType::is_failure) {
        assert_eq!(
            report(Verdict::Failed(error_type)).exit_code(),
            1,
            "{error_type:?}"
        );
    }
}

#[test]
fn test_unclassified_error_exits_one() {
    assert_eq!(
        report(Verdict::Failed(ErrorType::UnclassifiedError)).exit_code(),
        1
    );
}
