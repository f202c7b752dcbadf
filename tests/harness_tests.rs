//! The failure interception harness, used the way a test of a custom
//! assertion would use it.

mod common;

use assertions::{ReportConfig, SourceLocation, TestScope};
use predicates::prelude::*;

use common::{intercepted, messages};

#[test]
fn captured_failure_does_not_reach_the_outer_reporter() {
    let (harness, sink) = intercepted();
    let check = harness.asserter();

    let failure = harness.capture(|| check.equal(|| Some(1), Some(2)));

    let failure = failure.expect("mismatch should be captured");
    let mentions_both = predicate::str::contains("1").and(predicate::str::contains("2"));
    assert!(mentions_both.eval(&failure.message));
    assert!(sink.borrow().is_empty());
}

#[test]
fn passing_body_reports_a_meta_failure() {
    let (harness, sink) = intercepted();
    let check = harness.asserter();

    assert!(harness.capture(|| check.equal(|| Some(1), Some(1))).is_none());
    assert_eq!(messages(&sink), vec!["expected the assertion to fail".to_string()]);
}

#[test]
fn meta_failure_is_located_at_the_capture_call() {
    let (harness, sink) = intercepted();
    let line = line!() + 1;
    harness.capture(|| ());
    let location = sink.borrow().failures()[0].location.clone();
    assert!(location.file.ends_with("harness_tests.rs"));
    assert_eq!(location.line, line);
}

#[test]
fn reports_resume_forwarding_after_the_scope() {
    let (harness, sink) = intercepted();
    let check = harness.asserter();

    harness.capture(|| check.present(|| None::<i32>));
    assert!(!harness.is_capturing());
    check.present(|| None::<i32>);

    assert_eq!(messages(&sink), vec!["is nil".to_string()]);
}

#[test]
fn every_failure_in_a_scope_is_queued() {
    let (harness, sink) = intercepted();
    let check = harness.asserter();

    let failures = harness.capture_all(|| {
        check.equal(|| Some(1), Some(2));
        check.equal(|| Some(3), Some(4));
    });
    let texts: Vec<_> = failures.iter().map(|failure| failure.message.as_str()).collect();
    assert_eq!(texts, vec!["1 did not match 2", "3 did not match 4"]);

    let first = harness.capture(|| {
        check.equal(|| Some(5), Some(6));
        check.equal(|| Some(7), Some(8));
    });
    assert_eq!(first.map(|failure| failure.message), Some("5 did not match 6".to_string()));
    assert!(sink.borrow().is_empty());
}

#[test]
fn nested_capture_leaves_the_outer_capture_active() {
    let (harness, sink) = intercepted();
    let check = harness.asserter();

    let outer = harness.capture_all(|| {
        let inner = harness.capture(|| check.equal(|| Some('a'), Some('b')));
        assert!(inner.is_some());
        assert!(harness.is_capturing());
        check.equal(|| Some('c'), Some('d'));
    });

    let texts: Vec<_> = outer.iter().map(|failure| failure.message.as_str()).collect();
    assert_eq!(texts, vec!["'c' did not match 'd'"]);
    assert!(!harness.is_capturing());
    assert!(sink.borrow().is_empty());
}

#[test]
fn inner_meta_failure_is_seen_by_the_outer_capture() {
    let (harness, sink) = intercepted();
    let check = harness.asserter();

    let outer = harness.capture(|| harness.capture(|| check.equal(|| Some(1), Some(1))));

    assert_eq!(
        outer.map(|failure| failure.message),
        Some("expected the assertion to fail".to_string())
    );
    assert!(sink.borrow().is_empty());
}

#[test]
fn body_error_is_not_an_intercepted_failure() {
    let (harness, sink) = intercepted();
    let check = harness.asserter();

    let seen = harness.try_capture(|| {
        check.equal(|| Some(1), Some(2));
        Err::<(), _>("fixture missing")
    });

    assert!(seen.is_none());
    assert_eq!(messages(&sink), vec!["error: fixture missing".to_string()]);
    assert!(!harness.is_capturing());
}

#[test]
fn try_capture_with_ok_body_behaves_like_capture() {
    let (harness, _sink) = intercepted();
    let check = harness.asserter();

    let seen = harness.try_capture(|| -> Result<(), String> {
        check.absent(|| Some(1));
        Ok(())
    });
    assert_eq!(seen.map(|failure| failure.message), Some("1 is not nil".to_string()));
}

#[test]
fn panicking_body_restores_the_flag() {
    let (harness, sink) = intercepted();
    harness.capture(|| panic!("fixture exploded"));

    assert!(!harness.is_capturing());
    assert_eq!(messages(&sink), vec!["error: fixture exploded".to_string()]);
}

#[test]
fn explicit_locations_survive_capture() {
    let (harness, _sink) = intercepted();
    let check = harness.asserter();

    let failure = harness
        .capture(|| {
            check
                .check()
                .at(SourceLocation::new("fixtures/orders.rs", 12))
                .equal(|| Some(10), Some(11))
        })
        .expect("mismatch should be captured");
    assert_eq!(failure.location.to_string(), "fixtures/orders.rs:12");
}

#[test]
fn harness_in_front_of_a_test_scope() {
    let scope = TestScope::with_config(ReportConfig::quiet());
    let harness = scope.interceptor();
    let check = harness.asserter();

    harness.capture(|| check.equal(|| Some(1), Some(2)));
    assert_eq!(scope.failure_count(), 0);

    harness.capture(|| check.equal(|| Some(1), Some(1)));
    assert_eq!(scope.failure_count(), 1);
    assert!(scope.finish().is_err());
}

#[test]
fn outer_failures_survive_a_nested_capture() {
    let (harness, sink) = intercepted();
    let check = harness.asserter();

    let outer = harness.capture_all(|| {
        check.equal(|| Some("before"), Some("other"));
        let inner = harness.capture(|| check.equal(|| Some(1), Some(2)));
        assert_eq!(inner.map(|failure| failure.message), Some("1 did not match 2".to_string()));
        check.equal(|| Some("after"), Some("other"));
    });

    let texts: Vec<_> = outer.iter().map(|failure| failure.message.as_str()).collect();
    assert_eq!(
        texts,
        vec![
            "\"before\" did not match \"other\"",
            "\"after\" did not match \"other\"",
        ]
    );
    assert!(sink.borrow().is_empty());
}

#[test]
fn custom_failure_can_be_captured() {
    let (harness, sink) = intercepted();
    let check = harness.asserter();

    let failure = harness.capture(|| check.failed("handshake never completed"));
    assert!(failure.expect("custom failure should be captured").mentions("handshake"));
    assert!(sink.borrow().is_empty());
}

#[test]
fn configured_asserter_routes_through_the_harness() {
    let (harness, _sink) = intercepted();
    let check = harness.asserter_with_config(&ReportConfig::quiet().with_detail(false));

    let failure = harness
        .capture(|| check.equal_sequence(|| Some(vec![1, 2]), Some(vec![2, 1])))
        .expect("mismatch should be captured");
    assert_eq!(failure.message, "[1, 2] did not match [2, 1]");
}
