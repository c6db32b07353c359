//! Integration tests for Error types
//!
//! Tests error construction, display, context, and error kinds.

use ruleweave_foundation::{Error, ErrorContext, ErrorKind};

// =============================================================================
// Error Construction
// =============================================================================

#[test]
fn error_invalid_range() {
    let err = Error::invalid_range(20, 10);
    assert!(matches!(err.kind, ErrorKind::InvalidRange { .. }));
    let msg = format!("{err}");
    assert!(msg.contains("20"));
    assert!(msg.contains("10"));
}

#[test]
fn error_invalid_query() {
    let err = Error::invalid_query("needs a concrete event");
    assert!(matches!(err.kind, ErrorKind::InvalidQuery(_)));
    assert!(format!("{err}").contains("concrete"));
}

#[test]
fn error_unrecognized_token() {
    let err = Error::unrecognized_token("blaze");
    assert!(matches!(err.kind, ErrorKind::UnrecognizedToken(_)));
    assert!(format!("{err}").contains("blaze"));
}

#[test]
fn error_parse_reports_position() {
    let err = Error::parse("unexpected ')'", 4);
    let msg = format!("{err}");
    assert!(msg.contains('4'));
    assert!(msg.contains("unexpected"));
}

#[test]
fn pending_lookup_errors() {
    assert!(format!("{}", Error::new(ErrorKind::Timeout)).contains("timed out"));
    assert!(format!("{}", Error::new(ErrorKind::Interrupted)).contains("interrupted"));
}

// =============================================================================
// Error Classification
// =============================================================================

#[test]
fn only_evaluation_failures_are_evaluation_errors() {
    assert!(Error::new(ErrorKind::DivisionByZero).is_evaluation());
    assert!(Error::undefined_variable("level").is_evaluation());
    assert!(!Error::duplicate_value("spawner", "spawner").is_evaluation());
    assert!(!Error::new(ErrorKind::Timeout).is_evaluation());
}

// =============================================================================
// Error Context
// =============================================================================

#[test]
fn context_with_stack() {
    let ctx = ErrorContext::new()
        .with_section("drops")
        .with_key("zombie|fall")
        .with_frame("rule set");
    let msg = format!("{ctx}");
    assert!(msg.contains("at drops.zombie|fall"));
    assert!(msg.contains("in rule set"));
}

#[test]
fn context_section_only() {
    let ctx = ErrorContext::new().with_section("levels");
    assert_eq!(format!("{ctx}"), "in levels");
}

#[test]
fn error_keeps_attached_context() {
    let err = Error::invalid_range(9, 3).with_context(ErrorContext::new().with_key("9-3"));
    assert_eq!(err.context.and_then(|c| c.key).as_deref(), Some("9-3"));
}
