// crates/feedlens-core/src/error/tests.rs
// ============================================================================
// Module: Fetch Error Unit Tests
// Description: Unit coverage for error construction and excerpts.
// Purpose: Keep display messages and operator detail stable.
// Dependencies: feedlens-core, serde_json
// ============================================================================

//! ## Overview
//! Covers schema violation message assembly and body excerpt truncation.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    reason = "Test-only panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::json;

use super::BODY_EXCERPT_CHARS;
use super::ErrorDetail;
use super::FetchError;
use super::FetchErrorKind;
use super::excerpt;
use crate::validate::FieldViolation;
use crate::validate::ViolationReason;

/// Builds a missing-field violation at `path`.
fn missing(path: &str) -> FieldViolation {
    FieldViolation {
        path: path.to_string(),
        reason: ViolationReason::Missing,
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn schema_message_quotes_first_three_violations() {
    let violations = vec![missing("a"), missing("b"), missing("c"), missing("d"), missing("e")];
    let error = FetchError::schema("word cloud", violations);
    assert_eq!(error.kind, FetchErrorKind::SchemaViolation);
    assert_eq!(
        error.to_string(),
        "The word cloud response did not match the expected shape: a: required field is missing; \
         b: required field is missing; c: required field is missing (and 2 more)"
    );
    assert_eq!(error.violations().len(), 5);
}

#[test]
fn schema_message_without_violations_is_plain() {
    let error = FetchError::schema("post list", Vec::new());
    assert_eq!(error.message, "The post list response did not match the expected shape");
    assert!(error.violations().is_empty());
}

#[test]
fn excerpt_truncates_on_character_boundaries() {
    let body = "é".repeat(BODY_EXCERPT_CHARS + 10);
    let text = excerpt(body.as_bytes()).unwrap();
    assert_eq!(text.chars().count(), BODY_EXCERPT_CHARS);
}

#[test]
fn blank_bodies_have_no_excerpt() {
    assert_eq!(excerpt(b"  \n"), None);
    assert_eq!(ErrorDetail::for_response(502, b"").body_excerpt, None);
}

#[test]
fn serialized_error_carries_kind_label() {
    let error = FetchError::new(FetchErrorKind::NotFound, "missing")
        .with_detail(ErrorDetail::for_response(404, b"{\"error\":\"nope\"}"));
    let value = serde_json::to_value(&error).unwrap();
    assert_eq!(
        value,
        json!({
            "kind": "not_found",
            "message": "missing",
            "detail": {"status": 404, "body_excerpt": "{\"error\":\"nope\"}"}
        })
    );
    assert_eq!(FetchErrorKind::InvalidRequest.as_str(), "invalid_request");
}
