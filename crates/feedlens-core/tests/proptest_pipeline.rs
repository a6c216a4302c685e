// crates/feedlens-core/tests/proptest_pipeline.rs
// ============================================================================
// Module: Pipeline Property-Based Tests
// Description: Property tests for classifier robustness and validator stability.
// Purpose: Detect panics and nondeterminism across arbitrary payloads.
// ============================================================================

//! Property-based tests for the classifier and shape validator.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use feedlens_core::FetchErrorKind;
use feedlens_core::RawResponse;
use feedlens_core::ResourceKind;
use feedlens_core::ValidationOutcome;
use feedlens_core::check_body;
use feedlens_core::classify;
use feedlens_core::validate;
use proptest::prelude::*;
use serde_json::Value;

/// Strategy producing arbitrary JSON values.
fn json_value_strategy(max_depth: u32) -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|v| Value::Number(v.into())),
        any::<f64>()
            .prop_filter("finite", |v| v.is_finite())
            .prop_map(|v| serde_json::Number::from_f64(v).map_or(Value::Null, Value::Number)),
        ".*".prop_map(Value::String),
    ];

    leaf.prop_recursive(max_depth, 64, 8, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0 .. 4).prop_map(Value::Array),
            prop::collection::btree_map(
                prop_oneof![
                    Just("error".to_string()),
                    Just("detail".to_string()),
                    Just("message".to_string()),
                    Just("available_ids".to_string()),
                    "[a-z]{1,6}",
                ],
                inner,
                0 .. 4
            )
            .prop_map(|map| Value::Object(map.into_iter().collect())),
        ]
    })
}

/// Strategy producing a resource kind.
fn resource_strategy() -> impl Strategy<Value = ResourceKind> {
    prop::sample::select(ResourceKind::ALL.to_vec())
}

/// Expected error kind for a non-success status.
const fn status_kind(status: u16) -> FetchErrorKind {
    match status {
        401 => FetchErrorKind::Unauthorized,
        404 => FetchErrorKind::NotFound,
        _ => FetchErrorKind::ServerError,
    }
}

proptest! {
    #[test]
    fn arbitrary_error_bodies_keep_the_status_class(
        resource in resource_strategy(),
        status in prop_oneof![Just(401_u16), Just(404_u16), 300_u16 .. 400, 400_u16 .. 600],
        body in json_value_strategy(3),
    ) {
        let response = RawResponse::json(status, body.to_string());
        let error = classify(resource, "acme", Ok(response)).unwrap_err();
        prop_assert_eq!(error.kind, status_kind(status));
        prop_assert!(!error.message.is_empty());
    }

    #[test]
    fn arbitrary_error_bytes_never_panic(
        status in 400_u16 .. 600,
        bytes in prop::collection::vec(any::<u8>(), 0 .. 512),
    ) {
        let response = RawResponse {
            status,
            status_text: String::new(),
            content_type: None,
            body: bytes,
        };
        let error = classify(ResourceKind::PostList, "acme", Ok(response)).unwrap_err();
        prop_assert_eq!(error.kind, status_kind(status));
    }

    #[test]
    fn validation_is_idempotent(resource in resource_strategy(), body in json_value_strategy(4)) {
        let first = validate(resource, &body);
        let second = validate(resource, &body);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn arbitrary_bodies_are_never_partially_accepted(
        resource in resource_strategy(),
        body in json_value_strategy(4),
    ) {
        match validate(resource, &body) {
            ValidationOutcome::Valid(_) => prop_assert!(check_body(resource, body).is_ok()),
            ValidationOutcome::Invalid(violations) => prop_assert!(!violations.is_empty()),
        }
    }
}
