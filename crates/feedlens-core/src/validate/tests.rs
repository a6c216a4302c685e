// crates/feedlens-core/src/validate/tests.rs
// ============================================================================
// Module: Shape Validator Unit Tests
// Description: Unit coverage for contract interpretation.
// Purpose: Ensure malformed payloads are rejected with precise field paths.
// Dependencies: feedlens-core, serde_json
// ============================================================================

//! ## Overview
//! Exercises presence, kind, range, tuple, record, and empty-list rules.

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

use serde_json::Value;
use serde_json::json;

use super::FieldViolation;
use super::ValidationOutcome;
use super::ViolationReason;
use super::validate;
use crate::resource::ResourceKind;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Minimal valid word cloud payload.
fn word_cloud() -> Value {
    json!({
        "metadata": {
            "username": "acme",
            "total_words": 10,
            "unique_words": 2,
            "top_words_count": 2,
            "generated_at": "2024-05-01T12:00:00Z"
        },
        "word_frequencies": {"coffee": 6, "beans": 4},
        "word_frequencies_list": [
            {"word": "coffee", "frequency": 6, "relative_frequency": 0.6},
            {"word": "beans", "frequency": 4, "relative_frequency": 0.4}
        ]
    })
}

/// Minimal valid image analysis payload.
fn image_analysis() -> Value {
    json!({
        "username": "acme",
        "total_posts_analyzed": 1,
        "posts_analyzed": [{
            "post_id": "p1",
            "caption": "morning roast",
            "post_type": "image",
            "images": [{
                "file_name": "p1.jpg",
                "object_path": "acme/p1.jpg",
                "gpt4o_analysis": "a cup of coffee",
                "color_palette": [
                    {"rgb": [120, 80, 40], "proportion": 0.7},
                    {"rgb": [250, 250, 250], "proportion": 0.3}
                ]
            }]
        }]
    })
}

/// Returns the violations of an invalid outcome.
fn violations(outcome: ValidationOutcome) -> Vec<FieldViolation> {
    match outcome {
        ValidationOutcome::Invalid(violations) => violations,
        ValidationOutcome::Valid(payload) => panic!("expected rejection, got {payload:?}"),
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn accepts_well_formed_word_cloud() {
    let outcome = validate(ResourceKind::WordCloud, &word_cloud());
    let ValidationOutcome::Valid(payload) = outcome else {
        panic!("expected valid payload");
    };
    assert_eq!(payload.resource, ResourceKind::WordCloud);
    assert!(!payload.no_data);
    assert_eq!(payload.body, word_cloud());
}

#[test]
fn rejects_missing_metadata() {
    let mut body = word_cloud();
    body.as_object_mut().unwrap().remove("metadata");
    let found = violations(validate(ResourceKind::WordCloud, &body));
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].path, "metadata");
    assert_eq!(found[0].reason, ViolationReason::Missing);
}

#[test]
fn null_counts_as_missing_for_required_fields() {
    let mut body = word_cloud();
    body["metadata"]["generated_at"] = Value::Null;
    let found = violations(validate(ResourceKind::WordCloud, &body));
    assert_eq!(found[0].path, "metadata.generated_at");
    assert_eq!(found[0].to_string(), "metadata.generated_at: required field is missing");
}

#[test]
fn rejects_empty_frequency_list() {
    let mut body = word_cloud();
    body["word_frequencies_list"] = json!([]);
    let found = violations(validate(ResourceKind::WordCloud, &body));
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].path, "word_frequencies_list");
    assert_eq!(found[0].reason, ViolationReason::EmptyCollection);
}

#[test]
fn reports_wrong_kind_with_expected_and_found() {
    let mut body = word_cloud();
    body["word_frequencies"] = json!(["coffee"]);
    let found = violations(validate(ResourceKind::WordCloud, &body));
    assert_eq!(
        found[0].reason,
        ViolationReason::WrongKind {
            expected: "object",
            found: "array"
        }
    );
}

#[test]
fn aggregates_violations_across_fields_in_contract_order() {
    let body = json!({"metadata": {"username": "acme"}, "word_frequencies": {}});
    let found = violations(validate(ResourceKind::WordCloud, &body));
    let paths: Vec<_> = found.iter().map(|violation| violation.path.as_str()).collect();
    assert_eq!(
        paths,
        [
            "metadata.total_words",
            "metadata.unique_words",
            "metadata.top_words_count",
            "metadata.generated_at",
            "word_frequencies",
            "word_frequencies_list",
        ]
    );
}

#[test]
fn stops_at_first_failing_array_element() {
    let mut body = word_cloud();
    body["word_frequencies_list"][0]["frequency"] = json!(-1);
    body["word_frequencies_list"][1]["relative_frequency"] = json!(3.5);
    let found = violations(validate(ResourceKind::WordCloud, &body));
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].path, "word_frequencies_list[0].frequency");
}

#[test]
fn rejects_relative_frequency_above_one() {
    let mut body = word_cloud();
    body["word_frequencies_list"][1]["relative_frequency"] = json!(1.5);
    let found = violations(validate(ResourceKind::WordCloud, &body));
    assert_eq!(found[0].path, "word_frequencies_list[1].relative_frequency");
    assert!(matches!(found[0].reason, ViolationReason::OutOfRange { .. }));
}

#[test]
fn rejects_fractional_counts() {
    let mut body = word_cloud();
    body["metadata"]["total_words"] = json!(10.5);
    let found = violations(validate(ResourceKind::WordCloud, &body));
    assert_eq!(found[0].path, "metadata.total_words");
    assert!(matches!(found[0].reason, ViolationReason::OutOfRange { .. }));
}

#[test]
fn accepts_whole_number_floats_as_counts() {
    let body = json!({"username": "acme", "total_posts": 1.0, "posts": []});
    assert!(matches!(validate(ResourceKind::PostList, &body), ValidationOutcome::Valid(_)));

    let mut cloud = word_cloud();
    cloud["metadata"]["total_words"] = json!(10.0);
    cloud["word_frequencies"]["coffee"] = json!(6.0);
    assert!(matches!(validate(ResourceKind::WordCloud, &cloud), ValidationOutcome::Valid(_)));
}

#[test]
fn rejects_negative_whole_number_counts() {
    let body = json!({"username": "acme", "total_posts": -1.0, "posts": []});
    let found = violations(validate(ResourceKind::PostList, &body));
    assert_eq!(found[0].path, "total_posts");
    assert!(matches!(found[0].reason, ViolationReason::OutOfRange { .. }));
}

#[test]
fn accepts_whole_number_float_color_channels() {
    let mut body = image_analysis();
    body["posts_analyzed"][0]["images"][0]["color_palette"][0]["rgb"] = json!([255.0, 0.0, 7]);
    assert!(matches!(validate(ResourceKind::ImageAnalysis, &body), ValidationOutcome::Valid(_)));
}

#[test]
fn rejects_blank_words() {
    let mut body = word_cloud();
    body["word_frequencies_list"][0]["word"] = json!("   ");
    let found = violations(validate(ResourceKind::WordCloud, &body));
    assert_eq!(found[0].reason, ViolationReason::EmptyString);
}

#[test]
fn rejects_non_object_root() {
    let found = violations(validate(ResourceKind::Statistics, &json!([1, 2])));
    assert_eq!(found[0].path, "$");
}

#[test]
fn checks_nested_palette_paths() {
    let mut body = image_analysis();
    body["posts_analyzed"][0]["images"][0]["color_palette"][1]["rgb"] = json!([1, 2]);
    let found = violations(validate(ResourceKind::ImageAnalysis, &body));
    assert_eq!(found[0].path, "posts_analyzed[0].images[0].color_palette[1].rgb");
    assert_eq!(
        found[0].reason,
        ViolationReason::WrongLength {
            expected: 3,
            found: 2
        }
    );
}

#[test]
fn rejects_color_channels_outside_byte_range() {
    let mut body = image_analysis();
    body["posts_analyzed"][0]["images"][0]["color_palette"][0]["rgb"] = json!([12, 300, 0]);
    let found = violations(validate(ResourceKind::ImageAnalysis, &body));
    assert_eq!(found[0].path, "posts_analyzed[0].images[0].color_palette[0].rgb[1]");
}

#[test]
fn empty_post_list_is_valid_with_no_data() {
    let body = json!({"username": "acme", "total_posts": 0, "posts": []});
    let ValidationOutcome::Valid(payload) = validate(ResourceKind::PostList, &body) else {
        panic!("empty post list must be accepted");
    };
    assert!(payload.no_data);
}

#[test]
fn empty_image_analysis_is_valid_with_no_data() {
    let body = json!({"username": "acme", "total_posts_analyzed": 0, "posts_analyzed": []});
    let outcome = validate(ResourceKind::ImageAnalysis, &body);
    assert!(outcome.is_valid());
    assert!(outcome.violations().is_empty());
}

#[test]
fn optional_fields_are_checked_when_present() {
    let body = json!({
        "global_analysis": {
            "summary": "steady growth",
            "total_posts_analyzed": 1,
            "total_batches": 1,
            "model_used": "gpt-4o",
            "generated_at": 17
        },
        "batch_analyses": [{
            "batch_number": 1,
            "post_ids": ["p1"],
            "analysis": "coffee heavy",
            "model_used": "gpt-4o"
        }],
        "detailed_posts": []
    });
    let found = violations(validate(ResourceKind::FeedAnalysis, &body));
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].path, "global_analysis.generated_at");
}

#[test]
fn violations_serialize_with_reason_tag() {
    let violation = FieldViolation {
        path: "posts".to_string(),
        reason: ViolationReason::EmptyCollection,
    };
    let json = serde_json::to_value(&violation).unwrap();
    assert_eq!(json, json!({"path": "posts", "reason": "empty_collection"}));
}
