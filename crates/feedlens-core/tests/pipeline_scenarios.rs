// crates/feedlens-core/tests/pipeline_scenarios.rs
// ============================================================================
// Module: Pipeline Scenario Tests
// Description: End-to-end scenarios over the network-free pipeline stages.
// Purpose: Exercise classify, validate, decode, and analyze together.
// ============================================================================

//! Scenario tests chaining the status classifier with typed decoding.

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
    reason = "Test-only output and panic-based assertions are permitted."
)]

use feedlens_core::FeedAnalysis;
use feedlens_core::FetchError;
use feedlens_core::FetchErrorKind;
use feedlens_core::ImageAnalysis;
use feedlens_core::RawResponse;
use feedlens_core::Resource;
use feedlens_core::ResourceKind;
use feedlens_core::Validated;
use feedlens_core::ValidationOutcome;
use feedlens_core::ViolationReason;
use feedlens_core::WarningKind;
use feedlens_core::WordCloud;
use feedlens_core::classify;
use feedlens_core::decode;
use feedlens_core::validate;
use serde_json::json;

/// Runs classify then decode for a JSON response.
fn run<R: Resource>(id: &str, status: u16, body: &str) -> Result<Validated<R>, FetchError> {
    let value = classify(R::KIND, id, Ok(RawResponse::json(status, body)))?;
    decode::<R>(value)
}

#[test]
fn scenario_word_cloud_not_found_mentions_identifier() {
    let error = run::<WordCloud>("acme", 404, r#"{"error": "No such account"}"#).unwrap_err();
    assert_eq!(error.kind, FetchErrorKind::NotFound);
    assert!(error.message.contains("\"acme\""), "{}", error.message);
}

#[test]
fn scenario_empty_frequency_list_is_invalid() {
    let body = json!({
        "metadata": {
            "username": "acme",
            "total_words": 0,
            "unique_words": 1,
            "top_words_count": 0,
            "generated_at": "2024-05-01T12:00:00Z"
        },
        "word_frequencies": {"coffee": 1},
        "word_frequencies_list": []
    });
    let ValidationOutcome::Invalid(violations) = validate(ResourceKind::WordCloud, &body) else {
        panic!("expected invalid outcome");
    };
    assert_eq!(violations[0].path, "word_frequencies_list");
    assert_eq!(violations[0].reason, ViolationReason::EmptyCollection);
    assert_eq!(violations[0].reason.to_string(), "non-empty list required");

    let error = run::<WordCloud>("acme", 200, &body.to_string()).unwrap_err();
    assert_eq!(error.kind, FetchErrorKind::SchemaViolation);
}

#[test]
fn scenario_batch_count_mismatch_is_a_warning() {
    let body = json!({
        "global_analysis": {
            "summary": "Mostly coffee.",
            "total_posts_analyzed": 3,
            "total_batches": 4,
            "model_used": "gpt-4o"
        },
        "batch_analyses": [
            {"batch_number": 1, "post_ids": ["a"], "analysis": "one", "model_used": "gpt-4o"},
            {"batch_number": 2, "post_ids": ["b"], "analysis": "two", "model_used": "gpt-4o"},
            {"batch_number": 3, "post_ids": ["c"], "analysis": "three", "model_used": "gpt-4o"}
        ],
        "detailed_posts": []
    });
    let validated = run::<FeedAnalysis>("acme", 200, &body.to_string()).unwrap();
    assert_eq!(validated.report.warnings.len(), 1);
    let warning = &validated.report.warnings[0];
    assert_eq!(warning.kind, WarningKind::CountMismatch);
    assert!(warning.message.contains("batches"), "{}", warning.message);
    assert_eq!(validated.payload.batch_analyses.len(), 3);
}

#[test]
fn scenario_palette_proportion_out_of_range_is_invalid() {
    let body = json!({
        "username": "acme",
        "total_posts_analyzed": 1,
        "posts_analyzed": [{
            "post_id": "p1",
            "caption": "sunset",
            "post_type": "image",
            "images": [{
                "file_name": "p1.jpg",
                "object_path": "acme/p1.jpg",
                "gpt4o_analysis": "orange sky",
                "color_palette": [{"rgb": [250, 120, 10], "proportion": 1.4}]
            }]
        }]
    });
    let error = run::<ImageAnalysis>("acme", 200, &body.to_string()).unwrap_err();
    assert_eq!(error.kind, FetchErrorKind::SchemaViolation);
    let violation = &error.violations()[0];
    assert_eq!(violation.path, "posts_analyzed[0].images[0].color_palette[0].proportion");
    assert!(error.message.contains("1.4"), "{}", error.message);
}

#[test]
fn unauthorized_short_circuits_before_validation() {
    let error = run::<WordCloud>("acme", 401, r#"{"detail": "token expired"}"#).unwrap_err();
    assert_eq!(error.kind, FetchErrorKind::Unauthorized);
    assert_eq!(error.message, "Not authorized to access word cloud: token expired");
}
