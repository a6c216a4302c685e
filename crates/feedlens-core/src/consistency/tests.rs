// crates/feedlens-core/src/consistency/tests.rs
// ============================================================================
// Module: Consistency Report Unit Tests
// Description: Unit coverage for the generic consistency checks.
// Purpose: Ensure findings are precise and statistics stay non-negative.
// Dependencies: feedlens-core
// ============================================================================

//! ## Overview
//! Covers cross reference, counts, duplicates, dates, and stat clamping.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::float_cmp,
    reason = "Test-only panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use super::ConsistencyReport;
use super::WarningKind;
use super::mean;
use super::parse_timestamp;

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn cross_reference_warns_once_per_mismatched_key() {
    let mut report = ConsistencyReport::new();
    let lookup: BTreeSet<&str> = ["coffee", "beans", "latte"].into_iter().collect();
    let list: BTreeSet<&str> = ["coffee", "beans", "mocha"].into_iter().collect();
    report.check_cross_reference(("word_frequencies", &lookup), ("word_frequencies_list", &list));
    let keys: Vec<_> = report
        .warnings_of(WarningKind::DuplicateOrMissingEntry)
        .map(|warning| warning.keys[0].as_str())
        .collect();
    assert_eq!(keys, ["latte", "mocha"]);
    assert_eq!(report.warnings.len(), 2);
}

#[test]
fn matching_counts_are_silent() {
    let mut report = ConsistencyReport::new();
    report.check_count("total_batches", 3, 3);
    assert!(!report.has_warnings());
    report.check_count("total_batches", 4, 3);
    let warning = &report.warnings[0];
    assert_eq!(warning.kind, WarningKind::CountMismatch);
    assert_eq!(warning.message, "total_batches reports 4 but 3 were found");
}

#[test]
fn covering_counts_only_warn_when_too_low() {
    let mut report = ConsistencyReport::new();
    report.check_count_covers("unique_words", 3, 3);
    report.check_count_covers("unique_words", 50, 3);
    assert!(!report.has_warnings());
    report.check_count_covers("unique_words", 2, 3);
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].kind, WarningKind::CountMismatch);
    assert_eq!(report.warnings[0].message, "unique_words reports 2 but 3 were found");
}

#[test]
fn duplicates_produce_a_single_warning() {
    let mut report = ConsistencyReport::new();
    let distinct = report.check_duplicates("posts", ["p1", "p2", "p1", "p3", "p2", "p1"]);
    assert_eq!(distinct.len(), 3);
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].keys, ["p1", "p2"]);
}

#[test]
fn accepts_common_timestamp_shapes() {
    for value in [
        "2024-05-01T12:00:00Z",
        "2024-05-01T12:00:00+02:00",
        "2024-05-01T12:00:00.123456",
        "2024-05-01T12:00:00",
        "2024-05-01 12:00:00",
        "2024-05-01",
    ] {
        assert!(parse_timestamp(value).is_some(), "{value} should parse");
    }
}

#[test]
fn unparseable_dates_warn() {
    let mut report = ConsistencyReport::new();
    report.check_date("metadata.generated_at", "yesterday");
    report.check_date("metadata.generated_at", "2024-02-30");
    assert_eq!(report.warnings_of(WarningKind::DateUnparseable).count(), 2);
}

#[test]
fn stats_are_clamped_to_non_negative() {
    let mut report = ConsistencyReport::new();
    report.record_stat("negative", -2.0);
    report.record_stat("nan", f64::NAN);
    report.record_stat("ratio", 0.25);
    report.record_count("posts", 4);
    assert_eq!(report.stat("negative"), Some(0.0));
    assert_eq!(report.stat("nan"), Some(0.0));
    assert_eq!(report.stat("ratio"), Some(0.25));
    assert_eq!(report.stat("posts"), Some(4.0));
    assert_eq!(report.stat("missing"), None);
}

#[test]
fn mean_of_empty_population_is_zero() {
    assert_eq!(mean(10.0, 0), 0.0);
    assert_eq!(mean(10.0, 4), 2.5);
}
