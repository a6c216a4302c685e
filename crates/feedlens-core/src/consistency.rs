// crates/feedlens-core/src/consistency.rs
// ============================================================================
// Module: Consistency Report
// Description: Non-fatal cross-field findings and derived statistics.
// Purpose: Surface silently corrupt data without failing the call.
// Dependencies: serde, time
// ============================================================================

//! ## Overview
//! A [`ConsistencyReport`] collects [`ConsistencyWarning`] values and a map of
//! derived statistics. Resource payloads fill it through the generic checks in
//! this module (cross reference, count coherence, duplicates, date sanity).
//! Invariants:
//! - Warnings never cause rejection.
//! - Every recorded statistic is finite and non-negative.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use serde::Serialize;
use time::Date;
use time::OffsetDateTime;
use time::PrimitiveDateTime;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;

// ============================================================================
// SECTION: Warnings
// ============================================================================

/// Category of a consistency finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// The same identifier appears more than once.
    DuplicateIdentifier,
    /// A reported total disagrees with the entries present.
    CountMismatch,
    /// A timestamp could not be parsed.
    DateUnparseable,
    /// A lookup key and its parallel list disagree.
    DuplicateOrMissingEntry,
    /// Palette proportions sum to more than one.
    ProportionDrift,
}

impl WarningKind {
    /// Returns the stable label for the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DuplicateIdentifier => "duplicate_identifier",
            Self::CountMismatch => "count_mismatch",
            Self::DateUnparseable => "date_unparseable",
            Self::DuplicateOrMissingEntry => "duplicate_or_missing_entry",
            Self::ProportionDrift => "proportion_drift",
        }
    }
}

/// One non-fatal finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsistencyWarning {
    /// Finding category.
    pub kind: WarningKind,
    /// Human-readable description.
    pub message: String,
    /// Offending keys or identifiers.
    pub keys: Vec<String>,
}

// ============================================================================
// SECTION: Report
// ============================================================================

/// Findings and derived statistics for one validated payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConsistencyReport {
    /// Findings in detection order.
    pub warnings: Vec<ConsistencyWarning>,
    /// Derived aggregates keyed by name.
    pub stats: BTreeMap<String, f64>,
}

impl ConsistencyReport {
    /// Creates an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a warning.
    pub fn warn(&mut self, kind: WarningKind, message: impl Into<String>, keys: Vec<String>) {
        self.warnings.push(ConsistencyWarning {
            kind,
            message: message.into(),
            keys,
        });
    }

    /// Records a statistic, clamping non-finite or negative values to zero.
    pub fn record_stat(&mut self, name: &str, value: f64) {
        let value = if value.is_finite() && value > 0.0 { value } else { 0.0 };
        self.stats.insert(name.to_string(), value);
    }

    /// Records a count statistic.
    #[allow(clippy::cast_precision_loss, reason = "Payload counts stay far below 2^52.")]
    pub fn record_count(&mut self, name: &str, value: usize) {
        self.record_stat(name, value as f64);
    }

    /// Returns a statistic by name.
    #[must_use]
    pub fn stat(&self, name: &str) -> Option<f64> {
        self.stats.get(name).copied()
    }

    /// Returns true when at least one warning was recorded.
    #[must_use]
    pub const fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Returns the warnings of one kind.
    pub fn warnings_of(&self, kind: WarningKind) -> impl Iterator<Item = &ConsistencyWarning> {
        self.warnings.iter().filter(move |warning| warning.kind == kind)
    }

    /// Warns once per key present in only one of the two key sets.
    ///
    /// `lookup` names the keyed map and `list` names the parallel list.
    pub fn check_cross_reference<'a>(
        &mut self,
        lookup: (&str, &BTreeSet<&'a str>),
        list: (&str, &BTreeSet<&'a str>),
    ) {
        let (lookup_name, lookup_keys) = lookup;
        let (list_name, list_keys) = list;
        for key in lookup_keys.difference(list_keys) {
            self.warn(
                WarningKind::DuplicateOrMissingEntry,
                format!("\"{key}\" is present in {lookup_name} but missing from {list_name}"),
                vec![(*key).to_string()],
            );
        }
        for key in list_keys.difference(lookup_keys) {
            self.warn(
                WarningKind::DuplicateOrMissingEntry,
                format!("\"{key}\" is present in {list_name} but missing from {lookup_name}"),
                vec![(*key).to_string()],
            );
        }
    }

    /// Warns when a reported count disagrees with the observed count.
    pub fn check_count(&mut self, label: &str, reported: u64, actual: usize) {
        if u64::try_from(actual).ok() != Some(reported) {
            self.warn(
                WarningKind::CountMismatch,
                format!("{label} reports {reported} but {actual} were found"),
                vec![label.to_string()],
            );
        }
    }

    /// Warns when a reported count is lower than the observed count.
    ///
    /// Used for totals that may legitimately cover more entries than the
    /// payload carries.
    pub fn check_count_covers(&mut self, label: &str, reported: u64, observed: usize) {
        if u64::try_from(observed).is_ok_and(|observed| reported < observed) {
            self.warn(
                WarningKind::CountMismatch,
                format!("{label} reports {reported} but {observed} were found"),
                vec![label.to_string()],
            );
        }
    }

    /// Warns once when identifiers repeat; returns the distinct identifiers.
    pub fn check_duplicates<'a, I>(&mut self, label: &str, ids: I) -> BTreeSet<&'a str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut seen = BTreeSet::new();
        let mut repeated = BTreeSet::new();
        for id in ids {
            if !seen.insert(id) {
                repeated.insert(id);
            }
        }
        if !repeated.is_empty() {
            let keys: Vec<String> = repeated.iter().map(|id| (*id).to_string()).collect();
            self.warn(
                WarningKind::DuplicateIdentifier,
                format!("{label} contains repeated identifiers: {}", keys.join(", ")),
                keys,
            );
        }
        seen
    }

    /// Warns when a timestamp field cannot be parsed.
    pub fn check_date(&mut self, field: &str, value: &str) {
        if parse_timestamp(value).is_none() {
            self.warn(
                WarningKind::DateUnparseable,
                format!("{field} is not a recognizable timestamp: \"{value}\""),
                vec![field.to_string()],
            );
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Parses RFC 3339, naive ISO 8601 date-times, or date-only values.
///
/// Naive values are interpreted as UTC.
#[must_use]
pub fn parse_timestamp(value: &str) -> Option<OffsetDateTime> {
    let value = value.trim();
    if let Ok(parsed) = OffsetDateTime::parse(value, &Rfc3339) {
        return Some(parsed);
    }
    let naive_formats = [
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]"),
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond]"),
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
    ];
    if let Some(parsed) =
        naive_formats.iter().find_map(|format| PrimitiveDateTime::parse(value, format).ok())
    {
        return Some(parsed.assume_utc());
    }
    Date::parse(value, format_description!("[year]-[month]-[day]"))
        .ok()
        .map(|date| date.midnight().assume_utc())
}

/// Returns `sum / count`, or zero for an empty population.
#[must_use]
#[allow(clippy::cast_precision_loss, reason = "Payload counts stay far below 2^52.")]
pub fn mean(sum: f64, count: usize) -> f64 {
    if count == 0 { 0.0 } else { sum / count as f64 }
}

#[cfg(test)]
mod tests;
