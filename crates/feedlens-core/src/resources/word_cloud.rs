// crates/feedlens-core/src/resources/word_cloud.rs
// ============================================================================
// Module: Word Cloud Resource
// Description: Typed word frequency payload and its consistency checks.
// Purpose: Catch lookup/list drift in word frequency data.
// Dependencies: crate::consistency, serde
// ============================================================================

//! ## Overview
//! The word cloud carries the same frequencies twice: a `word -> frequency`
//! lookup and an ordered list. The consistency pass cross-references the two
//! and checks the metadata counters against them.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;

use super::Resource;
use crate::consistency::ConsistencyReport;
use crate::consistency::mean;
use crate::resource::ResourceKind;

// ============================================================================
// SECTION: Payload
// ============================================================================

/// Word frequency cloud for one account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordCloud {
    /// Generation metadata.
    pub metadata: WordCloudMetadata,
    /// Frequency lookup keyed by word.
    pub word_frequencies: BTreeMap<String, f64>,
    /// Frequencies ordered for display.
    pub word_frequencies_list: Vec<WordFrequency>,
}

/// Word cloud generation metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordCloudMetadata {
    /// Account the cloud was built for.
    pub username: String,
    /// Number of words counted across captions.
    pub total_words: u64,
    /// Number of distinct words in the lookup.
    pub unique_words: u64,
    /// Number of entries in the ordered list.
    pub top_words_count: u64,
    /// Generation timestamp.
    pub generated_at: String,
}

/// One ordered word frequency entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordFrequency {
    /// The word.
    pub word: String,
    /// Absolute frequency.
    pub frequency: f64,
    /// Frequency relative to the total.
    pub relative_frequency: f64,
}

// ============================================================================
// SECTION: Consistency
// ============================================================================

impl Resource for WordCloud {
    const KIND: ResourceKind = ResourceKind::WordCloud;

    fn analyze(&self) -> ConsistencyReport {
        let mut report = ConsistencyReport::new();
        let listed = report.check_duplicates(
            "word_frequencies_list",
            self.word_frequencies_list.iter().map(|entry| entry.word.as_str()),
        );
        let keyed: BTreeSet<&str> = self.word_frequencies.keys().map(String::as_str).collect();
        report.check_cross_reference(
            ("word_frequencies", &keyed),
            ("word_frequencies_list", &listed),
        );
        report.check_count_covers(
            "metadata.unique_words",
            self.metadata.unique_words,
            self.word_frequencies.len(),
        );
        report.check_count(
            "metadata.top_words_count",
            self.metadata.top_words_count,
            self.word_frequencies_list.len(),
        );
        report.check_date("metadata.generated_at", &self.metadata.generated_at);

        let list = &self.word_frequencies_list;
        let total: f64 = list.iter().map(|entry| entry.frequency).sum();
        let max = list.iter().map(|entry| entry.frequency).fold(0.0, f64::max);
        let letters: usize = list.iter().map(|entry| entry.word.chars().count()).sum();
        report.record_count("word_count", list.len());
        report.record_stat("total_frequency", total);
        report.record_stat("average_frequency", mean(total, list.len()));
        report.record_stat("max_frequency", max);
        #[allow(clippy::cast_precision_loss, reason = "Word lengths stay far below 2^52.")]
        report.record_stat("average_word_length", mean(letters as f64, list.len()));
        report
    }
}
