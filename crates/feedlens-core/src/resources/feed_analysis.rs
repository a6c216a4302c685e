// crates/feedlens-core/src/resources/feed_analysis.rs
// ============================================================================
// Module: Feed Analysis Resource
// Description: Typed batched feed analysis payload and its consistency checks.
// Purpose: Catch batch bookkeeping drift in language-model feed analysis.
// Dependencies: crate::consistency, serde
// ============================================================================

//! ## Overview
//! Feed analysis groups posts into numbered batches, each analyzed by a
//! model, and summarizes them globally. The consistency pass checks the global
//! counters against the batches and cross-references batch post ids with the
//! detailed posts when those are present.

// ============================================================================
// SECTION: Imports
// ============================================================================

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

/// Batched language-model analysis of an account feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedAnalysis {
    /// Summary across all batches.
    pub global_analysis: GlobalAnalysis,
    /// Per-batch analyses.
    pub batch_analyses: Vec<BatchAnalysis>,
    /// Posts referenced by the batches.
    pub detailed_posts: Vec<DetailedPost>,
}

/// Summary across all batches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalAnalysis {
    /// Summary text.
    pub summary: String,
    /// Number of distinct posts analyzed.
    pub total_posts_analyzed: u64,
    /// Number of batches.
    pub total_batches: u64,
    /// Model that produced the summary.
    pub model_used: String,
    /// Generation timestamp, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<String>,
}

/// Analysis of one batch of posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchAnalysis {
    /// Batch number.
    pub batch_number: u64,
    /// Posts in the batch.
    pub post_ids: Vec<String>,
    /// Analysis text.
    pub analysis: String,
    /// Model that produced the analysis.
    pub model_used: String,
}

/// Post referenced by a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailedPost {
    /// Post identifier.
    pub post_id: String,
    /// Post caption.
    pub caption: String,
    /// Storage path of the post media.
    pub object_path: String,
}

// ============================================================================
// SECTION: Consistency
// ============================================================================

impl Resource for FeedAnalysis {
    const KIND: ResourceKind = ResourceKind::FeedAnalysis;

    fn analyze(&self) -> ConsistencyReport {
        let mut report = ConsistencyReport::new();
        let global = &self.global_analysis;
        let batches = &self.batch_analyses;

        report.check_count("global_analysis.total_batches", global.total_batches, batches.len());
        let batch_numbers: Vec<String> =
            batches.iter().map(|batch| batch.batch_number.to_string()).collect();
        report.check_duplicates("batch_analyses.batch_number", batch_numbers.iter().map(String::as_str));
        let batched_posts = report.check_duplicates(
            "batch_analyses.post_ids",
            batches.iter().flat_map(|batch| batch.post_ids.iter().map(String::as_str)),
        );
        report.check_count(
            "global_analysis.total_posts_analyzed",
            global.total_posts_analyzed,
            batched_posts.len(),
        );
        let detailed = report.check_duplicates(
            "detailed_posts",
            self.detailed_posts.iter().map(|post| post.post_id.as_str()),
        );
        if !detailed.is_empty() {
            report.check_cross_reference(
                ("batch_analyses.post_ids", &batched_posts),
                ("detailed_posts", &detailed),
            );
        }
        if let Some(generated_at) = &global.generated_at {
            report.check_date("global_analysis.generated_at", generated_at);
        }

        let batch_sizes: usize = batches.iter().map(|batch| batch.post_ids.len()).sum();
        let analysis_chars: usize = batches.iter().map(|batch| batch.analysis.chars().count()).sum();
        let caption_chars: usize =
            self.detailed_posts.iter().map(|post| post.caption.chars().count()).sum();
        let models: BTreeSet<&str> = batches
            .iter()
            .map(|batch| batch.model_used.as_str())
            .chain(std::iter::once(global.model_used.as_str()))
            .collect();
        report.record_count("batches", batches.len());
        report.record_count("detailed_posts", self.detailed_posts.len());
        report.record_count("summary_length", global.summary.chars().count());
        report.record_count("distinct_models", models.len());
        #[allow(clippy::cast_precision_loss, reason = "Payload sizes stay far below 2^52.")]
        {
            report.record_stat("average_posts_per_batch", mean(batch_sizes as f64, batches.len()));
            report.record_stat("average_analysis_length", mean(analysis_chars as f64, batches.len()));
            report.record_stat(
                "average_caption_length",
                mean(caption_chars as f64, self.detailed_posts.len()),
            );
        }
        report
    }
}
