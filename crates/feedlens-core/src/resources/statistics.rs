// crates/feedlens-core/src/resources/statistics.rs
// ============================================================================
// Module: Profile Statistics Resource
// Description: Typed aggregate profile statistics and their checks.
// Purpose: Catch disagreement between the post count and its breakdown.
// Dependencies: crate::consistency, serde
// ============================================================================

//! ## Overview
//! Profile statistics are precomputed by the API. The breakdown by post type
//! must add up to the reported post count.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use super::Resource;
use crate::consistency::ConsistencyReport;
use crate::consistency::WarningKind;
use crate::resource::ResourceKind;

// ============================================================================
// SECTION: Payload
// ============================================================================

/// Aggregate statistics for one account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileStatistics {
    /// Account described.
    pub username: String,
    /// Follower count.
    pub followers_count: u64,
    /// Following count.
    pub following_count: u64,
    /// Number of posts.
    pub posts_count: u64,
    /// Interactions per follower, as a proportion.
    pub engagement_rate: f64,
    /// Mean likes per post.
    pub average_likes: f64,
    /// Mean comments per post.
    pub average_comments: f64,
    /// Post counts keyed by media type.
    pub posts_by_type: BTreeMap<String, u64>,
    /// Generation timestamp.
    pub generated_at: String,
}

// ============================================================================
// SECTION: Consistency
// ============================================================================

impl Resource for ProfileStatistics {
    const KIND: ResourceKind = ResourceKind::Statistics;

    fn analyze(&self) -> ConsistencyReport {
        let mut report = ConsistencyReport::new();
        if !self.posts_by_type.is_empty() {
            let typed: u64 = self.posts_by_type.values().copied().fold(0, u64::saturating_add);
            if typed != self.posts_count {
                report.warn(
                    WarningKind::CountMismatch,
                    format!(
                        "posts_by_type adds up to {typed} but posts_count reports {}",
                        self.posts_count
                    ),
                    vec!["posts_by_type".to_string(), "posts_count".to_string()],
                );
            }
        }
        report.check_date("generated_at", &self.generated_at);

        report.record_count("post_type_count", self.posts_by_type.len());
        report.record_stat("engagement_rate_percent", self.engagement_rate * 100.0);
        report.record_stat(
            "interactions_per_post",
            self.average_likes + self.average_comments,
        );
        #[allow(clippy::cast_precision_loss, reason = "Profile counters stay far below 2^52.")]
        let ratio = if self.following_count == 0 {
            0.0
        } else {
            self.followers_count as f64 / self.following_count as f64
        };
        report.record_stat("follower_following_ratio", ratio);
        report
    }
}
