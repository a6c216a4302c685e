// crates/feedlens-core/src/resources/post_list.rs
// ============================================================================
// Module: Post List Resource
// Description: Typed post listing payload and its consistency checks.
// Purpose: Catch counter drift and bad timestamps in raw post listings.
// Dependencies: crate::consistency, serde
// ============================================================================

//! ## Overview
//! The post list is the raw material for every other analysis: one entry per
//! post with its engagement counters.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use super::Resource;
use crate::consistency::ConsistencyReport;
use crate::consistency::mean;
use crate::resource::ResourceKind;

// ============================================================================
// SECTION: Payload
// ============================================================================

/// Posts published by an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostList {
    /// Account listed.
    pub username: String,
    /// Reported number of posts.
    pub total_posts: u64,
    /// Posts; empty when the account has none.
    pub posts: Vec<ListedPost>,
}

/// One listed post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListedPost {
    /// Post identifier.
    pub post_id: String,
    /// Post caption.
    pub caption: String,
    /// Post media type.
    pub post_type: String,
    /// Publication timestamp.
    pub timestamp: String,
    /// Like counter.
    pub like_count: u64,
    /// Comment counter.
    pub comment_count: u64,
    /// Storage path of the post media.
    pub object_path: String,
}

// ============================================================================
// SECTION: Consistency
// ============================================================================

impl Resource for PostList {
    const KIND: ResourceKind = ResourceKind::PostList;

    fn analyze(&self) -> ConsistencyReport {
        let mut report = ConsistencyReport::new();
        let posts = &self.posts;
        report.check_count("total_posts", self.total_posts, posts.len());
        report.check_duplicates("posts", posts.iter().map(|post| post.post_id.as_str()));
        for post in posts {
            report.check_date(&format!("posts[{}].timestamp", post.post_id), &post.timestamp);
        }

        let likes = posts.iter().fold(0u64, |total, post| total.saturating_add(post.like_count));
        let comments =
            posts.iter().fold(0u64, |total, post| total.saturating_add(post.comment_count));
        let caption_chars: usize = posts.iter().map(|post| post.caption.chars().count()).sum();
        report.record_count("posts", posts.len());
        #[allow(clippy::cast_precision_loss, reason = "Saturated totals only lose precision.")]
        {
            report.record_stat("total_likes", likes as f64);
            report.record_stat("total_comments", comments as f64);
            report.record_stat("average_likes", mean(likes as f64, posts.len()));
            report.record_stat("average_comments", mean(comments as f64, posts.len()));
            report.record_stat(
                "engagement_per_post",
                mean(likes.saturating_add(comments) as f64, posts.len()),
            );
            report.record_stat("average_caption_length", mean(caption_chars as f64, posts.len()));
        }
        report
    }
}
