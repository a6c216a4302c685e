// crates/feedlens-core/src/resource.rs
// ============================================================================
// Module: Resource Identifiers
// Description: The fixed set of analytics resources served by the API.
// Purpose: Give each resource a stable name, route, and display label.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! [`ResourceKind`] enumerates the analytics resources the dashboard fetches.
//! Each kind carries its wire name (used as the contract key), the default API
//! route, the query parameter carrying the identifier, and a display label used
//! in user-facing error messages.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Resource Kind
// ============================================================================

/// Analytics resource fetched by identifier.
///
/// # Invariants
/// - Variants are stable; `as_str` values are the contract table keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// Word frequency cloud built from post captions.
    WordCloud,
    /// Batched language-model analysis of the post feed.
    FeedAnalysis,
    /// Per-image visual analysis with color palettes.
    ImageAnalysis,
    /// Raw post listing with engagement counters.
    PostList,
    /// Aggregate profile statistics.
    Statistics,
}

impl ResourceKind {
    /// Every resource kind in table order.
    pub const ALL: [Self; 5] =
        [Self::WordCloud, Self::FeedAnalysis, Self::ImageAnalysis, Self::PostList, Self::Statistics];

    /// Returns the stable wire name for the resource.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WordCloud => "word_cloud",
            Self::FeedAnalysis => "feed_analysis",
            Self::ImageAnalysis => "image_analysis",
            Self::PostList => "post_list",
            Self::Statistics => "statistics",
        }
    }

    /// Returns the lower-case display label used in messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::WordCloud => "word cloud",
            Self::FeedAnalysis => "feed analysis",
            Self::ImageAnalysis => "image analysis",
            Self::PostList => "post list",
            Self::Statistics => "profile statistics",
        }
    }

    /// Returns the default API route for the resource.
    #[must_use]
    pub const fn default_route(self) -> &'static str {
        match self {
            Self::WordCloud => "/api/instagram/word-cloud",
            Self::FeedAnalysis => "/api/instagram/feed-analysis",
            Self::ImageAnalysis => "/api/instagram/image-analysis",
            Self::PostList => "/api/instagram/posts",
            Self::Statistics => "/api/instagram/statistics",
        }
    }

    /// Returns the query parameter that carries the resource identifier.
    #[must_use]
    pub const fn query_param(self) -> &'static str {
        "username"
    }

    /// Returns the display label with its first letter capitalized.
    #[must_use]
    pub fn title(self) -> String {
        let label = self.label();
        let mut chars = label.chars();
        chars.next().map_or_else(String::new, |first| {
            first.to_uppercase().chain(chars).collect::<String>()
        })
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a resource name is not in the contract table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown resource: {0}")]
pub struct ParseResourceError(pub String);

impl FromStr for ResourceKind {
    type Err = ParseResourceError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| ParseResourceError(value.to_string()))
    }
}
