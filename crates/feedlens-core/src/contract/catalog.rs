// crates/feedlens-core/src/contract/catalog.rs
// ============================================================================
// Module: Contract Catalog
// Description: Static contract table for every analytics resource.
// Purpose: Declare payload shapes as data consumed by the generic validator.
// Dependencies: crate::contract
// ============================================================================

//! ## Overview
//! One `static` [`ResourceContract`] per resource, built from `const` field
//! tables. Nested objects and arrays reference their own tables.

// ============================================================================
// SECTION: Imports
// ============================================================================

use super::ArraySpec;
use super::EmptyPolicy;
use super::FieldKind;
use super::FieldSpec;
use super::NumberRule;
use super::ResourceContract;
use super::StringRule;
use crate::resource::ResourceKind;

// ============================================================================
// SECTION: Shorthands
// ============================================================================

/// Any string.
const TEXT: FieldKind = FieldKind::string(StringRule::Any);
/// Non-blank string.
const NON_EMPTY_TEXT: FieldKind = FieldKind::string(StringRule::NonEmpty);
/// Non-negative integer.
const COUNT: FieldKind = FieldKind::number(NumberRule::Count);
/// Finite number `>= 0`.
const NON_NEGATIVE: FieldKind = FieldKind::number(NumberRule::NonNegative);
/// Proportion in `[0, 1]`.
const PROPORTION: FieldKind = FieldKind::number(NumberRule::UnitInterval);

// ============================================================================
// SECTION: Word Cloud
// ============================================================================

/// `metadata` block of the word cloud payload.
const WORD_CLOUD_METADATA: &[FieldSpec] = &[
    FieldSpec::required("username", TEXT),
    FieldSpec::required("total_words", COUNT),
    FieldSpec::required("unique_words", COUNT),
    FieldSpec::required("top_words_count", COUNT),
    FieldSpec::required("generated_at", TEXT),
];

/// One `word_frequencies_list` entry.
const WORD_FREQUENCY_ENTRY: &[FieldSpec] = &[
    FieldSpec::required("word", NON_EMPTY_TEXT),
    FieldSpec::required("frequency", NON_NEGATIVE),
    FieldSpec::required("relative_frequency", PROPORTION),
];

/// `word_frequencies_list` array contract.
const WORD_FREQUENCY_LIST: ArraySpec = ArraySpec {
    element: FieldKind::Object {
        fields: WORD_FREQUENCY_ENTRY,
    },
    empty: EmptyPolicy::Reject,
};

/// Top-level word cloud fields.
const WORD_CLOUD_FIELDS: &[FieldSpec] = &[
    FieldSpec::required(
        "metadata",
        FieldKind::Object {
            fields: WORD_CLOUD_METADATA,
        },
    ),
    FieldSpec::required(
        "word_frequencies",
        FieldKind::Record {
            values: NumberRule::NonNegative,
            empty: EmptyPolicy::Reject,
        },
    ),
    FieldSpec::required(
        "word_frequencies_list",
        FieldKind::Array {
            spec: &WORD_FREQUENCY_LIST,
        },
    ),
];

/// Word cloud contract.
pub(super) static WORD_CLOUD: ResourceContract = ResourceContract {
    resource: ResourceKind::WordCloud,
    fields: WORD_CLOUD_FIELDS,
};

// ============================================================================
// SECTION: Feed Analysis
// ============================================================================

/// `global_analysis` block of the feed analysis payload.
const GLOBAL_ANALYSIS: &[FieldSpec] = &[
    FieldSpec::required("summary", NON_EMPTY_TEXT),
    FieldSpec::required("total_posts_analyzed", COUNT),
    FieldSpec::required("total_batches", COUNT),
    FieldSpec::required("model_used", NON_EMPTY_TEXT),
    FieldSpec::optional("generated_at", TEXT),
];

/// `post_ids` array inside a batch.
const BATCH_POST_IDS: ArraySpec = ArraySpec {
    element: NON_EMPTY_TEXT,
    empty: EmptyPolicy::Reject,
};

/// One `batch_analyses` entry.
const BATCH_ANALYSIS: &[FieldSpec] = &[
    FieldSpec::required("batch_number", COUNT),
    FieldSpec::required(
        "post_ids",
        FieldKind::Array {
            spec: &BATCH_POST_IDS,
        },
    ),
    FieldSpec::required("analysis", NON_EMPTY_TEXT),
    FieldSpec::required("model_used", NON_EMPTY_TEXT),
];

/// `batch_analyses` array contract.
const BATCH_ANALYSES: ArraySpec = ArraySpec {
    element: FieldKind::Object {
        fields: BATCH_ANALYSIS,
    },
    empty: EmptyPolicy::Reject,
};

/// One `detailed_posts` entry.
const DETAILED_POST: &[FieldSpec] = &[
    FieldSpec::required("post_id", NON_EMPTY_TEXT),
    FieldSpec::required("caption", TEXT),
    FieldSpec::required("object_path", NON_EMPTY_TEXT),
];

/// `detailed_posts` array contract.
const DETAILED_POSTS: ArraySpec = ArraySpec {
    element: FieldKind::Object {
        fields: DETAILED_POST,
    },
    empty: EmptyPolicy::Allow,
};

/// Top-level feed analysis fields.
const FEED_ANALYSIS_FIELDS: &[FieldSpec] = &[
    FieldSpec::required(
        "global_analysis",
        FieldKind::Object {
            fields: GLOBAL_ANALYSIS,
        },
    ),
    FieldSpec::required(
        "batch_analyses",
        FieldKind::Array {
            spec: &BATCH_ANALYSES,
        },
    ),
    FieldSpec::required(
        "detailed_posts",
        FieldKind::Array {
            spec: &DETAILED_POSTS,
        },
    ),
];

/// Feed analysis contract.
pub(super) static FEED_ANALYSIS: ResourceContract = ResourceContract {
    resource: ResourceKind::FeedAnalysis,
    fields: FEED_ANALYSIS_FIELDS,
};

// ============================================================================
// SECTION: Image Analysis
// ============================================================================

/// One `color_palette` entry.
const PALETTE_ENTRY: &[FieldSpec] = &[
    FieldSpec::required(
        "rgb",
        FieldKind::Tuple {
            len: 3,
            values: NumberRule::Channel,
        },
    ),
    FieldSpec::required("proportion", PROPORTION),
];

/// `color_palette` array contract.
const COLOR_PALETTE: ArraySpec = ArraySpec {
    element: FieldKind::Object {
        fields: PALETTE_ENTRY,
    },
    empty: EmptyPolicy::Allow,
};

/// One analyzed image.
const ANALYZED_IMAGE: &[FieldSpec] = &[
    FieldSpec::required("file_name", NON_EMPTY_TEXT),
    FieldSpec::required("object_path", NON_EMPTY_TEXT),
    FieldSpec::required("gpt4o_analysis", TEXT),
    FieldSpec::required(
        "color_palette",
        FieldKind::Array {
            spec: &COLOR_PALETTE,
        },
    ),
];

/// `images` array inside an analyzed post.
const ANALYZED_IMAGES: ArraySpec = ArraySpec {
    element: FieldKind::Object {
        fields: ANALYZED_IMAGE,
    },
    empty: EmptyPolicy::Allow,
};

/// One `posts_analyzed` entry.
const ANALYZED_POST: &[FieldSpec] = &[
    FieldSpec::required("post_id", NON_EMPTY_TEXT),
    FieldSpec::required("caption", NON_EMPTY_TEXT),
    FieldSpec::required("post_type", NON_EMPTY_TEXT),
    FieldSpec::required(
        "images",
        FieldKind::Array {
            spec: &ANALYZED_IMAGES,
        },
    ),
];

/// `posts_analyzed` array contract; empty means the account has no analysis yet.
const ANALYZED_POSTS: ArraySpec = ArraySpec {
    element: FieldKind::Object {
        fields: ANALYZED_POST,
    },
    empty: EmptyPolicy::NoData,
};

/// Top-level image analysis fields.
const IMAGE_ANALYSIS_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("username", NON_EMPTY_TEXT),
    FieldSpec::required("total_posts_analyzed", COUNT),
    FieldSpec::required(
        "posts_analyzed",
        FieldKind::Array {
            spec: &ANALYZED_POSTS,
        },
    ),
];

/// Image analysis contract.
pub(super) static IMAGE_ANALYSIS: ResourceContract = ResourceContract {
    resource: ResourceKind::ImageAnalysis,
    fields: IMAGE_ANALYSIS_FIELDS,
};

// ============================================================================
// SECTION: Post List
// ============================================================================

/// One `posts` entry.
const LISTED_POST: &[FieldSpec] = &[
    FieldSpec::required("post_id", NON_EMPTY_TEXT),
    FieldSpec::required("caption", TEXT),
    FieldSpec::required("post_type", NON_EMPTY_TEXT),
    FieldSpec::required("timestamp", TEXT),
    FieldSpec::required("like_count", COUNT),
    FieldSpec::required("comment_count", COUNT),
    FieldSpec::required("object_path", NON_EMPTY_TEXT),
];

/// `posts` array contract; empty means the account has no posts.
const LISTED_POSTS: ArraySpec = ArraySpec {
    element: FieldKind::Object {
        fields: LISTED_POST,
    },
    empty: EmptyPolicy::NoData,
};

/// Top-level post list fields.
const POST_LIST_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("username", NON_EMPTY_TEXT),
    FieldSpec::required("total_posts", COUNT),
    FieldSpec::required(
        "posts",
        FieldKind::Array {
            spec: &LISTED_POSTS,
        },
    ),
];

/// Post list contract.
pub(super) static POST_LIST: ResourceContract = ResourceContract {
    resource: ResourceKind::PostList,
    fields: POST_LIST_FIELDS,
};

// ============================================================================
// SECTION: Statistics
// ============================================================================

/// Top-level profile statistics fields.
const STATISTICS_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("username", NON_EMPTY_TEXT),
    FieldSpec::required("followers_count", COUNT),
    FieldSpec::required("following_count", COUNT),
    FieldSpec::required("posts_count", COUNT),
    FieldSpec::required("engagement_rate", PROPORTION),
    FieldSpec::required("average_likes", NON_NEGATIVE),
    FieldSpec::required("average_comments", NON_NEGATIVE),
    FieldSpec::required(
        "posts_by_type",
        FieldKind::Record {
            values: NumberRule::Count,
            empty: EmptyPolicy::Allow,
        },
    ),
    FieldSpec::required("generated_at", TEXT),
];

/// Profile statistics contract.
pub(super) static STATISTICS: ResourceContract = ResourceContract {
    resource: ResourceKind::Statistics,
    fields: STATISTICS_FIELDS,
};
