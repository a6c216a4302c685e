// crates/feedlens-core/src/lib.rs
// ============================================================================
// Module: Feedlens Core
// Description: Response contracts, validation, and consistency analysis.
// Purpose: Turn untrusted analytics API payloads into values renderers can trust.
// Dependencies: serde, serde_json, thiserror, time
// ============================================================================

//! ## Overview
//! Feedlens core holds every network-free stage of the analytics fetch
//! pipeline: the static [`ResourceContract`] table, the generic shape
//! [`validate()`] interpreter, the typed resource payloads with their
//! consistency checks, the [`classify()`] status classifier, and the single
//! [`FetchError`] taxonomy surfaced to callers.
//! Invariants:
//! - Contracts are immutable and looked up by resource name.
//! - Shape violations are fatal; consistency findings never are.
//! - Every stage is a pure function of its inputs.
//!
//! Security posture: payloads and error bodies come from a remote service and
//! are treated as untrusted input.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod classify;
pub mod consistency;
pub mod contract;
pub mod error;
pub mod resource;
pub mod resources;
pub mod validate;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use classify::RawOutcome;
pub use classify::RawResponse;
pub use classify::TransportFailure;
pub use classify::classify;
pub use consistency::ConsistencyReport;
pub use consistency::ConsistencyWarning;
pub use consistency::WarningKind;
pub use contract::ArraySpec;
pub use contract::EmptyPolicy;
pub use contract::FieldKind;
pub use contract::FieldSpec;
pub use contract::NumberRule;
pub use contract::ResourceContract;
pub use contract::StringRule;
pub use contract::contract_by_name;
pub use contract::contract_for;
pub use contract::contracts;
pub use error::ErrorDetail;
pub use error::FetchError;
pub use error::FetchErrorKind;
pub use resource::ParseResourceError;
pub use resource::ResourceKind;
pub use resources::BodyCheck;
pub use resources::Resource;
pub use resources::Validated;
pub use resources::check_body;
pub use resources::decode;
pub use resources::feed_analysis::FeedAnalysis;
pub use resources::image_analysis::ImageAnalysis;
pub use resources::post_list::PostList;
pub use resources::statistics::ProfileStatistics;
pub use resources::word_cloud::WordCloud;
pub use validate::FieldViolation;
pub use validate::ValidPayload;
pub use validate::ValidationOutcome;
pub use validate::ViolationReason;
pub use validate::validate;
