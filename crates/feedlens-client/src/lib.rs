// crates/feedlens-client/src/lib.rs
// ============================================================================
// Module: Feedlens Client Library
// Description: Async analytics API client with bounded, cancellable fetches.
// Purpose: Run the full fetch pipeline for each analytics resource.
// Dependencies: async-trait, feedlens-config, feedlens-core, reqwest, tokio
// ============================================================================

//! ## Overview
//! [`AnalyticsClient`] issues exactly one request per call through a
//! [`Transport`], bounds it with a timeout and an optional [`CancelSignal`],
//! classifies the outcome, validates the body against its contract, and
//! returns a typed [`feedlens_core::Validated`] payload with its consistency
//! report. Every call is reported to an injected [`FetchObserver`].
//! Invariants:
//! - No retries, caching, or request deduplication.
//! - Exactly one [`feedlens_core::FetchError`] per failed call.
//!
//! Security posture: response bodies are untrusted and size-capped.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod cancel;
pub mod http;
pub mod observer;
pub mod pipeline;
pub mod transport;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use cancel::CancelHandle;
pub use cancel::CancelSignal;
pub use cancel::cancel_pair;
pub use http::ClientBuildError;
pub use http::HttpTransport;
pub use observer::FetchEvent;
pub use observer::FetchObserver;
pub use observer::FetchStatus;
pub use observer::JsonLinesObserver;
pub use observer::NoopObserver;
pub use pipeline::AnalyticsClient;
pub use pipeline::DEFAULT_TIMEOUT;
pub use pipeline::FetchOptions;
pub use transport::ResourceRequest;
pub use transport::Transport;
