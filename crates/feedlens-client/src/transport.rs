// crates/feedlens-client/src/transport.rs
// ============================================================================
// Module: Transport
// Description: Abstraction over the single network exchange of a fetch.
// Purpose: Let the pipeline run against HTTP or scripted in-memory transports.
// Dependencies: async-trait, feedlens-core
// ============================================================================

//! ## Overview
//! A [`Transport`] performs one GET for one resource identifier and returns
//! the raw response or a [`TransportFailure`]. Timeouts and cancellation are
//! enforced by the caller; transports only report what the network did.

// ============================================================================
// SECTION: Imports
// ============================================================================

use async_trait::async_trait;
use feedlens_core::RawResponse;
use feedlens_core::ResourceKind;
use feedlens_core::TransportFailure;

// ============================================================================
// SECTION: Request
// ============================================================================

/// One outbound resource request.
///
/// # Invariants
/// - `resource_id` is trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRequest {
    /// Resource to fetch.
    pub resource: ResourceKind,
    /// Identifier sent as the resource query parameter.
    pub resource_id: String,
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Performs the network exchange for a resource request.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends one request and captures the response.
    async fn send(&self, request: &ResourceRequest) -> Result<RawResponse, TransportFailure>;
}
