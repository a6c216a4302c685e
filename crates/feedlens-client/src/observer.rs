// crates/feedlens-client/src/observer.rs
// ============================================================================
// Module: Fetch Observers
// Description: Sink interface for per-fetch observation events.
// Purpose: Let callers log or meter fetches without a global logger.
// Dependencies: feedlens-core, serde, serde_json
// ============================================================================

//! ## Overview
//! The pipeline reports one [`FetchEvent`] per call to a [`FetchObserver`].
//! [`NoopObserver`] discards events; [`JsonLinesObserver`] writes one JSON
//! object per line. Observation never fails a fetch.
//! Security posture: events carry resource identifiers but never credentials
//! or response bodies.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::io;
use std::io::Write;
use std::sync::Mutex;

use feedlens_core::FetchErrorKind;
use feedlens_core::ResourceKind;
use serde::Serialize;

// ============================================================================
// SECTION: Events
// ============================================================================

/// Final status of an observed fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchStatus {
    /// The payload was validated.
    Ok,
    /// The fetch failed.
    Error,
}

/// Observation record for one fetch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FetchEvent {
    /// Resource fetched.
    pub resource: ResourceKind,
    /// Identifier requested.
    pub resource_id: String,
    /// Final status.
    pub outcome: FetchStatus,
    /// Error classification for failed fetches.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<FetchErrorKind>,
    /// HTTP status when a response was received.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Wall-clock latency in milliseconds.
    pub latency_ms: u64,
    /// Number of consistency warnings.
    pub warning_count: usize,
    /// True when a "no data" collection was empty.
    pub no_data: bool,
    /// Derived statistics of a validated payload.
    pub stats: BTreeMap<String, f64>,
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Sink for fetch observation events.
pub trait FetchObserver: Send + Sync {
    /// Records one completed fetch.
    fn record_fetch(&self, event: &FetchEvent);
}

/// Observer that discards events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl FetchObserver for NoopObserver {
    fn record_fetch(&self, _event: &FetchEvent) {}
}

/// Observer that writes JSON lines to a writer.
pub struct JsonLinesObserver<W: Write + Send> {
    /// Output writer.
    writer: Mutex<W>,
}

impl<W: Write + Send> JsonLinesObserver<W> {
    /// Wraps a writer.
    #[must_use]
    pub const fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer.into_inner().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl JsonLinesObserver<io::Stderr> {
    /// Observer writing to standard error.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W: Write + Send> FetchObserver for JsonLinesObserver<W> {
    fn record_fetch(&self, event: &FetchEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut writer) = self.writer.lock()
        {
            let _ = writeln!(writer, "{payload}");
            let _ = writer.flush();
        }
    }
}
