// crates/feedlens-client/src/pipeline/tests.rs
// ============================================================================
// Module: Pipeline Unit Tests
// Description: Unit coverage for the bounded fetch pipeline.
// Purpose: Check request gating, wait bounds, cancellation, and observation.
// Dependencies: feedlens-client, feedlens-core, tokio
// ============================================================================

//! ## Overview
//! Drives [`AnalyticsClient`] over scripted in-memory transports.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    reason = "Test-only panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::time::Duration;

use async_trait::async_trait;
use feedlens_core::FetchErrorKind;
use feedlens_core::RawResponse;
use feedlens_core::ResourceKind;
use feedlens_core::TransportFailure;
use feedlens_core::WordCloud;
use serde_json::json;

use super::AnalyticsClient;
use super::FetchOptions;
use crate::cancel::cancel_pair;
use crate::observer::FetchEvent;
use crate::observer::FetchObserver;
use crate::observer::FetchStatus;
use crate::transport::ResourceRequest;
use crate::transport::Transport;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Transport answering every request with one canned response.
struct Canned {
    /// Response returned to every call.
    response: RawResponse,
    /// Number of calls seen.
    calls: AtomicUsize,
    /// Last identifier requested.
    last_id: Mutex<Option<String>>,
}

impl Canned {
    /// Creates a transport answering with `status` and `body`.
    fn new(status: u16, body: &str) -> Arc<Self> {
        Arc::new(Self {
            response: RawResponse::json(status, body),
            calls: AtomicUsize::new(0),
            last_id: Mutex::new(None),
        })
    }
}

#[async_trait]
impl Transport for Canned {
    async fn send(&self, request: &ResourceRequest) -> Result<RawResponse, TransportFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_id.lock().unwrap() = Some(request.resource_id.clone());
        Ok(self.response.clone())
    }
}

/// Transport that never answers.
struct Silent;

#[async_trait]
impl Transport for Silent {
    async fn send(&self, _request: &ResourceRequest) -> Result<RawResponse, TransportFailure> {
        std::future::pending().await
    }
}

/// Observer keeping every event.
#[derive(Default)]
struct Recorder {
    /// Events in arrival order.
    events: Mutex<Vec<FetchEvent>>,
}

impl FetchObserver for Recorder {
    fn record_fetch(&self, event: &FetchEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

/// Consistent word cloud payload.
fn word_cloud_body() -> String {
    json!({
        "metadata": {
            "username": "acme",
            "total_words": 20,
            "unique_words": 3,
            "top_words_count": 3,
            "generated_at": "2024-05-01T12:00:00Z"
        },
        "word_frequencies": {"coffee": 10, "beans": 6, "brew": 4},
        "word_frequencies_list": [
            {"word": "coffee", "frequency": 10, "relative_frequency": 0.5},
            {"word": "beans", "frequency": 6, "relative_frequency": 0.3},
            {"word": "brew", "frequency": 4, "relative_frequency": 0.2}
        ]
    })
    .to_string()
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[tokio::test]
async fn blank_identifier_never_reaches_transport() {
    let transport = Canned::new(200, &word_cloud_body());
    let client = AnalyticsClient::new(transport.clone());
    let error = client.get_word_cloud("   ").await.unwrap_err();
    assert_eq!(error.kind, FetchErrorKind::InvalidRequest);
    assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn identifier_is_trimmed_before_sending() {
    let transport = Canned::new(200, &word_cloud_body());
    let client = AnalyticsClient::new(transport.clone());
    let validated = client.get_word_cloud("  acme ").await.unwrap();
    assert_eq!(validated.payload.metadata.username, "acme");
    assert_eq!(transport.last_id.lock().unwrap().as_deref(), Some("acme"));
}

#[tokio::test]
async fn silent_transport_times_out() {
    let client = AnalyticsClient::new(Arc::new(Silent)).with_timeout(Duration::from_millis(20));
    let error = client.get_post_list("acme").await.unwrap_err();
    assert_eq!(error.kind, FetchErrorKind::Timeout);
    assert!(error.message.contains("20 ms"), "{}", error.message);
}

#[tokio::test]
async fn per_call_timeout_overrides_client_default() {
    let client = AnalyticsClient::new(Arc::new(Silent));
    let options = FetchOptions::with_timeout(Duration::from_millis(15));
    let outcome = client.fetch_resource(ResourceKind::Statistics, "acme", &options).await.unwrap();
    assert_eq!(
        outcome.unwrap_err(),
        TransportFailure::TimedOut {
            after_ms: 15
        }
    );
}

#[tokio::test]
async fn cancellation_resolves_a_pending_fetch() {
    let client = AnalyticsClient::new(Arc::new(Silent));
    let (handle, signal) = cancel_pair();
    let options = FetchOptions::with_cancel(signal);
    let task = tokio::spawn(async move {
        client.fetch_resource(ResourceKind::WordCloud, "acme", &options).await
    });
    tokio::time::sleep(Duration::from_millis(10)).await;
    handle.cancel();
    let outcome = task.await.unwrap().unwrap();
    assert_eq!(outcome.unwrap_err(), TransportFailure::Cancelled);
}

#[tokio::test]
async fn cancellation_before_the_call_skips_the_body() {
    let transport = Canned::new(200, &word_cloud_body());
    let client = AnalyticsClient::new(transport);
    let (handle, signal) = cancel_pair();
    handle.cancel();
    let error = client
        .fetch::<WordCloud>("acme", &FetchOptions::with_cancel(signal))
        .await
        .unwrap_err();
    assert_eq!(error.kind, FetchErrorKind::Timeout);
    assert!(error.message.contains("cancelled"), "{}", error.message);
}

#[tokio::test]
async fn observer_sees_one_event_per_call() {
    let recorder = Arc::new(Recorder::default());
    let client = AnalyticsClient::new(Canned::new(200, &word_cloud_body()))
        .with_observer(recorder.clone());
    client.get_word_cloud("acme").await.unwrap();
    client.get_word_cloud("").await.unwrap_err();

    let events = recorder.events.lock().unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].outcome, FetchStatus::Ok);
    assert_eq!(events[0].status, Some(200));
    assert_eq!(events[0].stats.get("word_count"), Some(&3.0));
    assert_eq!(events[1].outcome, FetchStatus::Error);
    assert_eq!(events[1].error_kind, Some(FetchErrorKind::InvalidRequest));
    assert_eq!(events[1].status, None);
}

#[tokio::test]
async fn fetch_checked_selects_resource_at_runtime() {
    let client = AnalyticsClient::new(Canned::new(404, r#"{"detail": "missing"}"#));
    let error =
        client.fetch_checked(ResourceKind::FeedAnalysis, "ghost", &FetchOptions::default()).await;
    let error = error.unwrap_err();
    assert_eq!(error.kind, FetchErrorKind::NotFound);
    assert!(error.message.contains("\"ghost\""), "{}", error.message);
}
