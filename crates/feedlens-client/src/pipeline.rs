// crates/feedlens-client/src/pipeline.rs
// ============================================================================
// Module: Fetch Pipeline
// Description: Transport, classifier, validator, and consistency pass per call.
// Purpose: Provide the typed per-resource fetch functions.
// Dependencies: feedlens-config, feedlens-core, tokio
// ============================================================================

//! ## Overview
//! [`AnalyticsClient`] runs the pipeline in a straight line:
//! transport (bounded and cancellable), status classifier, shape validator,
//! consistency pass. The only suspension point is the transport exchange.
//! Invariants:
//! - Blank identifiers fail with `InvalidRequest` before any network call.
//! - After a timeout or cancellation no body processing happens.
//! - The observer sees exactly one event per call.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use feedlens_config::FeedlensConfig;
use feedlens_core::BodyCheck;
use feedlens_core::ConsistencyReport;
use feedlens_core::FeedAnalysis;
use feedlens_core::FetchError;
use feedlens_core::FetchErrorKind;
use feedlens_core::ImageAnalysis;
use feedlens_core::PostList;
use feedlens_core::ProfileStatistics;
use feedlens_core::RawOutcome;
use feedlens_core::Resource;
use feedlens_core::ResourceKind;
use feedlens_core::TransportFailure;
use feedlens_core::Validated;
use feedlens_core::WordCloud;
use feedlens_core::check_body;
use feedlens_core::classify;
use feedlens_core::decode;
use serde_json::Value;
use tokio::time::Instant;

use crate::cancel::CancelSignal;
use crate::http::ClientBuildError;
use crate::http::HttpTransport;
use crate::observer::FetchEvent;
use crate::observer::FetchObserver;
use crate::observer::FetchStatus;
use crate::observer::JsonLinesObserver;
use crate::observer::NoopObserver;
use crate::transport::ResourceRequest;
use crate::transport::Transport;

// ============================================================================
// SECTION: Options
// ============================================================================

/// Default maximum wait per request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Per-call fetch options.
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    /// Overrides the client's maximum wait.
    pub timeout: Option<Duration>,
    /// External cancellation signal.
    pub cancel: Option<CancelSignal>,
}

impl FetchOptions {
    /// Options with a specific maximum wait.
    #[must_use]
    pub const fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
            cancel: None,
        }
    }

    /// Options observing a cancellation signal.
    #[must_use]
    pub const fn with_cancel(cancel: CancelSignal) -> Self {
        Self {
            timeout: None,
            cancel: Some(cancel),
        }
    }
}

// ============================================================================
// SECTION: Client
// ============================================================================

/// Analytics API client.
#[derive(Clone)]
pub struct AnalyticsClient {
    /// Network exchange.
    transport: Arc<dyn Transport>,
    /// Default maximum wait per request.
    timeout: Duration,
    /// Event sink.
    observer: Arc<dyn FetchObserver>,
}

impl AnalyticsClient {
    /// Creates a client over a transport with the default timeout.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            timeout: DEFAULT_TIMEOUT,
            observer: Arc::new(NoopObserver),
        }
    }

    /// Creates an HTTP client from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClientBuildError`] when the configuration is invalid or the
    /// HTTP client cannot be created.
    pub fn from_config(config: &FeedlensConfig) -> Result<Self, ClientBuildError> {
        config.validate()?;
        let transport = HttpTransport::from_config(&config.api)?;
        let client = Self::new(Arc::new(transport))
            .with_timeout(Duration::from_millis(config.api.timeout_ms));
        if config.logging.enabled {
            return Ok(client.with_observer(Arc::new(JsonLinesObserver::stderr())));
        }
        Ok(client)
    }

    /// Replaces the default maximum wait.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Replaces the event sink.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn FetchObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Returns the default maximum wait.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Performs the bounded network exchange for one identifier.
    ///
    /// The transport is raced against the timeout and the cancellation
    /// signal; whichever finishes first decides the outcome.
    ///
    /// # Errors
    ///
    /// Returns an [`FetchErrorKind::InvalidRequest`] error when the identifier
    /// is blank; no request is sent in that case.
    pub async fn fetch_resource(
        &self,
        resource: ResourceKind,
        resource_id: &str,
        options: &FetchOptions,
    ) -> Result<RawOutcome, FetchError> {
        let resource_id = resource_id.trim();
        if resource_id.is_empty() {
            return Err(FetchError::new(
                FetchErrorKind::InvalidRequest,
                format!("A {} request needs a non-empty identifier", resource.label()),
            ));
        }
        let request = ResourceRequest {
            resource,
            resource_id: resource_id.to_string(),
        };
        let timeout = options.timeout.unwrap_or(self.timeout);
        let mut cancel = options.cancel.clone();
        let cancelled = async move {
            match cancel.as_mut() {
                Some(signal) => signal.cancelled().await,
                None => std::future::pending::<()>().await,
            }
        };
        let outcome = tokio::select! {
            biased;
            () = cancelled => Err(TransportFailure::Cancelled),
            () = tokio::time::sleep(timeout) => Err(TransportFailure::TimedOut {
                after_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            }),
            outcome = self.transport.send(&request) => outcome,
        };
        Ok(outcome)
    }

    /// Fetches, validates, and analyzes a typed resource.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] when any pipeline stage fails.
    pub async fn fetch<R: Resource>(
        &self,
        resource_id: &str,
        options: &FetchOptions,
    ) -> Result<Validated<R>, FetchError> {
        let started = Instant::now();
        let (body, status) = self.fetch_body(R::KIND, resource_id, options).await;
        let result = body.and_then(decode::<R>);
        self.observe(
            R::KIND,
            resource_id,
            started,
            status,
            result.as_ref().map(|validated| (&validated.report, validated.no_data)),
        );
        result
    }

    /// Fetches and checks a resource chosen at runtime.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] when any pipeline stage fails.
    pub async fn fetch_checked(
        &self,
        resource: ResourceKind,
        resource_id: &str,
        options: &FetchOptions,
    ) -> Result<BodyCheck, FetchError> {
        let started = Instant::now();
        let (body, status) = self.fetch_body(resource, resource_id, options).await;
        let result = body.and_then(|body| check_body(resource, body));
        self.observe(
            resource,
            resource_id,
            started,
            status,
            result.as_ref().map(|checked| (&checked.report, checked.no_data)),
        );
        result
    }

    /// Fetches the word cloud for an account.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] when any pipeline stage fails.
    pub async fn get_word_cloud(&self, resource_id: &str) -> Result<Validated<WordCloud>, FetchError> {
        self.fetch(resource_id, &FetchOptions::default()).await
    }

    /// Fetches the feed analysis for an account.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] when any pipeline stage fails.
    pub async fn get_feed_analysis(
        &self,
        resource_id: &str,
    ) -> Result<Validated<FeedAnalysis>, FetchError> {
        self.fetch(resource_id, &FetchOptions::default()).await
    }

    /// Fetches the image analysis for an account.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] when any pipeline stage fails.
    pub async fn get_image_analysis(
        &self,
        resource_id: &str,
    ) -> Result<Validated<ImageAnalysis>, FetchError> {
        self.fetch(resource_id, &FetchOptions::default()).await
    }

    /// Fetches the post list for an account.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] when any pipeline stage fails.
    pub async fn get_post_list(&self, resource_id: &str) -> Result<Validated<PostList>, FetchError> {
        self.fetch(resource_id, &FetchOptions::default()).await
    }

    /// Fetches the profile statistics for an account.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] when any pipeline stage fails.
    pub async fn get_statistics(
        &self,
        resource_id: &str,
    ) -> Result<Validated<ProfileStatistics>, FetchError> {
        self.fetch(resource_id, &FetchOptions::default()).await
    }

    /// Runs transport and classifier, returning the body and HTTP status.
    async fn fetch_body(
        &self,
        resource: ResourceKind,
        resource_id: &str,
        options: &FetchOptions,
    ) -> (Result<Value, FetchError>, Option<u16>) {
        let outcome = match self.fetch_resource(resource, resource_id, options).await {
            Ok(outcome) => outcome,
            Err(err) => return (Err(err), None),
        };
        let status = outcome.as_ref().ok().map(|response| response.status);
        (classify(resource, resource_id, outcome), status)
    }

    /// Reports one finished call to the observer.
    fn observe(
        &self,
        resource: ResourceKind,
        resource_id: &str,
        started: Instant,
        status: Option<u16>,
        result: Result<(&ConsistencyReport, bool), &FetchError>,
    ) {
        let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        let event = match result {
            Ok((report, no_data)) => FetchEvent {
                resource,
                resource_id: resource_id.trim().to_string(),
                outcome: FetchStatus::Ok,
                error_kind: None,
                status,
                latency_ms,
                warning_count: report.warnings.len(),
                no_data,
                stats: report.stats.clone(),
            },
            Err(err) => FetchEvent {
                resource,
                resource_id: resource_id.trim().to_string(),
                outcome: FetchStatus::Error,
                error_kind: Some(err.kind),
                status,
                latency_ms,
                warning_count: 0,
                no_data: false,
                stats: std::collections::BTreeMap::new(),
            },
        };
        self.observer.record_fetch(&event);
    }
}

#[cfg(test)]
mod tests;
