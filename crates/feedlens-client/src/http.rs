// crates/feedlens-client/src/http.rs
// ============================================================================
// Module: HTTP Transport
// Description: reqwest-backed transport for the analytics API.
// Purpose: Issue one capped GET per resource request.
// Dependencies: feedlens-config, feedlens-core, reqwest, url
// ============================================================================

//! ## Overview
//! [`HttpTransport`] builds the request URL from the configured base URL and
//! resource route, attaches the ambient credentials, and reads the response
//! body under a hard byte limit.
//! Invariants:
//! - Redirects are not followed; a 3xx response is returned as-is.
//! - Bodies larger than `max_response_bytes` fail with
//!   [`TransportFailure::ResponseTooLarge`].
//!
//! Security posture: credentials are marked sensitive and never logged.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use async_trait::async_trait;
use feedlens_config::ApiConfig;
use feedlens_config::ConfigError;
use feedlens_core::RawResponse;
use feedlens_core::ResourceKind;
use feedlens_core::TransportFailure;
use reqwest::Client;
use reqwest::header::ACCEPT;
use reqwest::header::AUTHORIZATION;
use reqwest::header::CONTENT_TYPE;
use reqwest::header::COOKIE;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderValue;
use reqwest::redirect::Policy;
use thiserror::Error;
use url::Url;

use crate::transport::ResourceRequest;
use crate::transport::Transport;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while building a client from configuration.
#[derive(Debug, Error)]
pub enum ClientBuildError {
    /// Configuration failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A credential could not be encoded as a header value.
    #[error("invalid {0} header value")]
    Header(&'static str),
    /// The HTTP client could not be created.
    #[error("http client build failed: {0}")]
    Client(String),
}

// ============================================================================
// SECTION: HTTP Transport
// ============================================================================

/// Transport that fetches resources over HTTP(S).
///
/// # Invariants
/// - `base_url` is an http(s) URL without embedded credentials.
pub struct HttpTransport {
    /// Shared HTTP client with default headers.
    client: Client,
    /// API base URL.
    base_url: Url,
    /// API settings (routes, limits).
    config: ApiConfig,
}

impl HttpTransport {
    /// Builds a transport from validated API settings.
    ///
    /// # Errors
    ///
    /// Returns [`ClientBuildError`] when the settings are invalid or the
    /// client cannot be created.
    pub fn from_config(config: &ApiConfig) -> Result<Self, ClientBuildError> {
        let base_url = config.parsed_base_url()?;
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(config.user_agent.clone())
            .redirect(Policy::none())
            .default_headers(default_headers(config)?)
            .build()
            .map_err(|err| ClientBuildError::Client(err.to_string()))?;
        Ok(Self {
            client,
            base_url,
            config: config.clone(),
        })
    }

    /// Returns the URL requested for a resource identifier.
    #[must_use]
    pub fn request_url(&self, resource: ResourceKind, resource_id: &str) -> Url {
        let mut url = self.base_url.clone();
        let prefix = self.base_url.path().trim_end_matches('/');
        url.set_path(&format!("{prefix}{}", self.config.route(resource)));
        url.set_query(None);
        url.query_pairs_mut().append_pair(resource.query_param(), resource_id);
        url
    }

    /// Maps a reqwest failure to a transport failure.
    fn failure(&self, err: &reqwest::Error) -> TransportFailure {
        if err.is_timeout() {
            TransportFailure::TimedOut {
                after_ms: self.config.timeout_ms,
            }
        } else {
            TransportFailure::Network(err.to_string())
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &ResourceRequest) -> Result<RawResponse, TransportFailure> {
        let url = self.request_url(request.resource, &request.resource_id);
        let response = self.client.get(url).send().await.map_err(|err| self.failure(&err))?;
        let limit = self.config.max_response_bytes;
        if response.content_length().is_some_and(|length| length > limit) {
            return Err(TransportFailure::ResponseTooLarge {
                limit,
            });
        }
        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = read_body_with_limit(response, limit).await.map_err(|err| match err {
            BodyError::Transport(err) => self.failure(&err),
            BodyError::TooLarge => TransportFailure::ResponseTooLarge {
                limit,
            },
        })?;
        Ok(RawResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            content_type,
            body,
        })
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds the default headers carrying the ambient credentials.
fn default_headers(config: &ApiConfig) -> Result<HeaderMap, ClientBuildError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    if let Some(token) = &config.bearer_token {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token.trim()))
            .map_err(|_| ClientBuildError::Header("authorization"))?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }
    if let Some(cookie) = &config.session_cookie {
        let mut value = HeaderValue::from_str(cookie.trim())
            .map_err(|_| ClientBuildError::Header("cookie"))?;
        value.set_sensitive(true);
        headers.insert(COOKIE, value);
    }
    Ok(headers)
}

/// Body read failure.
enum BodyError {
    /// Underlying transport error.
    Transport(reqwest::Error),
    /// Body exceeded the limit.
    TooLarge,
}

/// Reads a response body while enforcing a hard byte limit.
async fn read_body_with_limit(
    mut response: reqwest::Response,
    limit: u64,
) -> Result<Vec<u8>, BodyError> {
    let mut body = Vec::new();
    let mut total: u64 = 0;
    while let Some(chunk) = response.chunk().await.map_err(BodyError::Transport)? {
        let chunk_len = u64::try_from(chunk.len()).map_err(|_| BodyError::TooLarge)?;
        total = total.checked_add(chunk_len).ok_or(BodyError::TooLarge)?;
        if total > limit {
            return Err(BodyError::TooLarge);
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

#[cfg(test)]
mod tests;
