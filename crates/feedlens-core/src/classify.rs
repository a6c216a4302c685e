// crates/feedlens-core/src/classify.rs
// ============================================================================
// Module: Status Classifier
// Description: Turns raw transport outcomes into JSON bodies or fetch errors.
// Purpose: Classify HTTP-level failures before any contract validation.
// Dependencies: crate::error, crate::resource, serde_json, thiserror
// ============================================================================

//! ## Overview
//! [`classify`] takes the [`RawOutcome`] of one exchange and returns either the
//! success body as a JSON object or exactly one [`FetchError`]. Error bodies
//! are parsed best-effort: the first message found by [`MESSAGE_EXTRACTORS`]
//! wins, and malformed error bodies fall back to `"<status> <status text>"`.
//! Invariants:
//! - Never panics, whatever the error body contains.
//! - 2xx bodies must be JSON objects.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;
use thiserror::Error;

use crate::error::ErrorDetail;
use crate::error::FetchError;
use crate::error::FetchErrorKind;
use crate::resource::ResourceKind;

// ============================================================================
// SECTION: Raw Outcome
// ============================================================================

/// HTTP response captured by a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Reason phrase for the status.
    pub status_text: String,
    /// Response content type, when sent.
    pub content_type: Option<String>,
    /// Raw body bytes.
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Builds a JSON response with the canonical reason phrase.
    #[must_use]
    pub fn json(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            status_text: reason_phrase(status).to_string(),
            content_type: Some("application/json".to_string()),
            body: body.into(),
        }
    }
}

/// Failure that prevented an HTTP response from being captured.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportFailure {
    /// Connection or protocol failure.
    #[error("network failure: {0}")]
    Network(String),
    /// The wait bound elapsed.
    #[error("request timed out after {after_ms} ms")]
    TimedOut {
        /// Elapsed wait bound in milliseconds.
        after_ms: u64,
    },
    /// The caller cancelled the request.
    #[error("request cancelled")]
    Cancelled,
    /// The response body exceeded the configured limit.
    #[error("response body exceeds {limit} bytes")]
    ResponseTooLarge {
        /// Configured limit in bytes.
        limit: u64,
    },
}

/// Result of one transport exchange.
pub type RawOutcome = Result<RawResponse, TransportFailure>;

// ============================================================================
// SECTION: Message Extraction
// ============================================================================

/// Extracts a display message from a parsed error body.
pub type MessageExtractor = fn(&Value) -> Option<String>;

/// Ordered message extractors; the first one returning a message wins.
pub const MESSAGE_EXTRACTORS: &[MessageExtractor] =
    &[error_string, error_detail, error_message, top_level_detail, top_level_message];

/// Maximum number of alternative identifiers appended to a message.
const MAX_LISTED_IDENTIFIERS: usize = 10;

/// Keys that carry alternative identifiers in error bodies.
const AVAILABLE_KEYS: &[&str] = &["available_usernames", "available_ids", "available_identifiers"];

/// Keys that echo the requested identifier in error bodies.
const REQUESTED_KEYS: &[&str] = &["requested_username", "requested_id"];

/// Returns a non-blank string value.
fn non_blank(value: Option<&Value>) -> Option<String> {
    value.and_then(Value::as_str).map(str::trim).filter(|text| !text.is_empty()).map(str::to_string)
}

/// `{"error": "..."}`
fn error_string(body: &Value) -> Option<String> {
    non_blank(body.get("error"))
}

/// `{"error": {"detail": "..."}}`
fn error_detail(body: &Value) -> Option<String> {
    non_blank(body.get("error").and_then(|error| error.get("detail")))
}

/// `{"error": {"message": "..."}}`
fn error_message(body: &Value) -> Option<String> {
    non_blank(body.get("error").and_then(|error| error.get("message")))
}

/// `{"detail": "..."}`
fn top_level_detail(body: &Value) -> Option<String> {
    non_blank(body.get("detail"))
}

/// `{"message": "..."}`
fn top_level_message(body: &Value) -> Option<String> {
    non_blank(body.get("message"))
}

/// Returns the first message produced by the ordered extractors.
#[must_use]
pub fn first_message(body: &Value) -> Option<String> {
    MESSAGE_EXTRACTORS.iter().find_map(|extract| extract(body))
}

/// Containers searched for auxiliary diagnostics, outermost first.
fn diagnostic_scopes(body: &Value) -> impl Iterator<Item = &Value> {
    [Some(body), body.get("detail"), body.get("error")].into_iter().flatten().filter(|v| v.is_object())
}

/// Returns the auxiliary diagnostic suffix for an error body, if any.
fn diagnostics(body: &Value) -> Option<String> {
    let requested = diagnostic_scopes(body)
        .find_map(|scope| REQUESTED_KEYS.iter().find_map(|key| non_blank(scope.get(*key))));
    let available: Option<Vec<&str>> = diagnostic_scopes(body).find_map(|scope| {
        AVAILABLE_KEYS.iter().find_map(|key| {
            scope.get(*key).and_then(Value::as_array).map(|items| {
                items.iter().filter_map(Value::as_str).filter(|id| !id.trim().is_empty()).collect()
            })
        })
    });
    let mut parts = Vec::new();
    if let Some(requested) = requested {
        parts.push(format!("requested identifier: {requested}"));
    }
    if let Some(available) = available.filter(|ids| !ids.is_empty()) {
        let mut listed = available.iter().take(MAX_LISTED_IDENTIFIERS).copied().collect::<Vec<_>>().join(", ");
        if available.len() > MAX_LISTED_IDENTIFIERS {
            listed.push_str(", ...");
        }
        parts.push(format!("available identifiers: {listed}"));
    }
    if parts.is_empty() { None } else { Some(format!(" ({})", parts.join("; "))) }
}

// ============================================================================
// SECTION: Classification
// ============================================================================

/// Classifies a raw outcome into a success body or a fetch error.
///
/// # Errors
///
/// Returns [`FetchError`] for transport failures, non-success statuses, and
/// success bodies that are not JSON objects.
pub fn classify(
    resource: ResourceKind,
    resource_id: &str,
    outcome: RawOutcome,
) -> Result<Value, FetchError> {
    let response = outcome.map_err(|failure| transport_error(resource, &failure))?;
    if (200 .. 300).contains(&response.status) {
        return success_body(resource, &response);
    }
    Err(status_error(resource, resource_id, &response))
}

/// Maps a transport failure to its fetch error.
fn transport_error(resource: ResourceKind, failure: &TransportFailure) -> FetchError {
    let label = resource.label();
    match failure {
        TransportFailure::Network(reason) => FetchError::new(
            FetchErrorKind::Network,
            format!("Could not reach the analytics API for {label}: {reason}"),
        ),
        TransportFailure::TimedOut {
            after_ms,
        } => FetchError::new(
            FetchErrorKind::Timeout,
            format!("The {label} request timed out after {after_ms} ms"),
        ),
        TransportFailure::Cancelled => {
            FetchError::new(FetchErrorKind::Timeout, format!("The {label} request was cancelled"))
        }
        TransportFailure::ResponseTooLarge {
            limit,
        } => FetchError::new(
            FetchErrorKind::MalformedBody,
            format!("The {label} response exceeded the {limit} byte limit"),
        ),
    }
}

/// Parses a success body, requiring a JSON object.
fn success_body(resource: ResourceKind, response: &RawResponse) -> Result<Value, FetchError> {
    let label = resource.label();
    let detail = || ErrorDetail::for_response(response.status, &response.body);
    if response.body.iter().all(u8::is_ascii_whitespace) {
        return Err(FetchError::new(
            FetchErrorKind::MalformedBody,
            format!("The {label} response body was empty"),
        )
        .with_detail(detail()));
    }
    match serde_json::from_slice::<Value>(&response.body) {
        Ok(body @ Value::Object(_)) => Ok(body),
        Ok(_) => Err(FetchError::new(
            FetchErrorKind::MalformedBody,
            format!("The {label} response was JSON but not an object"),
        )
        .with_detail(detail())),
        Err(_) => Err(FetchError::new(
            FetchErrorKind::MalformedBody,
            format!("The {label} response was not valid JSON"),
        )
        .with_detail(detail())),
    }
}

/// Builds the error for a non-success status.
fn status_error(resource: ResourceKind, resource_id: &str, response: &RawResponse) -> FetchError {
    let parsed = serde_json::from_slice::<Value>(&response.body).ok();
    let underlying = parsed
        .as_ref()
        .and_then(first_message)
        .unwrap_or_else(|| fallback_message(response));
    let suffix = parsed.as_ref().and_then(diagnostics).unwrap_or_default();
    let (kind, message) = match response.status {
        404 => (
            FetchErrorKind::NotFound,
            format!("{} not found for identifier \"{}\"", resource.title(), resource_id.trim()),
        ),
        401 => (
            FetchErrorKind::Unauthorized,
            format!("Not authorized to access {}: {underlying}", resource.label()),
        ),
        _ => (FetchErrorKind::ServerError, underlying),
    };
    FetchError::new(kind, format!("{message}{suffix}"))
        .with_detail(ErrorDetail::for_response(response.status, &response.body))
}

/// Returns `"<status> <status text>"`, trimming a missing reason phrase.
fn fallback_message(response: &RawResponse) -> String {
    let text = if response.status_text.trim().is_empty() {
        reason_phrase(response.status)
    } else {
        response.status_text.trim()
    };
    format!("{} {text}", response.status).trim_end().to_string()
}

/// Canonical reason phrase for the statuses the API is known to return.
#[must_use]
pub const fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        301 => "Moved Permanently",
        302 => "Found",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        _ => "",
    }
}
