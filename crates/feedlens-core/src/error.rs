// crates/feedlens-core/src/error.rs
// ============================================================================
// Module: Fetch Errors
// Description: Stable error taxonomy surfaced by every resource fetch.
// Purpose: Give callers one descriptive error per failed call.
// Dependencies: crate::validate, serde, thiserror
// ============================================================================

//! ## Overview
//! [`FetchError`] is the only error type returned by the fetch pipeline. It
//! pairs a [`FetchErrorKind`] with a single display sentence and optional
//! operator detail (status code, body excerpt, field violations).

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt::Write as _;

use serde::Serialize;
use thiserror::Error;

use crate::validate::FieldViolation;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum number of characters of a response body kept in error detail.
pub const BODY_EXCERPT_CHARS: usize = 256;

/// Number of violations quoted in a schema violation message.
const QUOTED_VIOLATIONS: usize = 3;

// ============================================================================
// SECTION: Error Kinds
// ============================================================================

/// Classification of a failed fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchErrorKind {
    /// The request exceeded its wait bound or was cancelled.
    Timeout,
    /// The request never produced an HTTP response.
    Network,
    /// The API answered 401.
    Unauthorized,
    /// The API answered 404.
    NotFound,
    /// The API answered with any other non-success status.
    ServerError,
    /// A success response carried a body that is not a JSON object.
    MalformedBody,
    /// The JSON body violated the resource contract.
    SchemaViolation,
    /// The request was rejected locally before any network call.
    InvalidRequest,
}

impl FetchErrorKind {
    /// Returns the stable label for the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Network => "network",
            Self::Unauthorized => "unauthorized",
            Self::NotFound => "not_found",
            Self::ServerError => "server_error",
            Self::MalformedBody => "malformed_body",
            Self::SchemaViolation => "schema_violation",
            Self::InvalidRequest => "invalid_request",
        }
    }
}

// ============================================================================
// SECTION: Error Detail
// ============================================================================

/// Operator-facing detail attached to a [`FetchError`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ErrorDetail {
    /// HTTP status code when a response was received.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Leading characters of the response body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_excerpt: Option<String>,
    /// Contract violations for schema failures.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<FieldViolation>,
}

impl ErrorDetail {
    /// Detail for an HTTP response with the given status and raw body.
    #[must_use]
    pub fn for_response(status: u16, body: &[u8]) -> Self {
        Self {
            status: Some(status),
            body_excerpt: excerpt(body),
            violations: Vec::new(),
        }
    }
}

/// Returns the leading characters of a body, or `None` when it is blank.
#[must_use]
pub fn excerpt(body: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(body);
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.chars().take(BODY_EXCERPT_CHARS).collect())
}

// ============================================================================
// SECTION: Fetch Error
// ============================================================================

/// The single error returned by a failed resource fetch.
///
/// # Invariants
/// - `message` is one descriptive sentence suitable for display.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[error("{message}")]
pub struct FetchError {
    /// Error classification.
    pub kind: FetchErrorKind,
    /// Display message.
    pub message: String,
    /// Optional operator detail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<ErrorDetail>,
}

impl FetchError {
    /// Builds an error without detail.
    #[must_use]
    pub fn new(kind: FetchErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            detail: None,
        }
    }

    /// Attaches operator detail.
    #[must_use]
    pub fn with_detail(mut self, detail: ErrorDetail) -> Self {
        self.detail = Some(detail);
        self
    }

    /// Builds a schema violation error quoting the first few violations.
    #[must_use]
    pub fn schema(label: &str, violations: Vec<FieldViolation>) -> Self {
        let mut message = format!("The {label} response did not match the expected shape");
        let mut quoted = violations.iter().take(QUOTED_VIOLATIONS).peekable();
        if quoted.peek().is_some() {
            message.push_str(": ");
            let joined: Vec<String> = quoted.map(ToString::to_string).collect();
            message.push_str(&joined.join("; "));
        }
        if violations.len() > QUOTED_VIOLATIONS {
            let _ = write!(message, " (and {} more)", violations.len() - QUOTED_VIOLATIONS);
        }
        Self::new(FetchErrorKind::SchemaViolation, message).with_detail(ErrorDetail {
            status: None,
            body_excerpt: None,
            violations,
        })
    }

    /// Returns the contract violations carried by the error, if any.
    #[must_use]
    pub fn violations(&self) -> &[FieldViolation] {
        self.detail.as_ref().map_or(&[], |detail| detail.violations.as_slice())
    }
}

#[cfg(test)]
mod tests;
