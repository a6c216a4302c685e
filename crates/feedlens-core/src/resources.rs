// crates/feedlens-core/src/resources.rs
// ============================================================================
// Module: Typed Resources
// Description: Typed payloads, decoding, and the consistency pass entry point.
// Purpose: Turn a classified JSON body into a validated typed payload.
// Dependencies: crate::{consistency, error, validate}, serde, serde_json
// ============================================================================

//! ## Overview
//! Every analytics payload implements [`Resource`]: it names its
//! [`ResourceKind`] and runs its own consistency checks. [`decode`] chains the
//! shape validator, typed deserialization, and the consistency pass into one
//! [`Validated`] value. [`check_body`] does the same for a resource chosen at
//! runtime and keeps the body untyped.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::consistency::ConsistencyReport;
use crate::error::FetchError;
use crate::error::FetchErrorKind;
use crate::resource::ResourceKind;
use crate::validate::ValidationOutcome;
use crate::validate::is_integral_count;
use crate::validate::validate;

pub mod feed_analysis;
pub mod image_analysis;
pub mod post_list;
pub mod statistics;
pub mod word_cloud;

use feed_analysis::FeedAnalysis;
use image_analysis::ImageAnalysis;
use post_list::PostList;
use statistics::ProfileStatistics;
use word_cloud::WordCloud;

// ============================================================================
// SECTION: Resource Trait
// ============================================================================

/// Typed payload for one analytics resource.
pub trait Resource: DeserializeOwned + Serialize + Send + 'static {
    /// Resource this payload belongs to.
    const KIND: ResourceKind;

    /// Runs the resource-specific consistency checks and derives statistics.
    fn analyze(&self) -> ConsistencyReport;
}

/// A payload that passed shape validation, with its consistency report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Validated<R> {
    /// Typed payload.
    pub payload: R,
    /// Non-fatal findings and derived statistics.
    pub report: ConsistencyReport,
    /// True when a "no data" collection was empty.
    pub no_data: bool,
}

/// Validates, decodes, and analyzes a classified body.
///
/// # Errors
///
/// Returns a [`FetchErrorKind::SchemaViolation`] error when the body violates
/// the contract for `R::KIND` or cannot be decoded into `R`.
pub fn decode<R: Resource>(body: Value) -> Result<Validated<R>, FetchError> {
    let label = R::KIND.label();
    let payload = match validate(R::KIND, &body) {
        ValidationOutcome::Valid(payload) => payload,
        ValidationOutcome::Invalid(violations) => return Err(FetchError::schema(label, violations)),
    };
    let mut body = payload.body;
    coerce_integral_numbers(&mut body);
    let typed: R = serde_json::from_value(body).map_err(|err| {
        FetchError::new(
            FetchErrorKind::SchemaViolation,
            format!("The {label} response could not be decoded: {err}"),
        )
    })?;
    let report = typed.analyze();
    Ok(Validated {
        payload: typed,
        report,
        no_data: payload.no_data,
    })
}

/// Rewrites whole-number floats such as `3.0` as unsigned integers.
///
/// The validator accepts integral floats for count fields; serde only
/// decodes `u64` from integer numbers.
fn coerce_integral_numbers(value: &mut Value) {
    match value {
        Value::Number(number) if !number.is_u64() => {
            if let Some(raw) = number.as_f64()
                && is_integral_count(raw)
            {
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    reason = "Whole numbers in [0, 2^64) convert exactly."
                )]
                let whole = raw as u64;
                *value = Value::from(whole);
            }
        }
        Value::Array(items) => items.iter_mut().for_each(coerce_integral_numbers),
        Value::Object(fields) => fields.values_mut().for_each(coerce_integral_numbers),
        _ => {}
    }
}

// ============================================================================
// SECTION: Untyped Entry Point
// ============================================================================

/// Outcome of checking a body for a resource chosen at runtime.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BodyCheck {
    /// Resource the body was checked against.
    pub resource: ResourceKind,
    /// The validated body.
    pub payload: Value,
    /// Non-fatal findings and derived statistics.
    pub report: ConsistencyReport,
    /// True when a "no data" collection was empty.
    pub no_data: bool,
}

/// Validates and analyzes a body for the given resource.
///
/// # Errors
///
/// Returns a [`FetchErrorKind::SchemaViolation`] error when the body violates
/// the resource contract.
pub fn check_body(resource: ResourceKind, body: Value) -> Result<BodyCheck, FetchError> {
    match resource {
        ResourceKind::WordCloud => untyped::<WordCloud>(body),
        ResourceKind::FeedAnalysis => untyped::<FeedAnalysis>(body),
        ResourceKind::ImageAnalysis => untyped::<ImageAnalysis>(body),
        ResourceKind::PostList => untyped::<PostList>(body),
        ResourceKind::Statistics => untyped::<ProfileStatistics>(body),
    }
}

/// Runs [`decode`] for `R` and keeps the original body.
fn untyped<R: Resource>(body: Value) -> Result<BodyCheck, FetchError> {
    let validated = decode::<R>(body.clone())?;
    Ok(BodyCheck {
        resource: R::KIND,
        payload: body,
        report: validated.report,
        no_data: validated.no_data,
    })
}
