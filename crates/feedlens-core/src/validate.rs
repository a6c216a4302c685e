// crates/feedlens-core/src/validate.rs
// ============================================================================
// Module: Shape Validator
// Description: Generic interpreter that checks payloads against contracts.
// Purpose: Reject structurally invalid payloads before renderers index into them.
// Dependencies: crate::contract, serde, serde_json
// ============================================================================

//! ## Overview
//! [`validate`] walks a JSON body alongside the resource's
//! [`crate::ResourceContract`] and returns a [`ValidationOutcome`]. Fields are
//! checked for presence, kind, and numeric range. Violations from different
//! fields are aggregated into one [`ValidationOutcome::Invalid`]; inside an
//! array the first failing element marks the whole field invalid.
//! Invariants:
//! - A payload is never partially accepted.
//! - Violation order follows contract order, depth first.
//! - The outcome depends only on the contract and the body.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use crate::contract::ArraySpec;
use crate::contract::EmptyPolicy;
use crate::contract::FieldKind;
use crate::contract::FieldSpec;
use crate::contract::NumberRule;
use crate::contract::StringRule;
use crate::contract::contract_for;
use crate::resource::ResourceKind;

// ============================================================================
// SECTION: Violations
// ============================================================================

/// Why a field failed its contract.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum ViolationReason {
    /// Required field is absent or null.
    Missing,
    /// Field has the wrong JSON kind.
    WrongKind {
        /// Expected JSON kind.
        expected: &'static str,
        /// Observed JSON kind.
        found: &'static str,
    },
    /// String field is blank where content is required.
    EmptyString,
    /// Collection is empty where at least one entry is required.
    EmptyCollection,
    /// Number is NaN or infinite.
    NotFinite,
    /// Number violates its range rule.
    OutOfRange {
        /// Observed value.
        value: f64,
        /// Human-readable accepted range.
        expected: &'static str,
    },
    /// Tuple has the wrong number of elements.
    WrongLength {
        /// Required element count.
        expected: usize,
        /// Observed element count.
        found: usize,
    },
}

impl fmt::Display for ViolationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => f.write_str("required field is missing"),
            Self::WrongKind {
                expected,
                found,
            } => write!(f, "expected {expected}, found {found}"),
            Self::EmptyString => f.write_str("non-empty string required"),
            Self::EmptyCollection => f.write_str("non-empty list required"),
            Self::NotFinite => f.write_str("number must be finite"),
            Self::OutOfRange {
                value,
                expected,
            } => write!(f, "value {value} is out of range (expected {expected})"),
            Self::WrongLength {
                expected,
                found,
            } => write!(f, "expected {expected} elements, found {found}"),
        }
    }
}

/// Field-level contract violation.
///
/// # Invariants
/// - `path` uses dotted field names and `[index]` for array elements.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldViolation {
    /// Location of the offending value.
    pub path: String,
    /// Violation reason.
    #[serde(flatten)]
    pub reason: ViolationReason,
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.reason)
    }
}

// ============================================================================
// SECTION: Outcome
// ============================================================================

/// Payload accepted by the shape validator.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidPayload {
    /// Resource the payload was validated against.
    pub resource: ResourceKind,
    /// The validated JSON body.
    pub body: Value,
    /// True when a "no data" collection was present but empty.
    pub no_data: bool,
}

/// Result of running the shape validator.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    /// Payload satisfies its contract.
    Valid(ValidPayload),
    /// Payload violates its contract; reasons are ordered.
    Invalid(Vec<FieldViolation>),
}

impl ValidationOutcome {
    /// Returns true when the payload was accepted.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    /// Returns the violations, empty for valid payloads.
    #[must_use]
    pub fn violations(&self) -> &[FieldViolation] {
        match self {
            Self::Valid(_) => &[],
            Self::Invalid(violations) => violations,
        }
    }
}

// ============================================================================
// SECTION: Validation
// ============================================================================

/// Validates a payload body against the contract for `resource`.
#[must_use]
pub fn validate(resource: ResourceKind, body: &Value) -> ValidationOutcome {
    let contract = contract_for(resource);
    let Value::Object(map) = body else {
        return ValidationOutcome::Invalid(vec![FieldViolation {
            path: "$".to_string(),
            reason: ViolationReason::WrongKind {
                expected: "object",
                found: json_kind(body),
            },
        }]);
    };
    let mut violations = Vec::new();
    check_fields(contract.fields, map, "", &mut violations);
    if !violations.is_empty() {
        return ValidationOutcome::Invalid(violations);
    }
    let no_data = contract
        .no_data_collections()
        .any(|name| map.get(name).and_then(Value::as_array).is_some_and(Vec::is_empty));
    ValidationOutcome::Valid(ValidPayload {
        resource,
        body: body.clone(),
        no_data,
    })
}

/// Checks every field of an object contract, appending violations.
fn check_fields(
    fields: &[FieldSpec],
    map: &Map<String, Value>,
    prefix: &str,
    out: &mut Vec<FieldViolation>,
) {
    for field in fields {
        let path = join_path(prefix, field.name);
        match map.get(field.name) {
            None | Some(Value::Null) => {
                if field.required {
                    out.push(violation(path, ViolationReason::Missing));
                }
            }
            Some(value) => check_value(field.kind, value, &path, out),
        }
    }
}

/// Checks one value against its expected kind.
fn check_value(kind: FieldKind, value: &Value, path: &str, out: &mut Vec<FieldViolation>) {
    match kind {
        FieldKind::String {
            rule,
        } => match value {
            Value::String(text) => {
                if rule == StringRule::NonEmpty && text.trim().is_empty() {
                    out.push(violation(path.to_string(), ViolationReason::EmptyString));
                }
            }
            other => out.push(wrong_kind(path, kind, other)),
        },
        FieldKind::Number {
            rule,
        } => check_number(rule, value, path, out),
        FieldKind::Boolean => {
            if !value.is_boolean() {
                out.push(wrong_kind(path, kind, value));
            }
        }
        FieldKind::Object {
            fields,
        } => match value {
            Value::Object(map) => check_fields(fields, map, path, out),
            other => out.push(wrong_kind(path, kind, other)),
        },
        FieldKind::Array {
            spec,
        } => match value {
            Value::Array(items) => check_array(spec, items, path, out),
            other => out.push(wrong_kind(path, kind, other)),
        },
        FieldKind::Record {
            values,
            empty,
        } => match value {
            Value::Object(map) => {
                if map.is_empty() && empty == EmptyPolicy::Reject {
                    out.push(violation(path.to_string(), ViolationReason::EmptyCollection));
                    return;
                }
                for (key, entry) in map {
                    let before = out.len();
                    check_number(values, entry, &join_path(path, key), out);
                    if out.len() > before {
                        return;
                    }
                }
            }
            other => out.push(wrong_kind(path, kind, other)),
        },
        FieldKind::Tuple {
            len,
            values,
        } => match value {
            Value::Array(items) => {
                if items.len() != len {
                    out.push(violation(
                        path.to_string(),
                        ViolationReason::WrongLength {
                            expected: len,
                            found: items.len(),
                        },
                    ));
                    return;
                }
                for (index, item) in items.iter().enumerate() {
                    let before = out.len();
                    check_number(values, item, &index_path(path, index), out);
                    if out.len() > before {
                        return;
                    }
                }
            }
            other => out.push(wrong_kind(path, kind, other)),
        },
    }
}

/// Checks array elements; the first failing element ends the field.
fn check_array(spec: &ArraySpec, items: &[Value], path: &str, out: &mut Vec<FieldViolation>) {
    if items.is_empty() {
        if spec.empty == EmptyPolicy::Reject {
            out.push(violation(path.to_string(), ViolationReason::EmptyCollection));
        }
        return;
    }
    for (index, item) in items.iter().enumerate() {
        let before = out.len();
        check_value(spec.element, item, &index_path(path, index), out);
        if out.len() > before {
            return;
        }
    }
}

/// Exclusive upper bound of integers representable as `u64`.
const U64_BOUND: f64 = 18_446_744_073_709_551_616.0;

/// Returns true when a finite float is a whole number that fits in `u64`.
///
/// Counts written as `1.0` are accepted so typed decoding can coerce them.
pub(crate) fn is_integral_count(raw: f64) -> bool {
    raw >= 0.0 && raw < U64_BOUND && raw.fract() == 0.0
}

/// Checks a numeric value against its range rule.
fn check_number(rule: NumberRule, value: &Value, path: &str, out: &mut Vec<FieldViolation>) {
    let Value::Number(number) = value else {
        out.push(violation(
            path.to_string(),
            ViolationReason::WrongKind {
                expected: "number",
                found: json_kind(value),
            },
        ));
        return;
    };
    let Some(raw) = number.as_f64() else {
        out.push(violation(path.to_string(), ViolationReason::NotFinite));
        return;
    };
    if !raw.is_finite() {
        out.push(violation(path.to_string(), ViolationReason::NotFinite));
        return;
    }
    let in_range = match rule {
        NumberRule::Any => true,
        NumberRule::NonNegative => raw >= 0.0,
        NumberRule::Count => number.is_u64() || is_integral_count(raw),
        NumberRule::UnitInterval => (0.0 ..= 1.0).contains(&raw),
        NumberRule::Channel => is_integral_count(raw) && raw <= 255.0,
    };
    if !in_range {
        out.push(violation(
            path.to_string(),
            ViolationReason::OutOfRange {
                value: raw,
                expected: rule.describe(),
            },
        ));
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds a violation record.
const fn violation(path: String, reason: ViolationReason) -> FieldViolation {
    FieldViolation {
        path,
        reason,
    }
}

/// Builds a wrong-kind violation for a value.
fn wrong_kind(path: &str, kind: FieldKind, value: &Value) -> FieldViolation {
    violation(
        path.to_string(),
        ViolationReason::WrongKind {
            expected: kind.expected(),
            found: json_kind(value),
        },
    )
}

/// Returns the JSON kind name for a value.
const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Joins a dotted field path.
fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() { name.to_string() } else { format!("{prefix}.{name}") }
}

/// Appends an array index to a path.
fn index_path(prefix: &str, index: usize) -> String {
    format!("{prefix}[{index}]")
}

#[cfg(test)]
mod tests;
