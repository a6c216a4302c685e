// crates/feedlens-core/src/contract.rs
// ============================================================================
// Module: Resource Contracts
// Description: Declarative shape contracts for analytics API payloads.
// Purpose: Describe each resource payload as data for the generic validator.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A [`ResourceContract`] lists the fields a successful payload must carry,
//! the kind of each field, numeric range rules, and the empty-list policy of
//! every collection. Contracts are `'static` tables defined once in the
//! catalog submodule; adding a resource is a declarative addition there.
//! Invariants:
//! - Contracts are never mutated at runtime.
//! - Every [`ResourceKind`] has exactly one contract.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;

use crate::resource::ResourceKind;

mod catalog;

// ============================================================================
// SECTION: Field Rules
// ============================================================================

/// Constraint applied to string fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StringRule {
    /// Any string, including the empty string.
    Any,
    /// String must contain at least one non-whitespace character.
    NonEmpty,
}

/// Constraint applied to numeric fields.
///
/// # Invariants
/// - Every rule also requires the value to be finite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberRule {
    /// Any finite number.
    Any,
    /// Finite number `>= 0`.
    NonNegative,
    /// Non-negative integer.
    Count,
    /// Proportion in `[0, 1]`.
    UnitInterval,
    /// Integer color channel in `0..=255`.
    Channel,
}

impl NumberRule {
    /// Returns a short description of the accepted values.
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::Any => "a finite number",
            Self::NonNegative => "a number >= 0",
            Self::Count => "a non-negative integer",
            Self::UnitInterval => "a number in [0, 1]",
            Self::Channel => "an integer in [0, 255]",
        }
    }
}

/// Policy applied when a collection has no entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyPolicy {
    /// An empty collection is a validation failure.
    Reject,
    /// An empty collection is accepted silently.
    Allow,
    /// An empty collection is accepted and marks the payload as "no data".
    NoData,
}

/// Contract for array fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ArraySpec {
    /// Kind every element must satisfy.
    pub element: FieldKind,
    /// Behavior when the array is empty.
    pub empty: EmptyPolicy,
}

/// Expected kind of a payload field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKind {
    /// JSON string.
    String {
        /// Content rule.
        rule: StringRule,
    },
    /// JSON number.
    Number {
        /// Range rule.
        rule: NumberRule,
    },
    /// JSON boolean.
    Boolean,
    /// JSON object with its own field contract.
    Object {
        /// Nested field contract.
        fields: &'static [FieldSpec],
    },
    /// JSON array whose elements share one contract.
    Array {
        /// Element contract and empty policy.
        spec: &'static ArraySpec,
    },
    /// JSON object used as a `string -> number` lookup table.
    Record {
        /// Rule applied to every value.
        values: NumberRule,
        /// Behavior when the record is empty.
        empty: EmptyPolicy,
    },
    /// Fixed-length JSON array of numbers.
    Tuple {
        /// Required element count.
        len: usize,
        /// Rule applied to every element.
        values: NumberRule,
    },
}

impl FieldKind {
    /// String field with the provided rule.
    #[must_use]
    pub const fn string(rule: StringRule) -> Self {
        Self::String {
            rule,
        }
    }

    /// Number field with the provided rule.
    #[must_use]
    pub const fn number(rule: NumberRule) -> Self {
        Self::Number {
            rule,
        }
    }

    /// Returns the JSON kind name used in violation messages.
    #[must_use]
    pub const fn expected(self) -> &'static str {
        match self {
            Self::String {
                ..
            } => "string",
            Self::Number {
                ..
            } => "number",
            Self::Boolean => "boolean",
            Self::Object {
                ..
            }
            | Self::Record {
                ..
            } => "object",
            Self::Array {
                ..
            }
            | Self::Tuple {
                ..
            } => "array",
        }
    }
}

/// Named field inside an object contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    /// Field name in the JSON object.
    pub name: &'static str,
    /// Expected kind.
    pub kind: FieldKind,
    /// Whether the field must be present.
    pub required: bool,
}

impl FieldSpec {
    /// Declares a required field.
    #[must_use]
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: true,
        }
    }

    /// Declares an optional field (validated only when present and non-null).
    #[must_use]
    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
        }
    }
}

// ============================================================================
// SECTION: Resource Contract
// ============================================================================

/// Static shape contract for one resource payload.
///
/// # Invariants
/// - The payload root is always a JSON object described by `fields`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResourceContract {
    /// Resource this contract describes.
    pub resource: ResourceKind,
    /// Top-level fields of the payload object.
    pub fields: &'static [FieldSpec],
}

impl ResourceContract {
    /// Returns the top-level field contract with the given name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Returns the names of the required top-level fields in contract order.
    pub fn required_fields(&self) -> impl Iterator<Item = &'static str> + use<> {
        self.fields.iter().filter(|field| field.required).map(|field| field.name)
    }

    /// Returns the top-level collections whose empty state means "no data".
    pub fn no_data_collections(&self) -> impl Iterator<Item = &'static str> + use<> {
        self.fields
            .iter()
            .filter(|field| {
                matches!(
                    field.kind,
                    FieldKind::Array {
                        spec: ArraySpec {
                            empty: EmptyPolicy::NoData,
                            ..
                        },
                    }
                )
            })
            .map(|field| field.name)
    }
}

// ============================================================================
// SECTION: Lookup
// ============================================================================

/// Returns the contract for a resource kind.
#[must_use]
pub fn contract_for(resource: ResourceKind) -> &'static ResourceContract {
    match resource {
        ResourceKind::WordCloud => &catalog::WORD_CLOUD,
        ResourceKind::FeedAnalysis => &catalog::FEED_ANALYSIS,
        ResourceKind::ImageAnalysis => &catalog::IMAGE_ANALYSIS,
        ResourceKind::PostList => &catalog::POST_LIST,
        ResourceKind::Statistics => &catalog::STATISTICS,
    }
}

/// Looks up a contract by resource name (for example `word_cloud`).
#[must_use]
pub fn contract_by_name(name: &str) -> Option<&'static ResourceContract> {
    name.parse::<ResourceKind>().ok().map(contract_for)
}

/// Returns every contract in table order.
pub fn contracts() -> impl Iterator<Item = &'static ResourceContract> {
    ResourceKind::ALL.into_iter().map(contract_for)
}
