//! Error taxonomy for type resolution and value conversion.
//!
//! All failures are returned as values; nothing in the conversion path
//! panics. Normalized nulls are `Ok(FrameValue::Null)` and are never
//! represented through these types.

use std::fmt;

use thiserror::Error;

/// A single-cell conversion failure.
#[derive(Debug, Error)]
pub enum ConversionError {
    /// No rule in the catalog matched the column's declared type. Produced
    /// only by the sentinel rule's converter.
    #[error("no converter registered for column type `{type_name}`")]
    UnresolvedType {
        /// The declared column type as it arrived from the store.
        type_name: String,
    },

    /// The native value's runtime shape does not match what the rule expects.
    #[error("converter `{rule}` expected {expected}, got {got}")]
    ShapeMismatch {
        rule: String,
        expected: &'static str,
        got: String,
    },

    /// A structured value could not be serialized to JSON.
    #[error("converter `{rule}` could not serialize value: {reason}")]
    MarshalFailure { rule: String, reason: String },
}

impl ConversionError {
    /// Build a `ShapeMismatch` from the offending value's debug rendering.
    pub(crate) fn mismatch(rule: &str, expected: &'static str, got: &impl fmt::Debug) -> Self {
        Self::ShapeMismatch {
            rule: rule.to_string(),
            expected,
            got: format!("{got:?}"),
        }
    }

    /// Build a `MarshalFailure` for the given rule.
    pub(crate) fn marshal(rule: &str, reason: impl Into<String>) -> Self {
        Self::MarshalFailure {
            rule: rule.to_string(),
            reason: reason.into(),
        }
    }
}

/// A frame-level materialization failure.
#[derive(Debug, Error)]
pub enum FrameError {
    /// A cell failed to convert. Carries enough context to identify the
    /// offending column without re-running the query.
    #[error("column `{column}` (declared `{type_name}`, rule `{rule}`): {source}")]
    Cell {
        column: String,
        type_name: String,
        rule: String,
        #[source]
        source: ConversionError,
    },

    /// The row arity does not match the bound column list.
    #[error("row has {got} values but the frame has {expected} columns")]
    ColumnCount { expected: usize, got: usize },
}
