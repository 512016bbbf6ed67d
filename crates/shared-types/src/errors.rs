//! # Error Types
//!
//! Defines the validation errors shared across crates.

use chrono::NaiveDateTime;
use thiserror::Error;

/// A malformed payload or an out-of-range parameter.
///
/// Always raised before any state mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// An identifier or label was empty or whitespace.
    #[error("{field} must not be empty")]
    EmptyIdentifier { field: &'static str },

    /// A transaction event does not follow the lifecycle table.
    #[error("Malformed event: {reason}")]
    MalformedEvent { reason: String },

    /// A configuration or simulation parameter is outside its bounds.
    #[error("Parameter {parameter} out of range: got {value}, expected {expected}")]
    OutOfRange {
        parameter: &'static str,
        value: String,
        expected: &'static str,
    },

    /// An event would move a product's history backwards in time.
    #[error("Time regression for {subject}: {attempted} precedes {latest}")]
    TimeRegression {
        subject: String,
        latest: NaiveDateTime,
        attempted: NaiveDateTime,
    },

    /// A block cannot be built from an empty batch.
    #[error("Cannot commit an empty transaction batch")]
    EmptyBatch,

    /// A digest was not 64 hex characters.
    #[error("Invalid hash: {reason}")]
    InvalidHash { reason: String },
}

impl ValidationError {
    /// Shorthand for [`ValidationError::OutOfRange`].
    pub fn out_of_range(
        parameter: &'static str,
        value: impl ToString,
        expected: &'static str,
    ) -> Self {
        Self::OutOfRange {
            parameter,
            value: value.to_string(),
            expected,
        }
    }
}
