//! # Error Hierarchy
//!
//! Structured error types for the engine, built with `thiserror`.
//! No `Box<dyn Error>`, no `.unwrap()` outside tests.
//!
//! The engines are pure computation over already-fetched inputs, so the only
//! failure class they raise is [`ValidationError`], and they raise it before
//! any computation starts. Heuristic table lookups never fail: unknown
//! labels fall back to a default branch.

use chrono::{DateTime, TimeDelta, Utc};
use thiserror::Error;

/// Top-level error type for the engine and its tooling.
#[derive(Error, Debug)]
pub enum RegintelError {
    /// Input failed validation before computation.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Engine configuration is malformed or out of range.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML deserialization error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Fail-fast validation errors for engine inputs.
///
/// Each variant carries the offending field and value so that a caller can
/// turn it into a 4xx response without re-inspecting the request.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A required string field is empty.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// A numeric field is outside its permitted range.
    #[error("{field} out of range: {value} (expected {min}..={max})")]
    OutOfRange {
        /// Name of the field.
        field: &'static str,
        /// The rejected value.
        value: f64,
        /// Inclusive lower bound.
        min: f64,
        /// Inclusive upper bound.
        max: f64,
    },

    /// A percentage is negative, above 100, or not finite.
    #[error("invalid percentage for {field}: {value}")]
    InvalidPercentage {
        /// Name of the field.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// A date range is inverted.
    #[error("invalid date range: {start_field} ({start}) is after {end_field} ({end})")]
    InvalidDateRange {
        /// Name of the field that should come first.
        start_field: &'static str,
        /// Its value, RFC 3339.
        start: String,
        /// Name of the field that should come second.
        end_field: &'static str,
        /// Its value, RFC 3339.
        end: String,
    },

    /// A date, or a date derived from it, falls outside the representable
    /// calendar range.
    #[error("{field} is outside the representable date range")]
    DateOutOfRange {
        /// Name of the field whose date overflowed.
        field: &'static str,
    },

    /// Two inputs that must agree refer to different circulars.
    #[error("circular id mismatch: request has {expected:?}, parsed circular has {actual:?}")]
    CircularMismatch {
        /// Circular id carried by the request.
        expected: String,
        /// Circular id carried by the parsed circular.
        actual: String,
    },
}

impl ValidationError {
    /// Check that `value` lies in `min..=max`, returning `OutOfRange` otherwise.
    pub fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), Self> {
        if value.is_finite() && value >= min && value <= max {
            Ok(())
        } else {
            Err(Self::OutOfRange {
                field,
                value,
                min,
                max,
            })
        }
    }

    /// `date` shifted by `days`, or `DateOutOfRange` if the result cannot be
    /// represented.
    pub fn offset_days(
        field: &'static str,
        date: DateTime<Utc>,
        days: i64,
    ) -> Result<DateTime<Utc>, Self> {
        TimeDelta::try_days(days)
            .and_then(|delta| date.checked_add_signed(delta))
            .ok_or(Self::DateOutOfRange { field })
    }

    /// `date` shifted by `seconds`, or `DateOutOfRange` if the result cannot
    /// be represented.
    pub fn offset_seconds(
        field: &'static str,
        date: DateTime<Utc>,
        seconds: i64,
    ) -> Result<DateTime<Utc>, Self> {
        TimeDelta::try_seconds(seconds)
            .and_then(|delta| date.checked_add_signed(delta))
            .ok_or(Self::DateOutOfRange { field })
    }

    /// Check that a string field is non-empty after trimming.
    pub fn check_present(field: &'static str, value: &str) -> Result<(), Self> {
        if value.trim().is_empty() {
            Err(Self::MissingField(field))
        } else {
            Ok(())
        }
    }
}
