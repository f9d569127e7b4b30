//! # Error Types
//!
//! Core error hierarchy. All errors use `thiserror` for derive-based
//! `Display` and `Error` implementations.

use thiserror::Error;

/// Top-level error type for the core crate.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Canonicalization failed.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    /// A timestamp string did not satisfy the UTC-only format.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// The value could not be converted to a JSON value tree.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    /// The value serialized to something other than a JSON object or array
    /// where a document was required.
    #[error("expected a JSON object, got {0}")]
    NotAnObject(&'static str),

    /// An integer outside the range an IEEE 754 double represents exactly.
    #[error("integer {0} exceeds 2^53 - 1 and has no exact canonical form")]
    UnsafeInteger(String),
}
