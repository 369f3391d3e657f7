//! Scorer Error Types
//!
//! This module defines the [`ScorerError`] enum, which encapsulates all error types that can
//! occur while validating inputs and computing confidence or geometric scores.
//! Each variant provides a descriptive error message for robust error handling and debugging.
//!
//! Note that two failure families deliberately do **not** appear here:
//! geometric incomparability (shape-type or vertex-count mismatch) is reported as a sentinel
//! [`crate::types::GeometricAccuracy`] with an infinite position error, and an image in which
//! no shapes were found is reported as an empty detection list. Both are ordinary results,
//! not errors.
//!
//! # Example
//!
//! ```rust
//! use scorer::error::ScorerError;
//!
//! fn check_scheme(criteria: &[String]) -> Result<(), ScorerError> {
//!     if criteria.is_empty() {
//!         return Err(ScorerError::InvalidInput(
//!             "mark scheme must contain at least one criterion".to_string(),
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use std::fmt;

/// Represents all error types that can occur in the scoring core.
#[derive(Debug)]
pub enum ScorerError {
    /// Input is structurally valid but semantically unusable (empty mark scheme,
    /// non-positive marks, tolerance outside `[0, 1]`).
    InvalidInput(String),
    /// JSON is malformed or does not match the expected schema.
    InvalidJson(String),
    /// A required field is missing from input.
    MissingField(String),
    /// The shape-detection collaborator failed (image unreadable, sidecar missing).
    DetectorFailure(String),
}

impl fmt::Display for ScorerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScorerError::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            ScorerError::InvalidJson(msg) => write!(f, "invalid JSON: {msg}"),
            ScorerError::MissingField(msg) => write!(f, "missing field: {msg}"),
            ScorerError::DetectorFailure(msg) => write!(f, "shape detection failed: {msg}"),
        }
    }
}

impl std::error::Error for ScorerError {}
