//! Error types for field selection.
//!
//! [`FieldMaskError`] covers bad caller input, selections of fields that never
//! reach the wire, malformed path descriptions, and internal consistency
//! failures while merging or optimizing selector trees.

use thiserror::Error;

/// Errors that can occur while selecting fields or building a mask.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldMaskError {
    /// A required input was empty or otherwise absent.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The selected field does not participate in serialization, so the
    /// server would never return it.
    #[error("Field '{field}' of '{declaring_type}' does not participate in the response")]
    Configuration {
        field: String,
        declaring_type: String,
    },

    /// A path description contains a step that is not a plain member access.
    #[error("Unsupported selector '{selector}': {reason}")]
    UnsupportedSelector { selector: String, reason: String },

    /// A compiled selection is not in the shape an operation requires.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Merged and reference trees disagree. Raised when a selection is
    /// optimized against a tree built for another type or a shallower depth.
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
}

/// Convenience alias used throughout fieldmask.
pub type Result<T> = std::result::Result<T, FieldMaskError>;
