//! Error types for the Planboard subsystem.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the task-tracking subsystem.
///
/// Every variant is recoverable by the caller: a rejected mutation leaves the
/// task store unchanged and is reported back synchronously. `Internal` marks
/// defects (invariant violations that validation should have prevented) and
/// should never be observed through the public API.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlanboardError {
    /// A parent reference does not resolve: the id is unknown, or a bulk
    /// `create` entry points at itself, forward, or out of range.
    #[error("Invalid parent reference: {reference}")]
    InvalidParent { reference: String },

    /// A status update targeted an id that is not in the store.
    #[error("Task not found: '{id}'")]
    NotFound { id: String },

    /// A task description was empty (or whitespace-only) at the tool boundary.
    #[error("Task description must not be empty")]
    EmptyDescription,

    /// The request failed shape validation before reaching the store.
    #[error("Malformed input: {message}")]
    MalformedInput { message: String },

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl PlanboardError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates an InvalidParent error
    pub fn invalid_parent(reference: impl Into<String>) -> Self {
        Self::InvalidParent {
            reference: reference.into(),
        }
    }

    /// Creates a NotFound error
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Creates a MalformedInput error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedInput {
            message: message.into(),
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    // ============================================================================
    // Classification
    // ============================================================================

    /// Returns the wire-level failure kind for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidParent { .. } => ErrorKind::InvalidParent,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::EmptyDescription => ErrorKind::EmptyDescription,
            Self::MalformedInput { .. } => ErrorKind::MalformedInput,
            Self::Internal { .. } => ErrorKind::Internal,
        }
    }

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is an InvalidParent error
    pub fn is_invalid_parent(&self) -> bool {
        matches!(self, Self::InvalidParent { .. })
    }
}

/// Failure classification carried in tool responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidParent,
    NotFound,
    EmptyDescription,
    MalformedInput,
    Internal,
}

/// A type alias for `Result<T, PlanboardError>`.
pub type Result<T> = std::result::Result<T, PlanboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_classification() {
        assert_eq!(
            PlanboardError::invalid_parent("abc").kind(),
            ErrorKind::InvalidParent
        );
        assert_eq!(PlanboardError::not_found("x").kind(), ErrorKind::NotFound);
        assert_eq!(
            PlanboardError::EmptyDescription.kind(),
            ErrorKind::EmptyDescription
        );
        assert_eq!(
            PlanboardError::malformed("bad json").kind(),
            ErrorKind::MalformedInput
        );
    }

    #[test]
    fn test_error_kind_serializes_snake_case() {
        let json = serde_json::to_string(&ErrorKind::InvalidParent).unwrap();
        assert_eq!(json, r#""invalid_parent""#);
        let json = serde_json::to_string(&ErrorKind::EmptyDescription).unwrap();
        assert_eq!(json, r#""empty_description""#);
    }
}
