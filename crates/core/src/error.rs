//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Every variant carries the human-readable message that is handed back to the
/// caller of an invocation, so `Display` prints the message as-is.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// An argument failed validation (empty, too long, wrong count, unknown kind).
    #[error("{0}")]
    Validation(String),

    /// A referenced record does not resolve.
    #[error("{0}")]
    NotFound(String),

    /// The listing's status forbids the requested operation.
    #[error("{0}")]
    InvalidState(String),

    /// The listing's owner type has no defined next custody step.
    #[error("{0}")]
    InvalidRole(String),

    /// A record invariant was violated (e.g. a supplier id that is not a supplier).
    #[error("{0}")]
    InvariantViolation(String),

    /// A conflict occurred (stale version / record already exists).
    #[error("{0}")]
    Conflict(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    pub fn invalid_role(msg: impl Into<String>) -> Self {
        Self::InvalidRole(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }
}
