//! Ledger operation error.

use thiserror::Error;

use foodtrace_core::DomainError;

use crate::entity_store::StoreError;

/// Failure of a ledger operation.
///
/// `Display` yields the human-readable message returned to the invoker.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// A stored document could not be encoded or decoded.
    #[error("{0}")]
    Serialization(String),

    #[error("Received unknown invoke function name - '{0}'")]
    UnknownFunction(String),

    #[error("Unknown supported call - Query()")]
    QueryUnsupported,
}

impl LedgerError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Domain(DomainError::validation(msg))
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::Domain(DomainError::not_found(msg))
    }
}
