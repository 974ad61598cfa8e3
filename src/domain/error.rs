//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violated tree invariants.
///
/// Lookups that miss are not errors: they surface as `None`/`false`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("duplicate item id: {0}")]
    DuplicateId(String),
}

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, DomainError>;
