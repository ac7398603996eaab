//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent misuse of the tree model or predicate factories.
///
/// Traversal itself never fails; "nothing found" is `None`.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DomainError {
    #[error("unknown role: {0}")]
    UnknownRole(String),

    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("invalid predicate: {0}")]
    InvalidPredicate(String),

    #[error("invalid move: {0}")]
    InvalidMove(String),

    #[error("node no longer exists in the tree")]
    NodeGone,
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
