//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or processing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A variable identifier does not match `[A-Za-z0-9_]+`.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// A required name is empty.
    #[error("{0} must not be empty")]
    EmptyName(&'static str),

    /// A username is empty or malformed.
    #[error("invalid username: {0}")]
    InvalidUsername(String),

    /// Setting the parent would make a variable its own ancestor.
    #[error("variable {0} cannot be its own ancestor")]
    ParentCycle(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
