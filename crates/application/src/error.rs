//! Application error types

use shortpress_domain::DomainError;
use thiserror::Error;

use crate::ports::RepositoryError;
use crate::variable_resolver::ResolutionError;

/// Application-level errors.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// A domain validation error occurred.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// A variable value could not be resolved.
    #[error("resolution error: {0}")]
    Resolution(#[from] ResolutionError),

    /// The caller could not be identified.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The caller may not touch the resource.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// The operation collides with existing data.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The request is malformed.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A storage operation failed.
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<RepositoryError> for ApplicationError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::NotFound(what) => Self::NotFound(what),
            RepositoryError::Conflict(what) => Self::Conflict(what),
            RepositoryError::Invalid(what) => Self::InvalidInput(what),
            RepositoryError::Storage(what) => Self::Storage(what),
        }
    }
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
