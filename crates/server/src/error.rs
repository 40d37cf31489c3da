//! HTTP error mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use shortpress_application::ports::RepositoryError;
use shortpress_application::{ApplicationError, ResolutionError};
use thiserror::Error;
use tracing::error;

/// Errors that stop the server from starting or serving.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// `host` is not an IP address.
    #[error("invalid listen address: {0}")]
    Address(#[from] std::net::AddrParseError),

    /// Binding or serving failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The store could not be opened.
    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),

    /// Startup work such as admin bootstrap failed.
    #[error(transparent)]
    Application(#[from] ApplicationError),
}

/// An application error rendered as `{"error": kind, "detail": message}`.
#[derive(Debug)]
pub struct ApiError(pub ApplicationError);

impl ApiError {
    /// Status code and machine-readable kind for this error.
    #[must_use]
    pub const fn classify(&self) -> (StatusCode, &'static str) {
        match &self.0 {
            ApplicationError::Resolution(e) => match e {
                ResolutionError::InvalidReferenceSyntax(_) => {
                    (StatusCode::BAD_REQUEST, "invalid_reference_syntax")
                }
                ResolutionError::ReferenceNotFound(_) => {
                    (StatusCode::NOT_FOUND, "reference_not_found")
                }
                ResolutionError::MaxDepthExceeded { .. } => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "max_depth_exceeded")
                }
                ResolutionError::CyclicReference { .. } => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "cyclic_reference")
                }
            },
            ApplicationError::Domain(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            ApplicationError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "invalid_input"),
            ApplicationError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "unauthorized"),
            ApplicationError::Forbidden(_) => (StatusCode::FORBIDDEN, "forbidden"),
            ApplicationError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            ApplicationError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
            ApplicationError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }

    fn detail(&self) -> String {
        match &self.0 {
            ApplicationError::Resolution(e) => e.to_string(),
            ApplicationError::Domain(e) => e.to_string(),
            ApplicationError::Storage(_) => "internal server error".to_string(),
            ApplicationError::Unauthorized(msg)
            | ApplicationError::Forbidden(msg)
            | ApplicationError::NotFound(msg)
            | ApplicationError::Conflict(msg)
            | ApplicationError::InvalidInput(msg) => msg.clone(),
        }
    }
}

impl From<ApplicationError> for ApiError {
    fn from(error: ApplicationError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind) = self.classify();
        if status.is_server_error() {
            error!(error = %self.0, "request failed");
        }
        let body = json!({ "error": kind, "detail": self.detail() });
        (status, Json(body)).into_response()
    }
}

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;
