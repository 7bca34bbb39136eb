//! Error types and HTTP response conversion

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::listing::EntityKind;
use crate::repository::error::{RepositoryError, RepositoryErrorKind};

/// Result type alias using the service error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the service
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    /// Structured repository error
    #[error("{0}")]
    Repository(RepositoryError),

    /// Invalid listing request: bad page parameters, an unknown sort
    /// field, or a storage fault while resolving the page
    #[error("{0} listing rejected: page number and page size must not be less than 1 and sortBy, sortDir properly given")]
    InvalidPaging(EntityKind),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Resource not found
    #[error("{0}")]
    NotFound(String),

    /// Bad request
    #[error("{0}")]
    BadRequest(String),

    /// Internal server error
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Response envelope for errors and status messages
///
/// The same `{message, success, status}` shape is used for delete
/// confirmations and upload acknowledgements.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiMessage {
    pub message: String,
    pub success: bool,
    pub status: u16,
}

impl ApiMessage {
    /// Success message with the given status code
    pub fn success(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: true,
            status: status.as_u16(),
        }
    }

    /// Failure message with the given status code
    pub fn failure(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: false,
            status: status.as_u16(),
        }
    }
}

impl fmt::Display for ApiMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Error::Config(e) => {
                tracing::error!("Configuration error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiMessage::failure(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Service configuration error",
                    ),
                )
            }

            Error::Repository(ref e) => {
                tracing::error!(
                    operation = %e.operation,
                    kind = %e.kind,
                    entity_type = ?e.entity_type,
                    entity_id = ?e.entity_id,
                    "Repository error: {}", e.message
                );

                let status = match e.kind {
                    RepositoryErrorKind::NotFound => StatusCode::NOT_FOUND,
                    RepositoryErrorKind::ConstraintViolation => StatusCode::CONFLICT,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };

                let message = match e.kind {
                    RepositoryErrorKind::NotFound => match (&e.entity_type, &e.entity_id) {
                        (Some(entity_type), Some(entity_id)) => {
                            format!("{} not found with id {}", entity_type, entity_id)
                        }
                        _ => e.message.clone(),
                    },
                    RepositoryErrorKind::ConstraintViolation => {
                        "Operation conflicts with existing data".to_string()
                    }
                    _ => "Storage operation failed".to_string(),
                };

                (status, ApiMessage::failure(status, message))
            }

            Error::InvalidPaging(kind) => {
                tracing::warn!(kind = %kind, "Rejected invalid listing request");
                (
                    StatusCode::BAD_REQUEST,
                    ApiMessage::failure(StatusCode::BAD_REQUEST, self.to_string()),
                )
            }

            Error::Io(e) => {
                tracing::error!("I/O error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiMessage::failure(StatusCode::INTERNAL_SERVER_ERROR, "I/O operation failed"),
                )
            }

            Error::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ApiMessage::failure(StatusCode::NOT_FOUND, msg),
            ),

            Error::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ApiMessage::failure(StatusCode::BAD_REQUEST, msg),
            ),

            Error::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiMessage::failure(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(Box::new(err))
    }
}

impl From<RepositoryError> for Error {
    fn from(err: RepositoryError) -> Self {
        Error::Repository(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_message_success() {
        let msg = ApiMessage::success(StatusCode::OK, "Category deleted successfully!");
        assert!(msg.success);
        assert_eq!(msg.status, 200);
        assert_eq!(msg.message, "Category deleted successfully!");
    }

    #[test]
    fn test_api_message_failure() {
        let msg = ApiMessage::failure(StatusCode::NOT_FOUND, "User not found");
        assert!(!msg.success);
        assert_eq!(msg.status, 404);
    }

    #[test]
    fn test_invalid_paging_message_names_the_kind() {
        let err = Error::InvalidPaging(EntityKind::Category);
        let rendered = err.to_string();
        assert!(rendered.starts_with("category listing rejected"));
        assert!(rendered.contains("sortBy, sortDir"));
    }

    #[test]
    fn test_repository_error_maps_not_found() {
        let repo_err = RepositoryError::not_found("user", "abc-123");
        let err = Error::from(repo_err);
        assert!(matches!(
            err,
            Error::Repository(RepositoryError {
                kind: RepositoryErrorKind::NotFound,
                ..
            })
        ));
    }
}
