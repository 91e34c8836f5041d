//! Server-specific error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::db::DbError;
use crate::index::IndexError;

/// Result type alias for request handlers
pub type AppResult<T> = std::result::Result<T, AppError>;

/// Application error type converted to HTTP responses at the REST boundary
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Search index unreachable: {0}")]
    IndexUnreachable(String),

    #[error("Download error: {0}")]
    Download(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("DLP error: {0}")]
    Common(#[from] dlp_common::DlpError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Database(ref e) => {
                tracing::error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "A database error occurred".to_string())
            },
            AppError::NotFound(ref message) => (StatusCode::NOT_FOUND, message.clone()),
            AppError::Validation(ref message) => (StatusCode::BAD_REQUEST, message.clone()),
            AppError::BadRequest(ref message) => (StatusCode::BAD_REQUEST, message.clone()),
            AppError::Forbidden(ref message) => (StatusCode::FORBIDDEN, message.clone()),
            AppError::Conflict(ref message) => (StatusCode::CONFLICT, message.clone()),
            AppError::IndexUnreachable(ref message) => {
                tracing::error!("Search index unreachable: {}", message);
                (StatusCode::BAD_GATEWAY, "The search index is unreachable".to_string())
            },
            AppError::Download(ref message) => {
                tracing::error!("Download error: {}", message);
                (StatusCode::INTERNAL_SERVER_ERROR, message.clone())
            },
            AppError::Internal(ref message) => {
                tracing::error!("Internal error: {}", message);
                (StatusCode::INTERNAL_SERVER_ERROR, message.clone())
            },
            AppError::Io(ref e) => {
                tracing::error!("IO error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "An IO error occurred".to_string())
            },
            AppError::Common(ref e) => {
                tracing::error!("DLP error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            },
        };

        let body = Json(json!({
            "error": {
                "message": error_message,
                "status": status.as_u16(),
            }
        }));

        (status, body).into_response()
    }
}

impl From<DbError> for AppError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound(msg) => AppError::NotFound(msg),
            DbError::Duplicate(msg) => AppError::Conflict(msg),
            DbError::Config(msg) => AppError::Internal(msg),
            DbError::Decode(msg) => AppError::Internal(msg),
            DbError::Sqlx(e) => AppError::Database(e),
        }
    }
}

impl From<IndexError> for AppError {
    fn from(err: IndexError) -> Self {
        match err {
            IndexError::Unreachable(e) => AppError::IndexUnreachable(e.to_string()),
            IndexError::Status { status, body } => {
                AppError::IndexUnreachable(format!("index returned HTTP {status}: {body}"))
            },
            IndexError::Malformed(msg) => AppError::Internal(format!("malformed index response: {msg}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_not_found_maps_to_404() {
        let err: AppError = DbError::not_found("download job", "abc").into();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_db_duplicate_maps_to_conflict() {
        let err: AppError = DbError::duplicate("download job", "abc").into();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn test_error_display_includes_message() {
        let err = AppError::Download("render failed".to_string());
        assert_eq!(err.to_string(), "Download error: render failed");
    }
}
