//! Error types for Broadsheet services
//!
//! Provides:
//! - Distinct error types for bind, validation, lookup and storage failures
//! - HTTP status code mapping
//! - Structured error responses that never leak server-side detail

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{DbErr, SqlErr};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pagination::CursorError;

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

/// Message returned to clients for every 5xx response
pub const INTERNAL_ERROR_MESSAGE: &str = "server internal error";

/// Message returned when a title is already taken
pub const DUPLICATE_MESSAGE: &str = "already exists";

/// Message returned when an article id does not resolve
pub const NOT_FOUND_MESSAGE: &str = "not found";

/// Error codes for machine-readable error identification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Request errors (1xxx)
    BindError,
    ValidationError,
    InvalidCursor,
    UnknownAuthor,

    // Resource errors (4xxx)
    ArticleNotFound,

    // Conflict errors (5xxx)
    Conflict,

    // Database errors (7xxx)
    DatabaseError,
    ConnectionError,

    // Internal errors (9xxx)
    InternalError,
}

impl ErrorCode {
    /// Get the numeric code for this error
    pub fn as_code(&self) -> u16 {
        match self {
            ErrorCode::BindError => 1001,
            ErrorCode::ValidationError => 1002,
            ErrorCode::InvalidCursor => 1003,
            ErrorCode::UnknownAuthor => 1004,

            ErrorCode::ArticleNotFound => 4001,

            ErrorCode::Conflict => 5001,

            ErrorCode::DatabaseError => 7001,
            ErrorCode::ConnectionError => 7002,

            ErrorCode::InternalError => 9001,
        }
    }
}

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Request shape errors
    #[error("Malformed request: {message}")]
    Bind { message: String },

    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        details: Option<serde_json::Value>,
    },

    #[error("Invalid cursor: {0}")]
    InvalidCursor(#[from] CursorError),

    #[error("not exists author id: {id}")]
    UnknownAuthor { id: i64 },

    // Resource errors
    #[error("Article not found: {id}")]
    ArticleNotFound { id: i64 },

    // Conflict errors
    #[error("Duplicate resource: {message}")]
    Duplicate { message: String },

    // Database errors
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Database connection error: {message}")]
    DatabaseConnection { message: String },

    // Internal errors
    #[error("Internal server error: {message}")]
    Internal { message: String },
}

impl AppError {
    /// Build a validation error from `validator` output, keeping the field
    /// breakdown as response details.
    pub fn from_validation(errors: validator::ValidationErrors) -> Self {
        AppError::Validation {
            message: errors.to_string(),
            details: serde_json::to_value(&errors).ok(),
        }
    }

    /// Get the error code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Bind { .. } => ErrorCode::BindError,
            AppError::Validation { .. } => ErrorCode::ValidationError,
            AppError::InvalidCursor(_) => ErrorCode::InvalidCursor,
            AppError::UnknownAuthor { .. } => ErrorCode::UnknownAuthor,
            AppError::ArticleNotFound { .. } => ErrorCode::ArticleNotFound,
            AppError::Duplicate { .. } => ErrorCode::Conflict,
            AppError::Database(_) => ErrorCode::DatabaseError,
            AppError::DatabaseConnection { .. } => ErrorCode::ConnectionError,
            AppError::Internal { .. } => ErrorCode::InternalError,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 400 Bad Request
            AppError::Bind { .. }
            | AppError::Validation { .. }
            | AppError::InvalidCursor(_)
            | AppError::UnknownAuthor { .. } => StatusCode::BAD_REQUEST,

            // 404 Not Found
            AppError::ArticleNotFound { .. } => StatusCode::NOT_FOUND,

            // 409 Conflict
            AppError::Duplicate { .. } => StatusCode::CONFLICT,

            // 500 Internal Server Error
            AppError::Database(_)
            | AppError::DatabaseConnection { .. }
            | AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Check if this error should be logged at error level
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// Check if this error is a client error
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }

    /// Message exposed to the client. Conflicts, missing articles and server
    /// errors use fixed texts; the full error only goes to the log.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Duplicate { .. } => DUPLICATE_MESSAGE.to_string(),
            AppError::ArticleNotFound { .. } => NOT_FOUND_MESSAGE.to_string(),
            _ if self.is_server_error() => INTERNAL_ERROR_MESSAGE.to_string(),
            _ => self.to_string(),
        }
    }
}

/// Classify a write failure: constraint violations become client-facing
/// errors, anything else stays a database error.
pub fn classify_write_error(err: DbErr, title: &str, author_id: i64) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::Duplicate {
            message: format!("article with title '{}' already exists", title),
        },
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => AppError::UnknownAuthor { id: author_id },
        _ => AppError::Database(err),
    }
}

/// Error response body: `message` at the top level, with the
/// machine-readable code and optional field details beside it
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    pub code: ErrorCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();

        // Log based on severity
        if self.is_server_error() {
            tracing::error!(
                error = %self,
                code = ?code,
                status = status.as_u16(),
                "Server error"
            );
        } else if self.is_client_error() {
            tracing::warn!(
                error = %self,
                code = ?code,
                status = status.as_u16(),
                "Client error"
            );
        }

        let message = self.public_message();
        let details = match self {
            AppError::Validation { details, .. } => details,
            _ => None,
        };

        let body = ErrorResponse {
            message,
            code,
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Bind {
            message: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Bind {
            message: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Bind {
            message: rejection.body_text(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_mapping() {
        let err = AppError::ArticleNotFound { id: 7 };
        assert_eq!(err.code(), ErrorCode::ArticleNotFound);
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.public_message(), NOT_FOUND_MESSAGE);
    }

    #[tokio::test]
    async fn test_response_body_has_top_level_message() {
        let response = AppError::Duplicate {
            message: "article with title 'Hello' already exists".into(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["message"], "already exists");
        assert_eq!(body["code"], "CONFLICT");
        assert!(body.get("details").is_none());
        assert!(body.get("error").is_none());
    }

    #[test]
    fn test_validation_error() {
        let err = AppError::Validation {
            message: "id must be non-zero".into(),
            details: None,
        };
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(!err.is_server_error());
        assert!(err.is_client_error());
    }

    #[test]
    fn test_conflict_and_unknown_author() {
        let dup = AppError::Duplicate { message: "already exists".into() };
        assert_eq!(dup.status_code(), StatusCode::CONFLICT);
        assert_eq!(dup.code().as_code(), 5001);
        assert_eq!(dup.public_message(), DUPLICATE_MESSAGE);

        let author = AppError::UnknownAuthor { id: 999 };
        assert_eq!(author.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(author.public_message(), "not exists author id: 999");
    }

    #[test]
    fn test_server_error_hides_detail() {
        let err = AppError::Internal {
            message: "connection reset by peer".into(),
        };
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.is_server_error());
        assert_eq!(err.public_message(), INTERNAL_ERROR_MESSAGE);
    }

    #[test]
    fn test_cursor_error_is_client_error() {
        let err: AppError = CursorError::InvalidFormat("garbage".into()).into();
        assert_eq!(err.code(), ErrorCode::InvalidCursor);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_unclassified_write_error_stays_internal() {
        let err = classify_write_error(DbErr::Custom("disk full".into()), "Hello", 1);
        assert!(matches!(err, AppError::Database(_)));
        assert!(err.is_server_error());
    }
}
