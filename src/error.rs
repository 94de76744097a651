//! Domain error types for the QA tracking server.
//!
//! Uses thiserror for ergonomic error handling with automatic Display implementations.

use actix_web::{HttpResponse, ResponseError};
use std::fmt;

/// Application-level errors.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed
    #[error("Database error: {0}")]
    Database(String),

    /// Resource not found
    #[error("{0} not found")]
    NotFound(String),

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Submitted status or priority id does not resolve in the catalog
    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    /// Seed-dependent catalog entry is missing (operational misconfiguration)
    #[error("Missing reference data: {0}")]
    MissingSeedData(String),

    /// No resolvable actor on the request
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    /// Actor lacks a required role
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Concurrent-write conflict that persisted past the internal retry
    #[error("Conflict: {0}")]
    Conflict(String),
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let (status, error_code, response_message) = match self {
            AppError::Database(err_str) => {
                tracing::error!("Database error: {}", err_str);
                (
                    actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "An internal database error occurred".to_string(),
                )
            }
            AppError::NotFound(_) => (
                actix_web::http::StatusCode::NOT_FOUND,
                "NOT_FOUND",
                self.to_string(),
            ),
            AppError::InvalidInput(_) => (
                actix_web::http::StatusCode::BAD_REQUEST,
                "INVALID_INPUT",
                self.to_string(),
            ),
            AppError::InvalidStatus(_) => (
                actix_web::http::StatusCode::BAD_REQUEST,
                "INVALID_STATUS",
                self.to_string(),
            ),
            AppError::MissingSeedData(detail) => {
                // Not a user error: a seeded catalog row is gone.
                tracing::error!("Missing seed data, operator attention required: {}", detail);
                (
                    actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "MISSING_SEED_DATA",
                    "The system is missing required reference data".to_string(),
                )
            }
            AppError::Unauthenticated(_) => (
                actix_web::http::StatusCode::UNAUTHORIZED,
                "UNAUTHENTICATED",
                self.to_string(),
            ),
            AppError::Unauthorized(_) => (
                actix_web::http::StatusCode::FORBIDDEN,
                "UNAUTHORIZED",
                self.to_string(),
            ),
            AppError::Conflict(_) => (
                actix_web::http::StatusCode::CONFLICT,
                "CONFLICT",
                self.to_string(),
            ),
        };

        HttpResponse::build(status).json(ErrorResponse {
            error: error_code.to_string(),
            message: response_message,
        })
    }
}

/// Error response body matching OpenAPI schema.
#[derive(Debug, serde::Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

// Conversion implementations for common error types

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidInput(format!("JSON parsing error: {}", err))
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        AppError::Database(err.to_string())
    }
}

impl From<uuid::Error> for AppError {
    fn from(err: uuid::Error) -> Self {
        AppError::InvalidInput(format!("Invalid UUID: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_distinguishes_categories() {
        let unauthorized = AppError::Unauthorized("QA or Tester role required".to_string());
        let not_found = AppError::NotFound("Test run".to_string());
        let seed = AppError::MissingSeedData("Priority 'Medium' is not seeded".to_string());

        assert_eq!(
            unauthorized.to_string(),
            "Unauthorized: QA or Tester role required"
        );
        assert_eq!(not_found.to_string(), "Test run not found");
        assert_eq!(
            seed.to_string(),
            "Missing reference data: Priority 'Medium' is not seeded"
        );
    }

    #[test]
    fn test_status_codes() {
        use actix_web::http::StatusCode;

        assert_eq!(
            AppError::Unauthenticated("no token".to_string())
                .error_response()
                .status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Unauthorized("role".to_string())
                .error_response()
                .status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::InvalidStatus("unknown id".to_string())
                .error_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::MissingSeedData("Medium".to_string())
                .error_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Conflict("duplicate".to_string())
                .error_response()
                .status(),
            StatusCode::CONFLICT
        );
    }
}
