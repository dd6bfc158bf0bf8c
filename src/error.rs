//! Error handling module
//!
//! Centralized error types and HTTP response conversion.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::domain::{AccountId, DomainError};
use crate::store::StoreError;

/// Application-wide Result type
pub type AppResult<T> = Result<T, AppError>;

/// Error classes, independent of transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unknown account, no retry benefit
    NotFound,
    /// Malformed request, caller must fix it
    InvalidInput,
    /// Business rule rejection, state unchanged
    LimitExceeded,
    /// Storage unavailable, timeout or contention; safe to retry
    Transient,
    /// Bug, corrupted data or a database failure a retry won't fix
    Internal,
}

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Client errors (4xx)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    // Domain errors
    #[error(transparent)]
    Domain(#[from] DomainError),

    // Server errors (5xx)
    #[error("Operation timed out")]
    Timeout,

    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::InvalidRequest(_) => ErrorKind::InvalidInput,
            AppError::AccountNotFound(_) => ErrorKind::NotFound,
            AppError::Domain(DomainError::LimitExceeded { .. }) => ErrorKind::LimitExceeded,
            AppError::Domain(e) if e.is_validation_error() => ErrorKind::InvalidInput,
            AppError::Domain(_) => ErrorKind::Internal,
            AppError::Timeout | AppError::Unavailable(_) => ErrorKind::Transient,
            AppError::Database(_) | AppError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Check if the caller may retry the same request
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Transient
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            // Retryable failures that escaped the store's own retry loop
            err if err.is_retryable() => AppError::Unavailable(err.to_string()),
            StoreError::AccountNotFound(id) => AppError::AccountNotFound(id),
            StoreError::Rejected(e) => AppError::Domain(e),
            StoreError::Database(e) => AppError::Database(e),
            StoreError::MaxRetriesExceeded => {
                AppError::Unavailable("maximum commit retries exceeded".to_string())
            }
            StoreError::InvalidRow(msg) => AppError::Internal(msg),
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code, details) = match &self {
            // 400 Bad Request
            AppError::InvalidRequest(msg) => {
                (StatusCode::BAD_REQUEST, "invalid_request", Some(msg.clone()))
            }

            // 404 Not Found
            AppError::AccountNotFound(id) => {
                (StatusCode::NOT_FOUND, "account_not_found", Some(id.to_string()))
            }

            // Domain errors - map to appropriate HTTP status
            AppError::Domain(domain_err) => match domain_err {
                DomainError::InvalidAmount(e) => {
                    (StatusCode::BAD_REQUEST, "invalid_amount", Some(e.to_string()))
                }
                DomainError::InvalidDescription(e) => {
                    (StatusCode::BAD_REQUEST, "invalid_description", Some(e.to_string()))
                }
                DomainError::InvalidKind(kind) => {
                    (StatusCode::BAD_REQUEST, "invalid_kind", Some(kind.clone()))
                }
                DomainError::LimitExceeded { .. } => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "limit_exceeded",
                    Some(domain_err.to_string()),
                ),
                DomainError::BalanceOverflow => (
                    StatusCode::BAD_REQUEST,
                    "balance_overflow",
                    Some(domain_err.to_string()),
                ),
            },

            // 503 Service Unavailable
            AppError::Timeout => (StatusCode::SERVICE_UNAVAILABLE, "timeout", None),
            AppError::Unavailable(msg) => {
                tracing::warn!("Storage unavailable: {}", msg);
                (StatusCode::SERVICE_UNAVAILABLE, "unavailable", None)
            }

            // 500 Internal Server Error
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "database_error", None)
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: self.to_string(),
            error_code: error_code.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}
