//! Error types.
//!
//! - [`StoreError`] - failures surfaced by a [`UrlRepository`](crate::domain::repositories::UrlRepository)
//! - [`AppError`] - HTTP-facing error with a JSON body

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use validator::ValidationErrors;

use crate::application::services::ShortenError;

/// A failure reported by the store collaborator.
///
/// Driver errors are wrapped as-is; nothing is reclassified. Use
/// [`StoreError::is_unique_violation`] to tell a duplicate key apart from
/// other failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error("duplicate key value violates unique constraint: id = {0}")]
    Duplicate(String),
}

impl StoreError {
    /// Returns true if the store rejected a write because the key already exists.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            StoreError::Database(e) => e
                .as_database_error()
                .is_some_and(|db| db.is_unique_violation()),
            StoreError::Duplicate(_) => true,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Error payload returned to API clients.
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    Validation { message: String, details: Value },
    #[error("{message}")]
    Conflict { message: String, details: Value },
    #[error("{message}")]
    Internal { message: String, details: Value },
    #[error("{message}")]
    Unavailable { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }
    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }
    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }
    pub fn unavailable(message: impl Into<String>, details: Value) -> Self {
        Self::Unavailable {
            message: message.into(),
            details,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    pub fn to_error_info(self) -> ErrorInfo {
        let (code, message, details) = match self {
            AppError::Validation { message, details } => ("validation_error", message, details),
            AppError::Conflict { message, details } => ("conflict", message, details),
            AppError::Internal { message, details } => ("internal_error", message, details),
            AppError::Unavailable { message, details } => ("unavailable", message, details),
        };

        ErrorInfo {
            code,
            message,
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let message = errors
            .field_errors()
            .values()
            .flat_map(|errs| errs.iter())
            .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| "Validation failed".to_string());

        AppError::bad_request(message, json!({ "fields": errors }))
    }
}

impl From<ShortenError> for AppError {
    fn from(err: ShortenError) -> Self {
        match err {
            ShortenError::EmptyUrl => AppError::bad_request("Missing URL parameter", json!({})),
            ShortenError::Store(e) => map_store_error(e),
        }
    }
}

/// Maps a store failure to an HTTP error, keeping the driver message.
pub fn map_store_error(e: StoreError) -> AppError {
    if e.is_unique_violation() {
        let constraint = match &e {
            StoreError::Database(sqlx_err) => sqlx_err
                .as_database_error()
                .and_then(|db| db.constraint().map(str::to_string)),
            StoreError::Duplicate(_) => None,
        };
        return AppError::conflict(
            format!("Unable to shorten URL: {e}"),
            json!({ "constraint": constraint }),
        );
    }

    AppError::internal(format!("Unable to shorten URL: {e}"), json!({}))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_is_unique_violation() {
        let err = StoreError::Duplicate("hBreFgHC".to_string());
        assert!(err.is_unique_violation());
    }

    #[test]
    fn test_pool_timeout_is_not_unique_violation() {
        let err = StoreError::from(sqlx::Error::PoolTimedOut);
        assert!(!err.is_unique_violation());
    }

    #[test]
    fn test_database_error_message_is_verbatim() {
        let inner = sqlx::Error::Protocol("connection reset".to_string());
        let expected = inner.to_string();
        let err = StoreError::from(inner);
        assert_eq!(err.to_string(), expected);
    }

    #[test]
    fn test_empty_url_maps_to_bad_request() {
        let err = AppError::from(ShortenError::EmptyUrl);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Missing URL parameter");
    }

    #[test]
    fn test_duplicate_maps_to_conflict() {
        let err = AppError::from(ShortenError::Store(StoreError::Duplicate(
            "hBreFgHC".to_string(),
        )));
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_other_store_errors_map_to_internal() {
        let err = AppError::from(ShortenError::Store(StoreError::from(
            sqlx::Error::PoolClosed,
        )));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().starts_with("Unable to shorten URL: "));
    }

    #[test]
    fn test_error_info_codes() {
        let info = AppError::unavailable("down", json!({})).to_error_info();
        assert_eq!(info.code, "unavailable");
        assert_eq!(info.message, "down");
    }
}
