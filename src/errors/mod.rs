//! Error handling module for the SAGE backend.
//!
//! Provides centralized error types with mapping to HTTP status codes and response envelopes.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Error codes as constants to avoid stringly-typed errors.
pub mod codes {
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
    pub const COLLABORATOR_ERROR: &str = "COLLABORATOR_ERROR";
    pub const BAD_REQUEST: &str = "BAD_REQUEST";
}

/// Maximum number of upstream characters echoed back or logged.
const RAW_PREVIEW_CHARS: usize = 2_000;

/// Application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Caller-supplied data broke a structural rule
    #[error("{0}")]
    Validation(String),
    /// Resource not found
    #[error("{0}")]
    NotFound(String),
    /// The persistence layer failed
    #[error("{0}")]
    Storage(String),
    /// The external completion service failed or returned unusable content
    #[error("{message}")]
    Collaborator {
        message: String,
        raw: Option<String>,
    },
    /// Malformed request
    #[error("{0}")]
    BadRequest(String),
}

impl AppError {
    /// Build a collaborator error, keeping the upstream text for diagnostics.
    pub fn collaborator(message: impl Into<String>, raw: Option<String>) -> Self {
        let message = message.into();
        match &raw {
            Some(text) => tracing::warn!(
                "Collaborator error: {} (upstream: {})",
                message,
                preview(text)
            ),
            None => tracing::warn!("Collaborator error: {}", message),
        }
        AppError::Collaborator { message, raw }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Collaborator { .. } => StatusCode::BAD_GATEWAY,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => codes::VALIDATION_ERROR,
            AppError::NotFound(_) => codes::NOT_FOUND,
            AppError::Storage(_) => codes::STORAGE_ERROR,
            AppError::Collaborator { .. } => codes::COLLABORATOR_ERROR,
            AppError::BadRequest(_) => codes::BAD_REQUEST,
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("Database error: {:?}", err);
        AppError::Storage(format!("Database error: {}", err))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("Rejected request body: {}", rejection.body_text());
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        // Only stored documents pass through serde_json here; request bodies
        // are turned into BadRequest by the ApiJson extractor.
        tracing::error!("Document encoding error: {:?}", err);
        AppError::Storage(format!("Document encoding error: {}", err))
    }
}

/// Shorten upstream text to a bounded preview.
pub fn preview(text: &str) -> String {
    if text.chars().count() <= RAW_PREVIEW_CHARS {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(RAW_PREVIEW_CHARS).collect();
    cut.push('…');
    cut
}

/// Error details in the response envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Error response envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetails,
}

impl ErrorResponse {
    pub fn new(error: &AppError) -> Self {
        let details = match error {
            AppError::Collaborator { raw: Some(raw), .. } => {
                Some(serde_json::json!({ "rawResponse": preview(raw) }))
            }
            _ => None,
        };

        Self {
            success: false,
            error: ErrorDetails {
                code: error.error_code().to_string(),
                message: error.to_string(),
                details,
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse::new(&self);
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::Validation("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Storage("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::collaborator("x", None).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AppError::BadRequest("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_collaborator_envelope_keeps_raw_text() {
        let err = AppError::collaborator("bad output", Some("not json at all".to_string()));
        let body = ErrorResponse::new(&err);
        assert!(!body.success);
        assert_eq!(body.error.code, codes::COLLABORATOR_ERROR);
        assert_eq!(body.error.message, "bad output");
        assert_eq!(
            body.error.details.unwrap()["rawResponse"],
            "not json at all"
        );
    }

    #[test]
    fn test_validation_envelope_has_no_details() {
        let body = ErrorResponse::new(&AppError::Validation("Title is required".into()));
        assert_eq!(body.error.code, codes::VALIDATION_ERROR);
        assert!(body.error.details.is_none());
    }

    #[test]
    fn test_preview_truncates_long_text() {
        let long = "a".repeat(RAW_PREVIEW_CHARS + 10);
        let cut = preview(&long);
        assert_eq!(cut.chars().count(), RAW_PREVIEW_CHARS + 1);
        assert!(cut.ends_with('…'));
        assert_eq!(preview("short"), "short");
    }
}
