use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::extract::ExtractError;

/// A single violated constraint on a request field.
/// Validation collects every violation before failing, not just the first.
#[derive(Debug, Clone, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub reason: String,
}

impl FieldViolation {
    pub fn new(field: &str, reason: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation failed on {} field(s)", .0.len())]
    Validation(Vec<FieldViolation>),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("File too large: {size} bytes (max {max})")]
    FileTooLarge { size: usize, max: usize },

    #[error("Could not extract text: {0}")]
    CorruptFile(String),

    #[error("External model error: {0}")]
    ExternalService(String),

    #[error("Malformed request body: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Shorthand for a single-field validation failure.
    pub fn invalid(field: &str, reason: impl Into<String>) -> Self {
        AppError::Validation(vec![FieldViolation::new(field, reason)])
    }
}

impl From<ExtractError> for AppError {
    fn from(e: ExtractError) -> Self {
        match e {
            ExtractError::UnsupportedFormat(ext) => AppError::UnsupportedFormat(ext),
            ExtractError::CorruptFile(msg) => AppError::CorruptFile(msg),
            ExtractError::Encoding(msg) => AppError::CorruptFile(msg),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, detail) = match &self {
            AppError::Validation(violations) => {
                let detail = violations
                    .iter()
                    .map(|v| format!("{}: {}", v.field, v.reason))
                    .collect::<Vec<_>>()
                    .join("; ");
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", detail)
            }
            AppError::UnsupportedFormat(ext) => (
                StatusCode::BAD_REQUEST,
                "UNSUPPORTED_FORMAT",
                format!("Unsupported file format '{ext}'. Allowed: pdf, docx, txt"),
            ),
            AppError::FileTooLarge { size, max } => (
                StatusCode::BAD_REQUEST,
                "FILE_TOO_LARGE",
                format!("File is {size} bytes; the limit is {max} bytes"),
            ),
            AppError::CorruptFile(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "CORRUPT_FILE",
                msg.clone(),
            ),
            AppError::ExternalService(msg) => {
                tracing::error!("External model error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "EXTERNAL_SERVICE_ERROR",
                    "The language model backend is unavailable".to_string(),
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": code,
            "detail": detail
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_maps_to_400() {
        let err = AppError::invalid("job_description", "must not be empty");
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_validation_detail_lists_every_field() {
        let err = AppError::Validation(vec![
            FieldViolation::new("resume_text", "must not be empty"),
            FieldViolation::new("job_description", "must not be empty"),
        ]);
        assert!(err.to_string().contains("2 field(s)"));
    }

    #[test]
    fn test_corrupt_file_maps_to_422() {
        let err = AppError::CorruptFile("no text content".to_string());
        assert_eq!(
            err.into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_file_too_large_maps_to_400() {
        let err = AppError::FileTooLarge {
            size: 11_000_000,
            max: 10_485_760,
        };
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_external_service_maps_to_502() {
        let err = AppError::ExternalService("timeout".to_string());
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_encoding_extract_error_becomes_corrupt_file() {
        let err: AppError = ExtractError::Encoding("invalid UTF-8 at byte 4".to_string()).into();
        assert!(matches!(err, AppError::CorruptFile(_)));
    }
}
