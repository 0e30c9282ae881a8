//! HTTP error response conversion
//!
//! **Preferred handler pattern:** Return `Result<impl IntoResponse, HttpAppError>`.
//! Use `AppError` (or types that implement `Into<AppError>`) for errors so they
//! render consistently (status, body, logging).

use axum::{
    body::Body,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use clipstream_core::{AppError, ErrorMetadata, LogLevel};
use clipstream_storage::StorageError;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
            code: code.into(),
        }
    }
}

/// Wrapper type for AppError to implement IntoResponse
/// This is necessary because of Rust's orphan rules - we can't implement
/// IntoResponse (external trait) for AppError (external type from clipstream-core)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::Internal(err.to_string()))
    }
}

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        HttpAppError(storage_to_app(err))
    }
}

/// Map storage failures into the app taxonomy. A missing blob surfaces as
/// `NotFound`; an `InvalidRange` at this layer means the caller bypassed
/// `RangeSpec::resolve` and is treated as an internal bug rather than a 416.
pub fn storage_to_app(err: StorageError) -> AppError {
    match err {
        StorageError::NotFound(key) => AppError::NotFound(format!("Blob not found: {}", key)),
        StorageError::InvalidKey(msg) => AppError::InvalidInput(msg),
        StorageError::InvalidRange { start, end, size } => AppError::Internal(format!(
            "Unvalidated byte window {}-{} reached storage (blob size {})",
            start, end, size
        )),
        StorageError::WriteFailed(msg)
        | StorageError::ReadFailed(msg)
        | StorageError::DeleteFailed(msg) => AppError::Storage(msg),
        StorageError::Io(e) => AppError::Storage(format!("IO error: {}", e)),
        StorageError::ConfigError(msg) => AppError::Internal(msg),
    }
}

fn log_error(error: &AppError) {
    let code = error.error_code();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, code = code, "Request failed");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, code = code, "Request failed");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, code = code, "Request failed");
        }
    }
}

fn is_production_env() -> bool {
    std::env::var("ENVIRONMENT")
        .map(|env| matches!(env.to_lowercase().as_str(), "production" | "prod"))
        .unwrap_or(false)
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        log_error(app_error);

        // RFC 7233: an unsatisfiable range answers with Content-Range: bytes */<size>
        // and no body, not the JSON error shape.
        if let AppError::RangeNotSatisfiable { size } = app_error {
            return Response::builder()
                .status(StatusCode::RANGE_NOT_SATISFIABLE)
                .header(header::CONTENT_RANGE, format!("bytes */{}", size))
                .body(Body::empty())
                .unwrap_or_else(|_| StatusCode::RANGE_NOT_SATISFIABLE.into_response());
        }

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // Always hide details in production; outside production, only
        // non-sensitive errors carry them.
        let details = if is_production_env() || app_error.is_sensitive() {
            None
        } else {
            Some(app_error.to_string())
        };

        let body = Json(ErrorResponse {
            error: app_error.client_message(),
            details,
            code: app_error.error_code().to_string(),
        });

        (status, body).into_response()
    }
}
