//! Error types module
//!
//! All errors surfaced by clipstream are unified under the `AppError` enum.
//! `ErrorMetadata` lets each variant self-describe its HTTP response
//! characteristics so the api crate can render them uniformly.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Expected errors like validation failures
    Debug,
    /// Recoverable issues
    Warn,
    /// Unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "NOT_FOUND")
    fn error_code(&self) -> &'static str;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden in production
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("File too large: {0}")]
    PayloadTooLarge(String),

    #[error("Range not satisfiable for resource of {size} bytes")]
    RangeNotSatisfiable { size: u64 },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Storage failure: {0}")]
    Storage(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        match self {
            AppError::InvalidInput(_) => 400,
            AppError::Unauthorized(_) => 401,
            AppError::Forbidden(_) => 403,
            AppError::NotFound(_) => 404,
            AppError::PayloadTooLarge(_) => 413,
            AppError::RangeNotSatisfiable { .. } => 416,
            AppError::Storage(_) | AppError::Database(_) | AppError::Internal(_) => 500,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => "INVALID_INPUT",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            AppError::RangeNotSatisfiable { .. } => "RANGE_NOT_SATISFIABLE",
            AppError::Storage(_) => "STORAGE_ERROR",
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn client_message(&self) -> String {
        match self {
            // Internal failure details stay out of responses
            AppError::Storage(_) => "Storage operation failed".to_string(),
            AppError::Database(_) => "Database operation failed".to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }

    fn is_sensitive(&self) -> bool {
        matches!(
            self,
            AppError::Storage(_) | AppError::Database(_) | AppError::Internal(_)
        )
    }

    fn log_level(&self) -> LogLevel {
        match self {
            AppError::InvalidInput(_)
            | AppError::NotFound(_)
            | AppError::PayloadTooLarge(_)
            | AppError::RangeNotSatisfiable { .. } => LogLevel::Debug,
            AppError::Unauthorized(_) | AppError::Forbidden(_) => LogLevel::Warn,
            AppError::Storage(_) | AppError::Database(_) | AppError::Internal(_) => LogLevel::Error,
        }
    }
}
