pub mod tag;
pub mod video;

use clipstream_core::AppError;

/// Uniform mapping from sqlx failures to the app taxonomy; details stay in
/// the error for logging but never reach clients.
pub(crate) fn db_err(e: sqlx::Error) -> AppError {
    AppError::Database(e.to_string())
}
