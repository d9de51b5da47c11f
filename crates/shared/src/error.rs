//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error taxonomy.
///
/// Every failure that crosses the HTTP boundary is translated into one of
/// these variants; the variant alone decides the response status code.
#[derive(Debug, Error)]
pub enum AppError {
    /// Uploaded file has a disallowed extension.
    #[error("Invalid file type: {extension}. Allowed types are: {allowed}.")]
    InvalidFileType {
        /// The rejected extension (lower-cased, with leading dot).
        extension: String,
        /// Comma-separated list of accepted extensions.
        allowed: String,
    },

    /// Share token is missing from the store or has expired.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Storage collaborator error. The message is generic on purpose:
    /// backend authentication failures must not leak credentials.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InvalidFileType { .. } => 400,
            Self::Unauthorized(_) => 401,
            Self::NotFound(_) => 404,
            Self::Storage(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidFileType { .. } => "INVALID_FILE_TYPE",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Storage(_) => "STORAGE_ERROR",
        }
    }
}
