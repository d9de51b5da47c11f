//! Document broker error types.

use thiserror::Error;

use crate::storage::StorageError;
use docvault_shared::AppError;

/// Message for a token that never resolved in the store.
pub(crate) const MSG_INVALID_TOKEN: &str = "invalid or expired token";

/// Message for a token that resolved but whose stored expiry has passed.
pub(crate) const MSG_LINK_EXPIRED: &str = "link expired";

/// Document broker errors.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Uploaded file has a disallowed extension.
    #[error("invalid file type: {extension}. Allowed types are: {allowed}.")]
    InvalidFileType {
        /// The rejected extension (lower-cased, with leading dot).
        extension: String,
        /// Comma-separated list of accepted extensions.
        allowed: String,
    },

    /// Share token missing from the store, or expired.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Storage collaborator failure.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl From<DocumentError> for AppError {
    fn from(err: DocumentError) -> Self {
        match err {
            DocumentError::InvalidFileType { extension, allowed } => {
                Self::InvalidFileType { extension, allowed }
            }
            DocumentError::Unauthorized(msg) => Self::Unauthorized(msg),
            DocumentError::Storage(StorageError::NotFound { id }) => Self::NotFound(id),
            // Backend failures surface with a generic message so that
            // provider credentials and tokens never leak into responses.
            DocumentError::Storage(_) => Self::Storage("storage backend request failed".into()),
        }
    }
}
