//! Document broker types and data structures.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A file submitted in an upload batch.
#[derive(Debug, Clone)]
pub struct UploadFile {
    /// Original file name, including extension.
    pub name: String,
    /// Raw file content.
    pub bytes: Bytes,
}

impl UploadFile {
    /// Create an upload file from a name and its content.
    #[must_use]
    pub fn new(name: impl Into<String>, bytes: Bytes) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

/// A stored document decorated with its download count, as returned by
/// the listing operation.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentView {
    /// Document id.
    pub id: String,
    /// Original file name.
    pub name: String,
    /// MIME type.
    pub mime_type: String,
    /// Creation timestamp, when the provider reports one.
    pub created_at: Option<DateTime<Utc>>,
    /// Provider thumbnail URL, when one exists.
    pub thumbnail_link: Option<String>,
    /// Downloads recorded within the current accounting window.
    pub download_count: u64,
}

/// A time-limited share link for a document.
#[derive(Debug, Clone, Serialize)]
pub struct SharedLink {
    /// Preview URL embedding the document id and token.
    pub url: String,
    /// The opaque share token.
    pub token: String,
    /// When the token expires.
    pub expires_at: DateTime<Utc>,
}
