//! Storage-side document types.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A document as reported by the storage provider.
///
/// Immutable from the broker's perspective; the broker only reads these via
/// `list` and `fetch`, it never mutates document content.
#[derive(Debug, Clone)]
pub struct Document {
    /// Provider-assigned document id (the object key).
    pub id: String,
    /// Original file name.
    pub name: String,
    /// MIME type recorded at upload.
    pub mime_type: String,
    /// Creation timestamp, when the provider reports one.
    pub created_at: Option<DateTime<Utc>>,
    /// Provider thumbnail URL, when one exists. Object stores report none.
    pub thumbnail_link: Option<String>,
}

/// Document content returned by `fetch`.
#[derive(Debug, Clone)]
pub struct FetchedDocument {
    /// Raw file bytes.
    pub bytes: Bytes,
    /// MIME type recorded at upload.
    pub mime_type: String,
}

/// Per-item outcome of a bulk delete.
///
/// The bulk delete stays best-effort (a failing item does not stop the rest)
/// but every failure is reported instead of being silently discarded.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DeleteReport {
    /// Ids deleted successfully.
    pub deleted: Vec<String>,
    /// Ids that failed, with the failure reason.
    pub failed: Vec<(String, String)>,
}

impl DeleteReport {
    /// True when every item was deleted.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}
