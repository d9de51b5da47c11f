//! Storage collaborator interface and OpenDAL-backed client.
//!
//! The broker talks to the remote object-storage provider through the narrow
//! [`StorageClient`] capability interface. The production implementation is
//! vendor-agnostic via Apache OpenDAL:
//! - S3-compatible: Cloudflare R2, Supabase Storage, AWS S3, DigitalOcean Spaces
//! - Azure Blob Storage
//! - Local filesystem (development only)

mod config;
mod error;
mod service;
mod types;

pub use config::{StorageConfig, StorageProvider};
pub use error::StorageError;
pub use service::ObjectStoreClient;
pub use types::{DeleteReport, Document, FetchedDocument};

/// Capability interface to the remote object-storage provider.
///
/// Mirrors what the broker needs and nothing more: store bytes, fetch them
/// back, enumerate stored documents, resolve a preview URL, and bulk-delete.
pub trait StorageClient: Send + Sync {
    /// Stores `bytes` under a fresh document id derived from `name`.
    /// Returns the new document id.
    fn store(
        &self,
        bytes: bytes::Bytes,
        name: &str,
        content_type: &str,
    ) -> impl std::future::Future<Output = Result<String, StorageError>> + Send;

    /// Fetches document content and its MIME type.
    fn fetch(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = Result<FetchedDocument, StorageError>> + Send;

    /// Lists stored documents in the provider's native order.
    fn list(&self)
    -> impl std::future::Future<Output = Result<Vec<Document>, StorageError>> + Send;

    /// Resolves a time-limited preview URL for a stored document.
    fn preview_url(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = Result<String, StorageError>> + Send;

    /// Deletes every stored document, reporting per-item outcomes.
    fn delete_all(
        &self,
    ) -> impl std::future::Future<Output = Result<DeleteReport, StorageError>> + Send;
}
