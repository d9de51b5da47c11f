//! Document broker service implementation.

use std::sync::Arc;

use super::error::DocumentError;
use super::stats::DownloadStats;
use super::token::TokenStore;
use super::types::{DocumentView, SharedLink, UploadFile};
use super::validate;
use crate::storage::{DeleteReport, FetchedDocument, StorageClient};

/// Access broker composing validation, share tokens, and download accounting
/// with the storage collaborator.
///
/// The token store and stats store are injected at construction so tests can
/// run isolated instances; the broker holds no ambient state.
pub struct DocumentService<S: StorageClient> {
    storage: Arc<S>,
    tokens: Arc<TokenStore>,
    stats: Arc<DownloadStats>,
    public_base_url: String,
}

impl<S: StorageClient> DocumentService<S> {
    /// Creates a new broker.
    #[must_use]
    pub fn new(
        storage: Arc<S>,
        tokens: Arc<TokenStore>,
        stats: Arc<DownloadStats>,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            storage,
            tokens,
            stats,
            public_base_url: public_base_url.into(),
        }
    }

    /// Uploads a batch of files, returning the accepted original names.
    ///
    /// Every name in the batch is validated before any byte is stored: the
    /// first disallowed extension fails the whole batch and nothing from the
    /// batch reaches storage, earlier valid files included.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFileType` on the first disallowed extension, or a
    /// storage error if a write fails.
    pub async fn upload(&self, files: Vec<UploadFile>) -> Result<Vec<String>, DocumentError> {
        let mut validated = Vec::with_capacity(files.len());
        for file in &files {
            validated.push(validate::validate_file_name(&file.name)?);
        }

        let mut stored_names = Vec::with_capacity(files.len());
        for (file, extension) in files.into_iter().zip(validated) {
            let content_type = validate::mime_type_for(extension);
            self.storage
                .store(file.bytes, &file.name, content_type)
                .await?;
            stored_names.push(file.name);
        }

        Ok(stored_names)
    }

    /// Lists stored documents, each decorated with its download count.
    ///
    /// Order follows the collaborator's native order.
    pub async fn list(&self) -> Result<Vec<DocumentView>, DocumentError> {
        let documents = self.storage.list().await?;

        Ok(documents
            .into_iter()
            .map(|d| {
                let download_count = self.stats.count(&d.id);
                DocumentView {
                    id: d.id,
                    name: d.name,
                    mime_type: d.mime_type,
                    created_at: d.created_at,
                    thumbnail_link: d.thumbnail_link,
                    download_count,
                }
            })
            .collect())
    }

    /// Downloads a document, recording the download on success.
    ///
    /// Token verification happens strictly before the fetch: a failed check
    /// causes no storage call and no count increment. A missing token passes
    /// (public access).
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for an invalid or expired token, or a storage
    /// error if the fetch fails.
    pub async fn download(
        &self,
        document_id: &str,
        token: Option<&str>,
    ) -> Result<FetchedDocument, DocumentError> {
        self.tokens.verify(token)?;

        let fetched = self.storage.fetch(document_id).await?;
        self.stats.record(document_id);

        Ok(fetched)
    }

    /// Issues a share link for a document.
    #[must_use]
    pub fn share(&self, document_id: &str) -> SharedLink {
        self.tokens.issue(&self.public_base_url, document_id)
    }

    /// Resolves a preview URL for a shared document.
    ///
    /// Returns `None` when token verification fails; the caller maps that to
    /// a not-found response rather than an auth failure, a deliberate
    /// softening for this one operation.
    ///
    /// # Errors
    ///
    /// Returns a storage error if URL resolution fails for a verified token.
    pub async fn preview_link(
        &self,
        document_id: &str,
        token: &str,
    ) -> Result<Option<String>, DocumentError> {
        if self.tokens.verify(Some(token)).is_err() {
            return Ok(None);
        }

        let url = self.storage.preview_url(document_id).await?;
        Ok(Some(url))
    }

    /// Deletes every stored document.
    ///
    /// Best-effort per item, but observable: the report names each deleted
    /// id and each failure.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the collaborator cannot enumerate documents.
    pub async fn delete_all(&self) -> Result<DeleteReport, DocumentError> {
        self.storage.delete_all().await.map_err(Into::into)
    }
}
