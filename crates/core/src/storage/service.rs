//! Object-storage client implementation using Apache OpenDAL.

use std::time::Duration;

use bytes::Bytes;
use opendal::{Operator, services};
use tracing::warn;
use uuid::Uuid;

use super::config::{StorageConfig, StorageProvider};
use super::error::StorageError;
use super::types::{DeleteReport, Document, FetchedDocument};
use super::StorageClient;
use crate::document::validate::mime_type_for_name;

/// Storage client backed by an OpenDAL operator.
///
/// Document ids are object keys of the form `{uuid}_{sanitized_name}`; the
/// original file name is recovered from the key when listing. Preview URLs
/// are presigned GET requests, which also stand in for the provider's
/// out-of-band "make object publicly readable" step.
pub struct ObjectStoreClient {
    operator: Operator,
    config: StorageConfig,
}

impl ObjectStoreClient {
    /// Create a new storage client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage provider cannot be initialized.
    pub fn from_config(config: StorageConfig) -> Result<Self, StorageError> {
        let operator = Self::create_operator(&config.provider)?;
        Ok(Self { operator, config })
    }

    /// Create OpenDAL operator from provider config.
    fn create_operator(provider: &StorageProvider) -> Result<Operator, StorageError> {
        match provider {
            StorageProvider::S3 {
                endpoint,
                bucket,
                access_key_id,
                secret_access_key,
                region,
            } => {
                let builder = services::S3::default()
                    .endpoint(endpoint)
                    .bucket(bucket)
                    .access_key_id(access_key_id)
                    .secret_access_key(secret_access_key)
                    .region(region);

                Ok(Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish())
            }
            StorageProvider::AzureBlob {
                account,
                access_key,
                container,
            } => {
                let builder = services::Azblob::default()
                    .account_name(account)
                    .account_key(access_key)
                    .container(container);

                Ok(Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish())
            }
            StorageProvider::LocalFs { root } => {
                let builder = services::Fs::default().root(
                    root.to_str()
                        .ok_or_else(|| StorageError::configuration("invalid path"))?,
                );

                Ok(Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish())
            }
        }
    }

    /// Get the storage provider name.
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        self.config.provider.name()
    }

    /// Get the bucket/container name.
    #[must_use]
    pub fn bucket(&self) -> &str {
        self.config.provider.bucket()
    }

    /// Generate the object key for a new document.
    ///
    /// Format: `{uuid}_{sanitized_filename}`. The uuid has no underscores, so
    /// the original name is everything after the first `_`.
    #[must_use]
    pub fn generate_key(name: &str) -> String {
        format!("{}_{}", Uuid::new_v4(), sanitize_filename(name))
    }

    fn document_from_key(key: &str, mime_type: String, created_at: Option<chrono::DateTime<chrono::Utc>>) -> Document {
        let name = key.split_once('_').map_or(key, |(_, name)| name);
        Document {
            id: key.to_string(),
            name: name.to_string(),
            mime_type,
            created_at,
            thumbnail_link: None,
        }
    }
}

impl StorageClient for ObjectStoreClient {
    async fn store(
        &self,
        bytes: Bytes,
        name: &str,
        content_type: &str,
    ) -> Result<String, StorageError> {
        let key = Self::generate_key(name);

        self.operator
            .write_with(&key, bytes)
            .content_type(content_type)
            .await
            .map_err(StorageError::from)?;

        Ok(key)
    }

    async fn fetch(&self, id: &str) -> Result<FetchedDocument, StorageError> {
        let meta = self
            .operator
            .stat(id)
            .await
            .map_err(|e| match e.kind() {
                opendal::ErrorKind::NotFound => StorageError::not_found(id),
                _ => StorageError::from(e),
            })?;

        let buffer = self.operator.read(id).await.map_err(StorageError::from)?;

        // Not every backend persists the content type (local fs does not);
        // fall back to the extension embedded in the key.
        let mime_type = meta
            .content_type()
            .map_or_else(|| mime_type_for_name(id).to_string(), String::from);

        Ok(FetchedDocument {
            bytes: buffer.to_bytes(),
            mime_type,
        })
    }

    async fn list(&self) -> Result<Vec<Document>, StorageError> {
        let entries = self
            .operator
            .list("/")
            .await
            .map_err(StorageError::from)?;

        let mut documents = Vec::new();
        for entry in entries {
            if entry.metadata().is_dir() {
                continue;
            }

            let key = entry.path().trim_start_matches('/').to_string();
            let meta = self
                .operator
                .stat(&key)
                .await
                .map_err(StorageError::from)?;

            let mime_type = meta
                .content_type()
                .map_or_else(|| mime_type_for_name(&key).to_string(), String::from);

            documents.push(Self::document_from_key(
                &key,
                mime_type,
                meta.last_modified(),
            ));
        }

        Ok(documents)
    }

    async fn preview_url(&self, id: &str) -> Result<String, StorageError> {
        let ttl = Duration::from_secs(self.config.presign_ttl_secs);

        let presigned = self
            .operator
            .presign_read(id, ttl)
            .await
            .map_err(StorageError::from)?;

        Ok(presigned.uri().to_string())
    }

    async fn delete_all(&self) -> Result<DeleteReport, StorageError> {
        let documents = self.list().await?;

        let mut report = DeleteReport::default();
        for doc in documents {
            match self.operator.delete(&doc.id).await {
                Ok(()) => report.deleted.push(doc.id),
                Err(e) => {
                    warn!(id = %doc.id, error = %e, "Failed to delete document");
                    report.failed.push((doc.id, e.to_string()));
                }
            }
        }

        Ok(report)
    }
}

/// Sanitize filename for use in an object key.
///
/// Only allows ASCII alphanumeric characters, dots, hyphens, and underscores.
fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
