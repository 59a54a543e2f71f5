use async_trait::async_trait;
use std::io::{self, ErrorKind};
use std::path::PathBuf;
use tracing::instrument;

use super::{StorageLayout, STAGING_GRACE};
use crate::domain::{
    ports::DocumentRepository, Document, DocumentId, DocumentMetadata, DomainError,
};

/// Documents as plain files under a storage root, one sidecar per document.
pub struct FsDocumentRepository {
    layout: StorageLayout,
}

impl FsDocumentRepository {
    /// Opens (creating if needed) the storage root and clears staging files
    /// older than [`STAGING_GRACE`]. Younger ones may belong to a writer that
    /// shares the root.
    pub async fn open(root: impl Into<PathBuf>) -> io::Result<Self> {
        let layout = StorageLayout::new(root);
        layout.ensure_root().await?;

        let removed = layout.sweep_staging(STAGING_GRACE).await?;
        if removed > 0 {
            tracing::info!(removed, root = %layout.root().display(), "removed stale staging files");
        }

        Ok(Self { layout })
    }

    async fn write_metadata(&self, id: &DocumentId, metadata: &DocumentMetadata) -> io::Result<()> {
        let bytes = metadata.to_json()?;
        self.layout
            .write_atomic(&self.layout.sidecar_path(id), &bytes)
            .await
    }

    async fn read_filename(&self, id: &DocumentId) -> Option<String> {
        let bytes = match tokio::fs::read(self.layout.sidecar_path(id)).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(id = %id, error = %e, "failed to read document metadata");
                return None;
            }
        };

        match DocumentMetadata::from_json(&bytes) {
            Ok(metadata) => metadata.filename,
            Err(e) => {
                tracing::warn!(id = %id, error = %e, "malformed document metadata");
                None
            }
        }
    }
}

#[async_trait]
impl DocumentRepository for FsDocumentRepository {
    async fn exists(&self, id: &DocumentId) -> Result<bool, DomainError> {
        tokio::fs::try_exists(self.layout.content_path(id))
            .await
            .map_err(|e| DomainError::storage(format!("failed to check document {id}: {e}")))
    }

    #[instrument(skip(self, doc), fields(id = %doc.id, size = doc.content.len()))]
    async fn put(&self, doc: &Document) -> Result<(), DomainError> {
        self.layout
            .write_atomic(&self.layout.content_path(&doc.id), &doc.content)
            .await
            .map_err(|e| DomainError::storage(format!("failed to write document {}: {e}", doc.id)))?;

        if let Err(e) = self.write_metadata(&doc.id, &doc.metadata()).await {
            tracing::warn!(id = %doc.id, error = %e, "failed to write document metadata");
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn get(&self, id: &DocumentId) -> Result<Document, DomainError> {
        let content = match tokio::fs::read(self.layout.content_path(id)).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(DomainError::not_found(format!("document {id} not found")));
            }
            Err(e) => {
                return Err(DomainError::storage(format!(
                    "failed to read document {id}: {e}"
                )));
            }
        };

        let filename = self.read_filename(id).await;
        Ok(Document::new(id.clone(), content).with_filename(filename))
    }

    async fn check_ready(&self) -> Result<(), DomainError> {
        let metadata = tokio::fs::metadata(self.layout.root())
            .await
            .map_err(|e| DomainError::storage(format!("storage root unavailable: {e}")))?;

        if !metadata.is_dir() {
            return Err(DomainError::storage("storage root is not a directory"));
        }
        Ok(())
    }
}
