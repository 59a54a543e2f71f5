use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::{
    ports::DocumentRepository, Document, DocumentId, DocumentMetadata, DomainError,
};

/// Map-backed repository with the same content/metadata split as the file store.
pub struct InMemoryDocumentRepository {
    contents: RwLock<HashMap<DocumentId, Vec<u8>>>,
    metadata: RwLock<HashMap<DocumentId, DocumentMetadata>>,
    fail_metadata_writes: bool,
}

impl InMemoryDocumentRepository {
    pub fn new() -> Self {
        Self {
            contents: RwLock::new(HashMap::new()),
            metadata: RwLock::new(HashMap::new()),
            fail_metadata_writes: false,
        }
    }

    /// Every metadata write fails, content writes still succeed.
    pub fn with_failing_metadata() -> Self {
        Self {
            fail_metadata_writes: true,
            ..Self::new()
        }
    }

    pub fn len(&self) -> usize {
        self.contents.read().map(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn write_metadata(&self, id: &DocumentId, meta: DocumentMetadata) -> Result<(), DomainError> {
        if self.fail_metadata_writes {
            return Err(DomainError::storage("metadata writes disabled"));
        }
        self.metadata
            .write()
            .map_err(|e| DomainError::storage(e.to_string()))?
            .insert(id.clone(), meta);
        Ok(())
    }
}

impl Default for InMemoryDocumentRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentRepository for InMemoryDocumentRepository {
    async fn exists(&self, id: &DocumentId) -> Result<bool, DomainError> {
        let contents = self
            .contents
            .read()
            .map_err(|e| DomainError::storage(e.to_string()))?;
        Ok(contents.contains_key(id))
    }

    async fn put(&self, doc: &Document) -> Result<(), DomainError> {
        self.contents
            .write()
            .map_err(|e| DomainError::storage(e.to_string()))?
            .insert(doc.id.clone(), doc.content.clone());

        if let Err(e) = self.write_metadata(&doc.id, doc.metadata()) {
            tracing::warn!(id = %doc.id, error = %e, "failed to write document metadata");
        }
        Ok(())
    }

    async fn get(&self, id: &DocumentId) -> Result<Document, DomainError> {
        let content = self
            .contents
            .read()
            .map_err(|e| DomainError::storage(e.to_string()))?
            .get(id)
            .cloned()
            .ok_or_else(|| DomainError::not_found(format!("document {id} not found")))?;

        let filename = self
            .metadata
            .read()
            .ok()
            .and_then(|m| m.get(id).and_then(|meta| meta.filename.clone()));

        Ok(Document::new(id.clone(), content).with_filename(filename))
    }

    async fn check_ready(&self) -> Result<(), DomainError> {
        Ok(())
    }
}
