use std::sync::Arc;
use tracing::instrument;

use super::IdentifierGenerator;
use crate::domain::{ports::DocumentRepository, Document, DocumentId, DomainError};

pub struct DocumentService {
    repository: Arc<dyn DocumentRepository>,
    ids: IdentifierGenerator,
}

impl DocumentService {
    pub fn new(repository: Arc<dyn DocumentRepository>) -> Self {
        Self {
            ids: IdentifierGenerator::new(repository.clone()),
            repository,
        }
    }

    /// Stores `content` under a freshly allocated identifier.
    #[instrument(skip(self, content), fields(size = content.len()))]
    pub async fn upload(
        &self,
        content: Vec<u8>,
        filename: Option<String>,
    ) -> Result<DocumentId, DomainError> {
        let id = self.ids.allocate().await?;
        let doc = Document::new(id.clone(), content).with_filename(filename);
        self.repository.put(&doc).await?;

        tracing::info!(id = %id, size = doc.content.len(), "document stored");
        Ok(id)
    }

    /// Looks a document up by a caller-supplied identifier.
    ///
    /// Identifiers that could never have been issued are reported as not found.
    #[instrument(skip(self))]
    pub async fn fetch(&self, raw_id: &str) -> Result<Document, DomainError> {
        let id = DocumentId::parse(raw_id)
            .map_err(|_| DomainError::not_found(format!("document {raw_id:?} not found")))?;
        self.repository.get(&id).await
    }

    pub async fn check_ready(&self) -> Result<(), DomainError> {
        self.repository.check_ready().await
    }
}
