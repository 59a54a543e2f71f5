use async_trait::async_trait;

use crate::domain::{errors::DomainError, Document, DocumentId};

/// Persistence for document content and its filename sidecar.
///
/// A document exists iff its content exists. Metadata is written after the
/// content and its failures never fail `put` or `get`.
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    async fn exists(&self, id: &DocumentId) -> Result<bool, DomainError>;
    async fn put(&self, doc: &Document) -> Result<(), DomainError>;
    async fn get(&self, id: &DocumentId) -> Result<Document, DomainError>;
    async fn check_ready(&self) -> Result<(), DomainError>;
}
