use std::sync::Arc;
use tracing::instrument;

use crate::domain::{ports::DocumentRepository, DocumentId, DomainError};

/// Hands out identifiers that are not yet taken in the repository.
///
/// Nothing is reserved: the caller must store under the returned id right away.
pub struct IdentifierGenerator {
    repository: Arc<dyn DocumentRepository>,
}

impl IdentifierGenerator {
    pub fn new(repository: Arc<dyn DocumentRepository>) -> Self {
        Self { repository }
    }

    #[instrument(skip(self))]
    pub async fn allocate(&self) -> Result<DocumentId, DomainError> {
        let mut attempts: u64 = 0;
        loop {
            attempts += 1;
            let candidate = DocumentId::random();
            if !self.repository.exists(&candidate).await? {
                if attempts > 1 {
                    tracing::debug!(attempts, id = %candidate, "identifier allocated after collisions");
                }
                return Ok(candidate);
            }
            tracing::debug!(attempts, id = %candidate, "identifier collision, drawing again");
        }
    }
}
