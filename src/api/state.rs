use std::sync::Arc;

use crate::application::DocumentService;
use crate::domain::ports::DocumentRepository;
use crate::infrastructure::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub document_service: Arc<DocumentService>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(repository: Arc<dyn DocumentRepository>, config: AppConfig) -> Self {
        Self {
            document_service: Arc::new(DocumentService::new(repository)),
            config: Arc::new(config),
        }
    }
}
