use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::DocumentId;

/// A stored blob and its optional display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: DocumentId,
    pub content: Vec<u8>,
    pub filename: Option<String>,
}

impl Document {
    pub fn new(id: DocumentId, content: impl Into<Vec<u8>>) -> Self {
        Self {
            id,
            content: content.into(),
            filename: None,
        }
    }

    pub fn with_filename(mut self, filename: Option<String>) -> Self {
        self.filename = filename;
        self
    }

    pub fn metadata(&self) -> DocumentMetadata {
        DocumentMetadata::new(self.filename.clone())
    }
}

/// Sidecar record stored next to the content.
///
/// Advisory only: a document without a readable record is still a
/// document, it just has no filename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl DocumentMetadata {
    pub fn new(filename: Option<String>) -> Self {
        Self {
            filename,
            created_at: Some(Utc::now()),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }

    pub fn from_json(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }
}
