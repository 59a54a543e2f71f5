//! Seeds the storage root with well-known documents before the service starts.
//!
//! Files are written straight into the on-disk layout, so the running service
//! cannot tell a seeded document from an uploaded one.

use futures::future::join_all;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::domain::{DocumentId, DocumentMetadata, DomainError};
use crate::infrastructure::storage::StorageLayout;

pub const DEFAULT_SOURCE_DIR: &str = "/data/preload_source";
pub const DEFAULT_DEST_DIR: &str = "/data/documents";

/// A source file name and the identifier it is published under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreloadEntry {
    pub filename: String,
    pub id: DocumentId,
}

impl PreloadEntry {
    pub fn new(filename: impl Into<String>, id: DocumentId) -> Self {
        Self {
            filename: filename.into(),
            id,
        }
    }
}

/// Parses `<filename>=<id>`.
impl FromStr for PreloadEntry {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (filename, id) = s
            .rsplit_once('=')
            .ok_or_else(|| DomainError::invalid_input("expected <filename>=<id>"))?;

        let filename = filename.trim();
        if filename.is_empty() || filename.contains(['/', '\\']) || filename == ".." {
            return Err(DomainError::invalid_input(format!(
                "invalid source filename {filename:?}"
            )));
        }

        Ok(Self::new(filename, DocumentId::parse(id.trim())?))
    }
}

pub fn default_entries() -> Vec<PreloadEntry> {
    [
        ("large_mixed.zip", "000000000a"),
        ("medium_nested.zip", "000000000b"),
        ("small_flat.zip", "000000000c"),
    ]
    .into_iter()
    .filter_map(|(filename, id)| {
        DocumentId::parse(id)
            .ok()
            .map(|id| PreloadEntry::new(filename, id))
    })
    .collect()
}

#[derive(Debug, Default)]
pub struct PreloadReport {
    pub seeded: Vec<DocumentId>,
    pub missing: Vec<String>,
    pub failed: Vec<(String, String)>,
}

impl PreloadReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

enum Outcome {
    Seeded(DocumentId),
    Missing(String),
    Failed(String, String),
}

pub struct Preloader {
    source_dir: PathBuf,
    layout: StorageLayout,
}

impl Preloader {
    pub fn new(source_dir: impl Into<PathBuf>, dest_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            layout: StorageLayout::new(dest_dir),
        }
    }

    /// Copies every entry whose source exists. Only failing to create the
    /// destination aborts the run; per-entry problems land in the report.
    pub async fn run(&self, entries: &[PreloadEntry]) -> io::Result<PreloadReport> {
        tracing::info!(
            source = %self.source_dir.display(),
            dest = %self.layout.root().display(),
            entries = entries.len(),
            "starting preload"
        );
        self.layout.ensure_root().await?;

        let outcomes = join_all(entries.iter().map(|entry| self.seed(entry))).await;

        let mut report = PreloadReport::default();
        for outcome in outcomes {
            match outcome {
                Outcome::Seeded(id) => report.seeded.push(id),
                Outcome::Missing(filename) => report.missing.push(filename),
                Outcome::Failed(filename, reason) => report.failed.push((filename, reason)),
            }
        }

        tracing::info!(
            seeded = report.seeded.len(),
            missing = report.missing.len(),
            failed = report.failed.len(),
            "preload complete"
        );
        Ok(report)
    }

    async fn seed(&self, entry: &PreloadEntry) -> Outcome {
        let source = self.source_dir.join(&entry.filename);

        match tokio::fs::try_exists(&source).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::warn!(file = %entry.filename, source = %self.source_dir.display(), "source file not found");
                return Outcome::Missing(entry.filename.clone());
            }
            Err(e) => return Outcome::Failed(entry.filename.clone(), e.to_string()),
        }

        match self.publish(&source, entry).await {
            Ok(bytes) => {
                tracing::info!(file = %entry.filename, id = %entry.id, bytes, "preloaded document");
                Outcome::Seeded(entry.id.clone())
            }
            Err(e) => {
                tracing::error!(file = %entry.filename, id = %entry.id, error = %e, "failed to preload document");
                Outcome::Failed(entry.filename.clone(), e.to_string())
            }
        }
    }

    async fn publish(&self, source: &Path, entry: &PreloadEntry) -> io::Result<u64> {
        let bytes = self
            .layout
            .copy_atomic(source, &self.layout.content_path(&entry.id))
            .await?;

        let metadata = DocumentMetadata::new(Some(entry.filename.clone())).to_json()?;
        self.layout
            .write_atomic(&self.layout.sidecar_path(&entry.id), &metadata)
            .await?;

        Ok(bytes)
    }
}
