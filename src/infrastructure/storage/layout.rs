use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tokio::io::AsyncWriteExt;

use crate::domain::DocumentId;

/// Suffix appended to an identifier to name its metadata sidecar.
pub const SIDECAR_SUFFIX: &str = ".meta";

const STAGING_SUFFIX: &str = ".tmp";

/// Staging files younger than this may belong to a writer that is still
/// running (a preload run, another instance) and are left alone.
pub const STAGING_GRACE: Duration = Duration::from_secs(15 * 60);

/// On-disk naming inside the storage root.
///
/// ```text
/// <root>/<id>                    raw content
/// <root>/<id>.meta               JSON metadata sidecar
/// <root>/.<name>.<hex>.tmp       in-flight write, never a valid id
/// ```
#[derive(Debug, Clone)]
pub struct StorageLayout {
    root: PathBuf,
}

impl StorageLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn content_path(&self, id: &DocumentId) -> PathBuf {
        self.root.join(id.as_str())
    }

    pub fn sidecar_path(&self, id: &DocumentId) -> PathBuf {
        self.root.join(format!("{id}{SIDECAR_SUFFIX}"))
    }

    pub fn staging_path(&self, target: &Path) -> PathBuf {
        let name = target
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.root
            .join(format!(".{name}.{:016x}{STAGING_SUFFIX}", rand::random::<u64>()))
    }

    pub fn is_staging_name(name: &str) -> bool {
        name.starts_with('.') && name.ends_with(STAGING_SUFFIX)
    }

    pub async fn ensure_root(&self) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.root).await
    }

    /// Writes `bytes` to `target` so that readers see either nothing or all of it.
    pub async fn write_atomic(&self, target: &Path, bytes: &[u8]) -> io::Result<()> {
        let staging = self.staging_path(target);
        let result: io::Result<()> = async {
            let mut file = tokio::fs::File::create(&staging).await?;
            file.write_all(bytes).await?;
            file.sync_all().await?;
            drop(file);
            tokio::fs::rename(&staging, target).await
        }
        .await;

        if result.is_err() {
            let _ = tokio::fs::remove_file(&staging).await;
        }
        result
    }

    /// Copies `source` into place at `target` through a staging file.
    pub async fn copy_atomic(&self, source: &Path, target: &Path) -> io::Result<u64> {
        let staging = self.staging_path(target);
        let result: io::Result<u64> = async {
            let copied = tokio::fs::copy(source, &staging).await?;
            tokio::fs::rename(&staging, target).await?;
            Ok(copied)
        }
        .await;

        if result.is_err() {
            let _ = tokio::fs::remove_file(&staging).await;
        }
        result
    }

    /// Removes staging files last modified at least `grace` ago.
    pub async fn sweep_staging(&self, grace: Duration) -> io::Result<usize> {
        let now = SystemTime::now();
        let mut removed = 0;
        let mut entries = tokio::fs::read_dir(&self.root).await?;
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if !Self::is_staging_name(name) {
                continue;
            }

            let modified = match entry.metadata().await.and_then(|m| m.modified()) {
                Ok(modified) => modified,
                Err(e) => {
                    tracing::warn!(file = name, error = %e, "failed to stat staging file");
                    continue;
                }
            };
            if now.duration_since(modified).unwrap_or_default() < grace {
                tracing::debug!(file = name, "keeping recent staging file");
                continue;
            }

            match tokio::fs::remove_file(entry.path()).await {
                Ok(()) => removed += 1,
                Err(e) => tracing::warn!(file = name, error = %e, "failed to remove staging file"),
            }
        }
        Ok(removed)
    }
}
