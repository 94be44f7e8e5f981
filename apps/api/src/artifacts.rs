//! Per-request artifact storage on the local filesystem.
//!
//! Layout: `<root>/<request_id>/<file_name>`. Every optimize request gets a fresh
//! UUID, so concurrent requests never write to the same path. Only the fixed
//! `OutputFormat` file names are ever read back, which keeps lookups inside `root`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tempfile::TempDir;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::emit::OutputFormat;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    NotFound(String),
}

/// Descriptor returned to clients for a stored artifact.
#[derive(Debug, Clone, Serialize)]
pub struct StoredArtifact {
    pub format: OutputFormat,
    pub file_name: String,
    pub download_name: String,
    pub size_bytes: usize,
    pub url: String,
}

#[derive(Clone)]
pub struct ArtifactStore {
    root: PathBuf,
    // Keeps a temporary root alive (and deletes it) for the lifetime of the store.
    _temp: Option<Arc<TempDir>>,
}

impl ArtifactStore {
    /// Uses `root`, creating it if needed.
    pub fn at(root: impl Into<PathBuf>) -> Result<Self, ArtifactError> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root, _temp: None })
    }

    /// Uses a fresh temporary directory removed when the last clone is dropped.
    pub fn temporary() -> Result<Self, ArtifactError> {
        let temp = tempfile::Builder::new()
            .prefix("resume-optimizer-")
            .tempdir()?;
        Ok(Self {
            root: temp.path().to_path_buf(),
            _temp: Some(Arc::new(temp)),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, request_id: Uuid, format: OutputFormat) -> PathBuf {
        self.root
            .join(request_id.to_string())
            .join(format.file_name())
    }

    pub async fn save(
        &self,
        request_id: Uuid,
        format: OutputFormat,
        bytes: &[u8],
    ) -> Result<StoredArtifact, ArtifactError> {
        let path = self.path_for(request_id, format);
        if let Some(dir) = path.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }
        tokio::fs::write(&path, bytes).await?;
        debug!("Stored {} ({} bytes)", path.display(), bytes.len());

        Ok(StoredArtifact {
            format,
            file_name: format.file_name().to_string(),
            download_name: format.download_name().to_string(),
            size_bytes: bytes.len(),
            url: format!("/api/v1/artifacts/{request_id}/{}", format.file_name()),
        })
    }

    pub async fn load(&self, request_id: Uuid, format: OutputFormat) -> Result<Vec<u8>, ArtifactError> {
        let path = self.path_for(request_id, format);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(ArtifactError::NotFound(
                format!("{request_id}/{}", format.file_name()),
            )),
            Err(e) => Err(e.into()),
        }
    }
}
