//! Request-scoped blob storage for uploaded audio/image payloads.
//!
//! Blobs live exactly as long as one pipeline run: stored before Intake,
//! read by Intake/Vision, and deleted unconditionally once the run reaches
//! Done or Failed.

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::debug;

/// Opaque handle to a stored payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlobRef(String);

impl BlobRef {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BlobRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn store(&self, bytes: &[u8]) -> Result<BlobRef>;
    async fn read(&self, blob: &BlobRef) -> Result<Vec<u8>>;
    async fn delete(&self, blob: &BlobRef) -> Result<()>;
}

/// Blob store backed by uuid-named files under a temp directory.
pub struct TempFileBlobStore {
    dir: PathBuf,
}

impl TempFileBlobStore {
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self {
            dir: dir.unwrap_or_else(|| std::env::temp_dir().join("airwatch")),
        }
    }
}

#[async_trait]
impl BlobStore for TempFileBlobStore {
    async fn store(&self, bytes: &[u8]) -> Result<BlobRef> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("create blob dir {}", self.dir.display()))?;
        let path = self.dir.join(uuid::Uuid::new_v4().to_string());
        tokio::fs::write(&path, bytes)
            .await
            .with_context(|| format!("write blob {}", path.display()))?;
        debug!(path = %path.display(), bytes = bytes.len(), "blob stored");
        Ok(BlobRef(path.to_string_lossy().into_owned()))
    }

    async fn read(&self, blob: &BlobRef) -> Result<Vec<u8>> {
        tokio::fs::read(blob.as_str())
            .await
            .with_context(|| format!("read blob {blob}"))
    }

    async fn delete(&self, blob: &BlobRef) -> Result<()> {
        tokio::fs::remove_file(blob.as_str())
            .await
            .with_context(|| format!("delete blob {blob}"))?;
        debug!(%blob, "blob deleted");
        Ok(())
    }
}

/// In-memory blob store; tests use it to assert cleanup after a run.
#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, blob: &BlobRef) -> bool {
        self.blobs.lock().unwrap().contains_key(blob.as_str())
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn store(&self, bytes: &[u8]) -> Result<BlobRef> {
        let key = uuid::Uuid::new_v4().to_string();
        self.blobs
            .lock()
            .unwrap()
            .insert(key.clone(), bytes.to_vec());
        Ok(BlobRef(key))
    }

    async fn read(&self, blob: &BlobRef) -> Result<Vec<u8>> {
        self.blobs
            .lock()
            .unwrap()
            .get(blob.as_str())
            .cloned()
            .ok_or_else(|| anyhow!("unknown blob {blob}"))
    }

    async fn delete(&self, blob: &BlobRef) -> Result<()> {
        self.blobs
            .lock()
            .unwrap()
            .remove(blob.as_str())
            .map(|_| ())
            .ok_or_else(|| anyhow!("unknown blob {blob}"))
    }
}
