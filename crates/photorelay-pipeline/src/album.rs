//! Local album store.
//!
//! The photo-library analogue: an optional copy of the transformed payload
//! is persisted locally as a fire-and-forget side effect. Album writes never
//! gate the upload outcome.

use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Album store errors
#[derive(Debug, Error)]
pub enum AlbumError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Persists a copy of an uploaded photo to the local album.
#[async_trait]
pub trait AlbumWriter: Send + Sync {
    async fn save(&self, name: &str, data: Bytes) -> Result<(), AlbumError>;
}

/// Album store backed by a local directory.
#[derive(Clone, Debug)]
pub struct DirectoryAlbum {
    base_path: PathBuf,
}

impl DirectoryAlbum {
    /// Create the album store, ensuring the directory exists.
    pub async fn new(base_path: impl Into<PathBuf>) -> Result<Self, AlbumError> {
        let base_path = base_path.into();
        fs::create_dir_all(&base_path).await?;
        Ok(DirectoryAlbum { base_path })
    }
}

#[async_trait]
impl AlbumWriter for DirectoryAlbum {
    async fn save(&self, name: &str, data: Bytes) -> Result<(), AlbumError> {
        let path = self.base_path.join(name);
        let mut file = fs::File::create(&path).await?;
        file.write_all(&data).await?;
        file.sync_all().await?;

        tracing::info!(
            path = %path.display(),
            size_bytes = data.len(),
            "Saved photo to album"
        );
        Ok(())
    }
}
