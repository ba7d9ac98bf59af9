// SPDX-License-Identifier: GPL-3.0-only
use async_trait::async_trait;
use chrono::Utc;
use futures_util::stream::{self, StreamExt};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::{error, info};

use crate::storage::traits::{PhotoStore, PhotoStream, StorageError};
use crate::utils::{is_plain_file_name, sanitize_filename};

const READ_CHUNK_SIZE: usize = 64 * 1024;

/// Suffixed names tried before giving up on a crowded millisecond
const MAX_NAME_ATTEMPTS: u32 = 1000;

/// Stores uploaded photos flat inside a single cache directory
pub struct CacheDirStore {
    dir: PathBuf,
}

impl CacheDirStore {
    /// Create the store, creating `dir` if it does not exist yet
    pub async fn new(dir: impl AsRef<Path>) -> anyhow::Result<Self> {
        let dir = dir.as_ref();
        tokio::fs::create_dir_all(dir).await?;
        let dir = tokio::fs::canonicalize(dir).await?;

        info!(dir = %dir.display(), "Photo cache directory ready");
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn resolve(&self, stored_name: &str) -> Result<PathBuf, StorageError> {
        if !is_plain_file_name(stored_name) {
            return Err(StorageError::InvalidName(stored_name.to_string()));
        }
        Ok(self.dir.join(stored_name))
    }

    /// Claim a stored name nobody else holds. Existing files are never
    /// opened, so an earlier photo cannot be overwritten.
    async fn create_unique(
        &self,
        millis: i64,
        original_filename: &str,
    ) -> Result<(String, PathBuf, File), StorageError> {
        let base = sanitize_filename(original_filename);

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let stored_name = if attempt == 0 {
                format!("{millis}-{base}")
            } else {
                format!("{millis}-{attempt}-{base}")
            };
            let path = self.resolve(&stored_name)?;

            match OpenOptions::new().write(true).create_new(true).open(&path).await {
                Ok(file) => return Ok((stored_name, path, file)),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(source) => return Err(StorageError::Io { name: stored_name, source }),
            }
        }

        Err(StorageError::Io {
            name: format!("{millis}-{base}"),
            source: std::io::Error::new(ErrorKind::AlreadyExists, "no free stored name"),
        })
    }
}

async fn write_file(mut file: File, content: &[u8]) -> std::io::Result<()> {
    file.write_all(content).await?;
    file.flush().await?;
    Ok(())
}

async fn read_chunk(mut file: File) -> std::io::Result<Option<(Vec<u8>, File)>> {
    let mut buf = vec![0u8; READ_CHUNK_SIZE];
    let count = file.read(&mut buf).await?;
    if count == 0 {
        return Ok(None);
    }
    buf.truncate(count);
    Ok(Some((buf, file)))
}

#[async_trait]
impl PhotoStore for CacheDirStore {
    async fn store(&self, original_filename: &str, content: &[u8]) -> Result<String, StorageError> {
        let (stored_name, path, file) = self
            .create_unique(Utc::now().timestamp_millis(), original_filename)
            .await?;

        if let Err(source) = write_file(file, content).await {
            error!(error = %source, path = %path.display(), "Failed to write photo");
            // The handle is already dropped; only our partial file remains
            let _ = tokio::fs::remove_file(&path).await;
            return Err(StorageError::Io { name: stored_name, source });
        }

        info!(photo = %stored_name, bytes = content.len(), "Stored photo");
        Ok(stored_name)
    }

    async fn open(&self, stored_name: &str) -> Result<PhotoStream, StorageError> {
        let path = self.resolve(stored_name)?;
        let file = File::open(&path).await.map_err(|source| StorageError::Io {
            name: stored_name.to_string(),
            source,
        })?;

        Ok(stream::try_unfold(file, read_chunk).boxed())
    }

    fn absolute_path(&self, stored_name: &str) -> PathBuf {
        self.dir.join(stored_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::TryStreamExt;
    use tempfile::TempDir;

    async fn read_all(store: &CacheDirStore, name: &str) -> Vec<u8> {
        let chunks: Vec<Vec<u8>> = store.open(name).await.unwrap().try_collect().await.unwrap();
        chunks.concat()
    }

    #[tokio::test]
    async fn test_new_creates_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let cache = temp_dir.path().join("nested").join("cache");

        let store = CacheDirStore::new(&cache).await.unwrap();

        assert!(cache.is_dir());
        assert!(store.dir().is_absolute());
    }

    #[tokio::test]
    async fn test_store_writes_flat_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = CacheDirStore::new(temp_dir.path()).await.unwrap();

        let name = store.store("photo.png", b"png bytes").await.unwrap();

        assert!(name.ends_with("-photo.png"));
        let (millis, _) = name.split_once('-').unwrap();
        assert!(millis.parse::<i64>().is_ok());

        let on_disk = std::fs::read(store.dir().join(&name)).unwrap();
        assert_eq!(on_disk, b"png bytes");
    }

    #[tokio::test]
    async fn test_store_same_filename_never_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let store = CacheDirStore::new(temp_dir.path()).await.unwrap();

        for _ in 0..50 {
            let first = store.store("image.jpg", b"first").await.unwrap();
            let second = store.store("image.jpg", b"second").await.unwrap();

            assert_ne!(first, second);
            assert!(second.ends_with("-image.jpg"));
            assert_eq!(read_all(&store, &first).await, b"first");
            assert_eq!(read_all(&store, &second).await, b"second");
        }
    }

    #[tokio::test]
    async fn test_store_skips_existing_name() {
        let temp_dir = TempDir::new().unwrap();
        let store = CacheDirStore::new(temp_dir.path()).await.unwrap();

        std::fs::write(store.dir().join("42-taken.png"), b"original").unwrap();
        std::fs::write(store.dir().join("42-1-taken.png"), b"second").unwrap();

        let (claimed, path, _) = store.create_unique(42, "taken.png").await.unwrap();

        assert_eq!(claimed, "42-2-taken.png");
        assert_eq!(path, store.dir().join("42-2-taken.png"));
        assert_eq!(std::fs::read(store.dir().join("42-taken.png")).unwrap(), b"original");
        assert_eq!(std::fs::read(store.dir().join("42-1-taken.png")).unwrap(), b"second");
    }

    #[tokio::test]
    async fn test_store_strips_client_path() {
        let temp_dir = TempDir::new().unwrap();
        let store = CacheDirStore::new(temp_dir.path()).await.unwrap();

        let name = store.store("../../outside.jpg", b"x").await.unwrap();

        assert!(name.ends_with("-outside.jpg"));
        assert!(store.dir().join(&name).exists());
        assert!(!temp_dir.path().parent().unwrap().join("outside.jpg").exists());
    }

    #[tokio::test]
    async fn test_open_roundtrip_large_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = CacheDirStore::new(temp_dir.path()).await.unwrap();
        let content: Vec<u8> = (0..(READ_CHUNK_SIZE * 2 + 17)).map(|i| (i % 251) as u8).collect();

        let name = store.store("big.bin", &content).await.unwrap();

        assert_eq!(read_all(&store, &name).await, content);
    }

    #[tokio::test]
    async fn test_open_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = CacheDirStore::new(temp_dir.path()).await.unwrap();

        let result = store.open("123-missing.png").await;
        assert!(matches!(result, Err(StorageError::Io { .. })));
    }

    #[tokio::test]
    async fn test_open_rejects_traversal() {
        let temp_dir = TempDir::new().unwrap();
        let store = CacheDirStore::new(temp_dir.path()).await.unwrap();

        let result = store.open("../etc/passwd").await;
        assert!(matches!(result, Err(StorageError::InvalidName(_))));
    }

    #[tokio::test]
    async fn test_absolute_path() {
        let temp_dir = TempDir::new().unwrap();
        let store = CacheDirStore::new(temp_dir.path()).await.unwrap();

        let path = store.absolute_path("1-a.png");
        assert!(path.is_absolute());
        assert_eq!(path, store.dir().join("1-a.png"));
    }
}
