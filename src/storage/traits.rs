// SPDX-License-Identifier: GPL-3.0-only
use async_trait::async_trait;
use futures_util::stream::BoxStream;
use std::path::PathBuf;

/// Chunked contents of a stored photo
pub type PhotoStream = BoxStream<'static, std::io::Result<Vec<u8>>>;

#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("Invalid stored photo name: {0}")]
    InvalidName(String),

    #[error("Photo storage I/O error for {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

#[async_trait]
pub trait PhotoStore: Send + Sync {
    /// Persist an uploaded photo and return its generated stored name
    async fn store(&self, original_filename: &str, content: &[u8]) -> Result<String, StorageError>;

    /// Open a previously stored photo for streaming
    async fn open(&self, stored_name: &str) -> Result<PhotoStream, StorageError>;

    /// Absolute filesystem location of a stored photo
    fn absolute_path(&self, stored_name: &str) -> PathBuf;
}
