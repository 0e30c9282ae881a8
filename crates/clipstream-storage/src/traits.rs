//! Blob store abstraction trait.

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::pin::Pin;
use thiserror::Error;
use uuid::Uuid;

use crate::keys::BlobKind;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Blob not found: {0}")]
    NotFound(String),

    #[error("Invalid range {start}-{end} for blob of {size} bytes")]
    InvalidRange { start: u64, end: u64, size: u64 },

    #[error("Invalid blob key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A stream of body chunks read from a blob.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, StorageError>> + Send>>;

/// Blob store abstraction.
///
/// Writes are all-or-nothing: a failed or interrupted `store` never leaves a
/// partial blob visible under its final key.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Persist `data` under a freshly derived key for `(kind, id)` and return
    /// that key. Keys embed an upload-attempt timestamp, so retries never
    /// collide with earlier attempts.
    async fn store(
        &self,
        kind: BlobKind,
        id: Uuid,
        ext: &str,
        data: Vec<u8>,
    ) -> StorageResult<String>;

    /// Open a reader over the inclusive byte window `[start, end]`.
    ///
    /// Fails with `NotFound` if the key does not resolve and `InvalidRange`
    /// if `start > end` or `end >= size`.
    async fn open_range(&self, key: &str, start: u64, end: u64) -> StorageResult<ByteStream>;

    /// Open a reader over the whole blob.
    async fn open_stream(&self, key: &str) -> StorageResult<ByteStream>;

    /// Size of the blob in bytes.
    async fn size(&self, key: &str) -> StorageResult<u64>;

    /// Whether the key resolves to an existing blob.
    async fn exists(&self, key: &str) -> StorageResult<bool>;

    /// Delete the blob. Deleting a missing blob is not an error.
    async fn delete(&self, key: &str) -> StorageResult<()>;
}
