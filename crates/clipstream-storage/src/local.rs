use crate::keys::{blob_key, BlobKind};
use crate::traits::{BlobStore, ByteStream, StorageError, StorageResult};
use async_trait::async_trait;
use futures::StreamExt;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt, SeekFrom};
use uuid::Uuid;

/// Local filesystem blob store.
///
/// Writes land in a temp file next to the destination and are renamed into
/// place after `sync_all`, so a crashed or failed upload never leaves a
/// partial blob under its final key.
#[derive(Clone)]
pub struct LocalBlobStore {
    base_path: PathBuf,
}

impl LocalBlobStore {
    /// Create a store rooted at `base_path`, creating the directory if absent.
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalBlobStore { base_path })
    }

    /// Convert a blob key to a filesystem path, rejecting keys that could
    /// escape the base directory.
    fn key_to_path(&self, key: &str) -> StorageResult<PathBuf> {
        if key.contains("..") || key.starts_with('/') || key.contains('\\') {
            return Err(StorageError::InvalidKey(format!(
                "Blob key '{}' contains invalid characters",
                key
            )));
        }
        Ok(self.base_path.join(key))
    }

    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Size lookup shared by `size` and `open_range`; maps a missing file to
    /// `NotFound` instead of a raw IO error.
    async fn size_of(&self, key: &str, path: &Path) -> StorageResult<u64> {
        match fs::metadata(path).await {
            Ok(meta) => Ok(meta.len()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(key.to_string()))
            }
            Err(e) => Err(StorageError::ReadFailed(format!(
                "Failed to stat {}: {}",
                path.display(),
                e
            ))),
        }
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Wrap a reader into the `ByteStream` the trait exposes.
fn reader_stream<R>(reader: R, key: &str) -> ByteStream
where
    R: tokio::io::AsyncRead + Send + 'static,
{
    let key = key.to_string();
    let stream = tokio_util::io::ReaderStream::new(reader).map(move |chunk| {
        chunk.map_err(|e| {
            tracing::error!(key = %key, error = %e, "Blob read error mid-stream");
            StorageError::ReadFailed(format!("Failed to read chunk: {}", e))
        })
    });
    Box::pin(stream)
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn store(
        &self,
        kind: BlobKind,
        id: Uuid,
        ext: &str,
        data: Vec<u8>,
    ) -> StorageResult<String> {
        let key = blob_key(kind, id, now_millis(), ext);
        let path = self.key_to_path(&key)?;
        let size = data.len();

        self.ensure_parent_dir(&path).await?;

        let tmp_path = path.with_extension(format!("{}.tmp", ext));
        let start = std::time::Instant::now();

        let write_result = async {
            let mut file = fs::File::create(&tmp_path).await.map_err(|e| {
                StorageError::WriteFailed(format!(
                    "Failed to create file {}: {}",
                    tmp_path.display(),
                    e
                ))
            })?;

            file.write_all(&data).await.map_err(|e| {
                StorageError::WriteFailed(format!(
                    "Failed to write file {}: {}",
                    tmp_path.display(),
                    e
                ))
            })?;

            file.sync_all().await.map_err(|e| {
                StorageError::WriteFailed(format!(
                    "Failed to sync file {}: {}",
                    tmp_path.display(),
                    e
                ))
            })?;

            fs::rename(&tmp_path, &path).await.map_err(|e| {
                StorageError::WriteFailed(format!(
                    "Failed to move file into place at {}: {}",
                    path.display(),
                    e
                ))
            })
        }
        .await;

        if let Err(e) = write_result {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(e);
        }

        tracing::info!(
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Blob stored"
        );

        Ok(key)
    }

    async fn open_range(&self, key: &str, start: u64, end: u64) -> StorageResult<ByteStream> {
        let path = self.key_to_path(key)?;
        let size = self.size_of(key, &path).await?;

        if start > end || end >= size {
            return Err(StorageError::InvalidRange { start, end, size });
        }

        let mut file = fs::File::open(&path).await.map_err(|e| {
            StorageError::ReadFailed(format!("Failed to open {}: {}", path.display(), e))
        })?;

        file.seek(SeekFrom::Start(start)).await.map_err(|e| {
            StorageError::ReadFailed(format!("Failed to seek {}: {}", path.display(), e))
        })?;

        let window = file.take(end - start + 1);
        Ok(reader_stream(window, key))
    }

    async fn open_stream(&self, key: &str) -> StorageResult<ByteStream> {
        let path = self.key_to_path(key)?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(StorageError::NotFound(key.to_string()));
        }

        let file = fs::File::open(&path).await.map_err(|e| {
            StorageError::ReadFailed(format!("Failed to open {}: {}", path.display(), e))
        })?;

        Ok(reader_stream(file, key))
    }

    async fn size(&self, key: &str) -> StorageResult<u64> {
        let path = self.key_to_path(key)?;
        self.size_of(key, &path).await
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        let path = self.key_to_path(key)?;
        Ok(fs::try_exists(&path).await.unwrap_or(false))
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        let path = self.key_to_path(key)?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(());
        }

        fs::remove_file(&path).await.map_err(|e| {
            StorageError::DeleteFailed(format!("Failed to delete {}: {}", path.display(), e))
        })?;

        tracing::info!(key = %key, "Blob deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn collect(mut stream: ByteStream) -> Vec<u8> {
        let mut out = Vec::new();
        while let Some(chunk) = stream.next().await {
            out.extend_from_slice(&chunk.unwrap());
        }
        out
    }

    #[tokio::test]
    async fn test_store_and_read_back() {
        let dir = tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path()).await.unwrap();

        let id = Uuid::new_v4();
        let data = b"hello blob".to_vec();
        let key = store
            .store(BlobKind::Video, id, "mp4", data.clone())
            .await
            .unwrap();

        assert!(key.starts_with("videos/"));
        assert!(key.ends_with(".mp4"));
        assert_eq!(store.size(&key).await.unwrap(), data.len() as u64);
        assert_eq!(collect(store.open_stream(&key).await.unwrap()).await, data);
    }

    #[tokio::test]
    async fn test_store_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path()).await.unwrap();

        let key = store
            .store(BlobKind::Video, Uuid::new_v4(), "mp4", b"x".to_vec())
            .await
            .unwrap();

        let mut entries = std::fs::read_dir(dir.path().join("videos"))
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect::<Vec<_>>();
        entries.sort();
        assert_eq!(entries.len(), 1);
        assert_eq!(format!("videos/{}", entries[0]), key);
    }

    #[tokio::test]
    async fn test_open_range_returns_exact_window() {
        let dir = tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path()).await.unwrap();

        let key = store
            .store(BlobKind::Video, Uuid::new_v4(), "mp4", b"ABCDEFGHIJ".to_vec())
            .await
            .unwrap();

        let body = collect(store.open_range(&key, 2, 5).await.unwrap()).await;
        assert_eq!(body, b"CDEF");

        let body = collect(store.open_range(&key, 0, 9).await.unwrap()).await;
        assert_eq!(body, b"ABCDEFGHIJ");

        let body = collect(store.open_range(&key, 9, 9).await.unwrap()).await;
        assert_eq!(body, b"J");
    }

    #[tokio::test]
    async fn test_open_range_rejects_bad_windows() {
        let dir = tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path()).await.unwrap();

        let key = store
            .store(BlobKind::Video, Uuid::new_v4(), "mp4", b"ABCDEFGHIJ".to_vec())
            .await
            .unwrap();

        assert!(matches!(
            store.open_range(&key, 5, 2).await,
            Err(StorageError::InvalidRange { .. })
        ));
        assert!(matches!(
            store.open_range(&key, 0, 10).await,
            Err(StorageError::InvalidRange { .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_blob_is_not_found() {
        let dir = tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path()).await.unwrap();

        assert!(matches!(
            store.open_range("videos/missing.mp4", 0, 1).await,
            Err(StorageError::NotFound(_))
        ));
        assert!(matches!(
            store.size("videos/missing.mp4").await,
            Err(StorageError::NotFound(_))
        ));
        assert!(!store.exists("videos/missing.mp4").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path()).await.unwrap();

        let key = store
            .store(BlobKind::Thumbnail, Uuid::new_v4(), "jpg", b"img".to_vec())
            .await
            .unwrap();

        store.delete(&key).await.unwrap();
        assert!(!store.exists(&key).await.unwrap());
        // Second delete of a now-missing blob succeeds
        store.delete(&key).await.unwrap();
        store.delete("videos/never-existed.mp4").await.unwrap();
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let dir = tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path()).await.unwrap();

        assert!(matches!(
            store.size("../../etc/passwd").await,
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(
            store.delete("/etc/passwd").await,
            Err(StorageError::InvalidKey(_))
        ));
    }
}
