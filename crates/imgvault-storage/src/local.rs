//! Local filesystem storage backend.

use crate::traits::{ByteStream, Storage, StorageError, StorageResult, StoredObject};
use async_trait::async_trait;
use futures::StreamExt;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// Local filesystem storage.
///
/// Owns a single flat upload directory. Stored names are generated here as
/// `{uuid-v4}.{ext}`, so collisions are treated as never happening.
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage rooted at `base_path`, creating the
    /// directory if needed.
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create upload directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Resolve a stored name to its filesystem path, rejecting anything that
    /// could escape the upload directory.
    fn name_to_path(&self, stored_name: &str) -> StorageResult<PathBuf> {
        if stored_name.is_empty()
            || stored_name.contains("..")
            || stored_name.contains('/')
            || stored_name.contains('\\')
        {
            return Err(StorageError::InvalidName(stored_name.to_string()));
        }
        Ok(self.base_path.join(stored_name))
    }

    /// Best-effort removal of a partial file after an aborted write.
    async fn cleanup_partial(&self, path: &Path) {
        if let Err(e) = fs::remove_file(path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Failed to clean up partial upload file"
                );
            }
        }
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn store_stream(
        &self,
        extension: &str,
        mut stream: ByteStream<'_>,
        max_size: usize,
    ) -> StorageResult<StoredObject> {
        let stored_name = format!("{}.{}", Uuid::new_v4(), extension);
        let path = self.name_to_path(&stored_name)?;
        let start = std::time::Instant::now();

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::WriteFailed(format!(
                "Failed to create file {}: {}",
                path.display(),
                e
            ))
        })?;

        let mut hasher = Sha256::new();
        let mut size: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(e) => {
                    // Client disconnect or transport failure mid-body. The
                    // stream is abandoned; no further reads are attempted.
                    drop(file);
                    self.cleanup_partial(&path).await;
                    return Err(StorageError::Stream(e.to_string()));
                }
            };

            size += chunk.len() as u64;
            if size > max_size as u64 {
                drop(file);
                self.cleanup_partial(&path).await;
                return Err(StorageError::TooLarge { limit: max_size });
            }

            hasher.update(&chunk);
            if let Err(e) = file.write_all(&chunk).await {
                drop(file);
                self.cleanup_partial(&path).await;
                return Err(StorageError::WriteFailed(format!(
                    "Failed to write file {}: {}",
                    path.display(),
                    e
                )));
            }
        }

        if let Err(e) = file.sync_all().await {
            drop(file);
            self.cleanup_partial(&path).await;
            return Err(StorageError::WriteFailed(format!(
                "Failed to sync file {}: {}",
                path.display(),
                e
            )));
        }

        let digest = hex::encode(hasher.finalize());

        tracing::info!(
            stored_name = %stored_name,
            size_bytes = size,
            digest = %digest,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Stored upload file"
        );

        Ok(StoredObject {
            stored_name,
            path,
            digest,
            size,
        })
    }

    async fn delete(&self, stored_name: &str) -> StorageResult<()> {
        let path = self.name_to_path(stored_name)?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(());
        }

        fs::remove_file(&path).await.map_err(|e| {
            StorageError::DeleteFailed(format!(
                "Failed to delete file {}: {}",
                path.display(),
                e
            ))
        })?;

        tracing::debug!(stored_name = %stored_name, "Deleted stored file");
        Ok(())
    }

    async fn exists(&self, stored_name: &str) -> StorageResult<bool> {
        let path = self.name_to_path(stored_name)?;
        Ok(fs::try_exists(&path).await.unwrap_or(false))
    }

    async fn count_files(&self) -> StorageResult<usize> {
        let mut entries = fs::read_dir(&self.base_path).await.map_err(|e| {
            StorageError::DirectoryUnreadable(format!(
                "Failed to read {}: {}",
                self.base_path.display(),
                e
            ))
        })?;

        let mut count = 0;
        while let Some(entry) = entries.next_entry().await.map_err(|e| {
            StorageError::DirectoryUnreadable(format!(
                "Failed to read {}: {}",
                self.base_path.display(),
                e
            ))
        })? {
            let file_type = entry.file_type().await.map_err(|e| {
                StorageError::DirectoryUnreadable(format!(
                    "Failed to stat {}: {}",
                    entry.path().display(),
                    e
                ))
            })?;
            if file_type.is_file() {
                count += 1;
            }
        }

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use futures::stream;
    use sha2::{Digest, Sha256};
    use tempfile::tempdir;

    fn byte_stream(chunks: Vec<Result<Bytes, StorageError>>) -> ByteStream<'static> {
        Box::pin(stream::iter(chunks))
    }

    fn ok_chunks(data: &[&[u8]]) -> ByteStream<'static> {
        byte_stream(
            data.iter()
                .map(|c| Ok(Bytes::copy_from_slice(c)))
                .collect(),
        )
    }

    #[tokio::test]
    async fn store_stream_writes_file_and_digest() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let stored = storage
            .store_stream("png", ok_chunks(&[b"hello ", b"world"]), 1024)
            .await
            .unwrap();

        assert!(stored.stored_name.ends_with(".png"));
        assert_eq!(stored.size, 11);

        let on_disk = std::fs::read(&stored.path).unwrap();
        assert_eq!(on_disk, b"hello world");

        let expected = hex::encode(Sha256::digest(b"hello world"));
        assert_eq!(stored.digest, expected);
    }

    #[tokio::test]
    async fn store_stream_enforces_size_limit_and_cleans_up() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let result = storage
            .store_stream("jpg", ok_chunks(&[&[0u8; 600], &[0u8; 600]]), 1000)
            .await;

        assert!(matches!(result, Err(StorageError::TooLarge { limit: 1000 })));
        assert_eq!(storage.count_files().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn store_stream_cleans_up_on_stream_error() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let stream = byte_stream(vec![
            Ok(Bytes::from_static(b"partial")),
            Err(StorageError::Stream("client disconnected".to_string())),
        ]);
        let result = storage.store_stream("gif", stream, 1024).await;

        assert!(matches!(result, Err(StorageError::Stream(_))));
        assert_eq!(storage.count_files().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn stored_names_are_unique() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let a = storage
            .store_stream("png", ok_chunks(&[b"same"]), 1024)
            .await
            .unwrap();
        let b = storage
            .store_stream("png", ok_chunks(&[b"same"]), 1024)
            .await
            .unwrap();

        assert_ne!(a.stored_name, b.stored_name);
        assert_eq!(a.digest, b.digest);
        assert_eq!(storage.count_files().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let stored = storage
            .store_stream("png", ok_chunks(&[b"data"]), 1024)
            .await
            .unwrap();

        storage.delete(&stored.stored_name).await.unwrap();
        assert!(!storage.exists(&stored.stored_name).await.unwrap());
        // Second delete of a missing file succeeds.
        storage.delete(&stored.stored_name).await.unwrap();
    }

    #[tokio::test]
    async fn path_traversal_names_rejected() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        for name in ["../etc/passwd", "a/b.png", "..", ""] {
            let result = storage.delete(name).await;
            assert!(matches!(result, Err(StorageError::InvalidName(_))), "{name}");
        }
    }

    #[tokio::test]
    async fn count_files_excludes_subdirectories() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        storage
            .store_stream("png", ok_chunks(&[b"one"]), 1024)
            .await
            .unwrap();
        std::fs::create_dir(dir.path().join("thumbnails")).unwrap();

        assert_eq!(storage.count_files().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn empty_stream_stores_empty_file() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let stored = storage
            .store_stream("gif", ok_chunks(&[]), 1024)
            .await
            .unwrap();

        assert_eq!(stored.size, 0);
        let expected = hex::encode(Sha256::digest(b""));
        assert_eq!(stored.digest, expected);
    }
}
