//! Storage abstraction trait
//!
//! This module defines the Storage trait the upload pipeline writes through.
//! Only this layer creates or deletes stored files.

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::path::PathBuf;
use std::pin::Pin;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload exceeds maximum size of {limit} bytes")]
    TooLarge { limit: usize },

    #[error("Upload stream failed: {0}")]
    Stream(String),

    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Invalid stored name: {0}")]
    InvalidName(String),

    #[error("Upload directory unreadable: {0}")]
    DirectoryUnreadable(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Incoming upload body: a fallible stream of byte chunks. Chunk sizes are
/// whatever the transport produces; they are a tuning detail, not a
/// correctness parameter.
pub type ByteStream<'a> = Pin<Box<dyn Stream<Item = Result<Bytes, StorageError>> + Send + 'a>>;

/// A fully written, size-validated stored file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Server-generated `{uuid}.{ext}` name; the filesystem key.
    pub stored_name: String,
    /// Absolute or base-relative path of the stored file.
    pub path: PathBuf,
    /// Hex-encoded SHA-256 of the full content.
    pub digest: String,
    /// Total content size in bytes.
    pub size: u64,
}

/// Storage abstraction trait
///
/// The backend owning the upload directory. Implementations guarantee that a
/// failed `store_stream` leaves no partial file behind on any exit path.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Stream an upload body to a fresh uniquely named file, enforcing
    /// `max_size` and computing the content digest incrementally.
    ///
    /// On success returns the stored object. On a size violation or stream
    /// failure the partially written file is deleted before the error is
    /// returned, and the stream is abandoned without further reads.
    async fn store_stream(
        &self,
        extension: &str,
        stream: ByteStream<'_>,
        max_size: usize,
    ) -> StorageResult<StoredObject>;

    /// Delete a stored file by name. Deleting a missing file is not an error.
    async fn delete(&self, stored_name: &str) -> StorageResult<()>;

    /// Check whether a stored file exists.
    async fn exists(&self, stored_name: &str) -> StorageResult<bool>;

    /// Count regular files in the upload directory, excluding
    /// subdirectories and anything else that is not a plain file.
    async fn count_files(&self) -> StorageResult<usize>;
}
