//! Imgvault Storage Library
//!
//! This crate provides the storage abstraction and the local-filesystem
//! backend for upload files.
//!
//! # Stored names
//!
//! Stored files are named `{uuid-v4}.{ext}` where the extension has already
//! been validated upstream. Names must not contain `..` or path separators;
//! the backend rejects anything else before touching the filesystem.

pub mod local;
pub mod traits;

// Re-export commonly used types
pub use local::LocalStorage;
pub use traits::{ByteStream, Storage, StorageError, StorageResult, StoredObject};
