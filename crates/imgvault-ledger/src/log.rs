//! Append-only metadata log over a single JSON document.
//!
//! The backing document is the full ordered sequence of accepted uploads.
//! `append` is a read-modify-write of the whole document, not a true log
//! append; callers must serialize concurrent appends or records are lost.
//! The document on disk is always a well-formed JSON array: writes go to a
//! temporary sibling first and are promoted with an atomic rename.

use imgvault_core::UploadRecord;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Failed to serialize metadata log: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write metadata log {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type LedgerResult<T> = Result<T, LedgerError>;

/// The metadata log document.
#[derive(Clone)]
pub struct MetadataLog {
    path: PathBuf,
}

impl MetadataLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        MetadataLog { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the full record sequence.
    ///
    /// A missing or unparsable document degrades to an empty sequence; the
    /// only consumer of history is dedup seeding, for which an empty seed is
    /// conservative. Never an error.
    pub async fn load_all(&self) -> Vec<UploadRecord> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Metadata log unreadable, starting with empty history"
                );
                return Vec::new();
            }
        };

        match serde_json::from_slice::<Vec<UploadRecord>>(&bytes) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Metadata log malformed, starting with empty history"
                );
                Vec::new()
            }
        }
    }

    /// Append one record: read the current sequence (tolerant, as above),
    /// push, and write the whole document back.
    ///
    /// The new document is written to a temporary sibling and renamed into
    /// place so a crash mid-write never leaves a partial record visible.
    pub async fn append(&self, record: UploadRecord) -> LedgerResult<()> {
        let mut records = self.load_all().await;
        records.push(record);

        let json = serde_json::to_vec_pretty(&records)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await.map_err(|e| LedgerError::Write {
                    path: self.path.clone(),
                    source: e,
                })?;
            }
        }

        let tmp_path = self.path.with_extension(format!("tmp.{}", Uuid::new_v4()));
        fs::write(&tmp_path, &json).await.map_err(|e| LedgerError::Write {
            path: tmp_path.clone(),
            source: e,
        })?;

        if let Err(e) = fs::rename(&tmp_path, &self.path).await {
            // Don't leave the orphaned temp document behind.
            let _ = fs::remove_file(&tmp_path).await;
            return Err(LedgerError::Write {
                path: self.path.clone(),
                source: e,
            });
        }

        tracing::debug!(
            path = %self.path.display(),
            records = records.len(),
            "Metadata log updated"
        );
        Ok(())
    }
}
