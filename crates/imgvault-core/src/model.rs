//! Domain model for accepted uploads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One accepted, non-duplicate upload as persisted in the metadata log.
///
/// All fields are immutable once logged. `original_name` is client-supplied
/// and kept verbatim for audit only; it is never used as a filesystem path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadRecord {
    /// Acceptance instant.
    pub timestamp: DateTime<Utc>,
    /// Client-supplied filename, untrusted.
    pub original_name: String,
    /// Server-generated `{uuid}.{ext}` name; doubles as the filesystem key.
    pub stored_name: String,
    /// Validated free-text field.
    pub country: String,
    /// Hex-encoded SHA-256 of the full file content; primary dedup key.
    /// Empty for legacy records written before digests were logged; such
    /// records are skipped when seeding the dedup index.
    #[serde(default)]
    pub content_digest: String,
}

impl UploadRecord {
    /// Whether this record carries a digest usable for dedup seeding.
    pub fn has_digest(&self) -> bool {
        !self.content_digest.is_empty()
    }
}
