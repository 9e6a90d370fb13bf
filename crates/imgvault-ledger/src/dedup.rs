//! In-memory content-digest index for duplicate detection.
//!
//! Seeded from the metadata log at startup and updated as uploads are
//! accepted. Process-local: a restart rebuilds it from the log, so digests
//! that were reserved but never logged are forgotten (their files remain on
//! disk but are invisible to dedup).

use imgvault_core::UploadRecord;
use std::collections::HashSet;
use std::sync::Mutex;

#[derive(Default)]
pub struct DedupIndex {
    inner: Mutex<HashSet<String>>,
}

impl DedupIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load known digests from previously logged records. Records without a
    /// digest are skipped.
    pub fn seed(&self, records: &[UploadRecord]) {
        let mut set = self.lock();
        for record in records {
            if record.has_digest() {
                set.insert(record.content_digest.clone());
            }
        }
    }

    /// Atomic test-and-insert. Returns `true` if the digest was already
    /// known (the upload is a duplicate); `false` if it was reserved now.
    pub fn check_and_reserve(&self, digest: &str) -> bool {
        !self.lock().insert(digest.to_string())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashSet<String>> {
        // Recover the set on poison; an insert cannot leave it inconsistent.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}
