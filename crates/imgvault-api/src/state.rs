//! Application state shared across handlers.

use imgvault_core::Config;
use imgvault_ledger::{DedupIndex, MetadataLog};
use imgvault_storage::Storage;
use std::sync::Arc;
use tokio::sync::Mutex;

pub struct AppState {
    pub config: Config,
    pub storage: Arc<dyn Storage>,
    pub metadata_log: MetadataLog,
    pub dedup: DedupIndex,
    /// Serializes the dedup-reserve + log-append commit section of an upload.
    /// File writes run outside this lock and stay concurrent.
    pub commit_lock: Mutex<()>,
}

impl AppState {
    pub fn new(
        config: Config,
        storage: Arc<dyn Storage>,
        metadata_log: MetadataLog,
        dedup: DedupIndex,
    ) -> Self {
        AppState {
            config,
            storage,
            metadata_log,
            dedup,
            commit_lock: Mutex::new(()),
        }
    }
}
