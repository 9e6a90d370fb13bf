//! Application setup and initialization
//!
//! All application initialization logic lives here rather than in main.rs
//! for better organization and testability.

pub mod routes;
pub mod server;

use crate::state::AppState;
use anyhow::{Context, Result};
use imgvault_core::Config;
use imgvault_ledger::{DedupIndex, MetadataLog};
use imgvault_storage::LocalStorage;
use std::sync::Arc;

/// Initialize the application: storage, metadata log, dedup index, routes.
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Fail fast on misconfiguration.
    config
        .validate()
        .context("Configuration validation failed")?;

    let storage = LocalStorage::new(&config.upload_dir)
        .await
        .context("Failed to initialize upload storage")?;

    let metadata_log = MetadataLog::new(&config.metadata_log_path);

    // Re-seed duplicate detection from the persisted log. Digests reserved
    // but never logged before a crash are forgotten here on purpose.
    let records = metadata_log.load_all().await;
    let dedup = DedupIndex::new();
    dedup.seed(&records);
    tracing::info!(
        records = records.len(),
        known_digests = dedup.len(),
        "Dedup index seeded from metadata log"
    );

    let state = Arc::new(AppState::new(
        config.clone(),
        Arc::new(storage),
        metadata_log,
        dedup,
    ));

    let router = routes::setup_routes(&config, state.clone());

    Ok((state, router))
}
