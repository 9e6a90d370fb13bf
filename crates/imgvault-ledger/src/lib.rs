//! Imgvault Ledger Library
//!
//! Durable audit state for accepted uploads: the append-only metadata log
//! (a single JSON document) and the in-memory dedup index seeded from it.

pub mod dedup;
pub mod log;

// Re-export commonly used types
pub use dedup::DedupIndex;
pub use log::{LedgerError, LedgerResult, MetadataLog};
