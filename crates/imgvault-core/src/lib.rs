//! Imgvault Core Library
//!
//! This crate provides the domain model, error types, configuration, and
//! validation shared across all imgvault components.

pub mod config;
pub mod error;
pub mod model;
pub mod validation;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use model::UploadRecord;
