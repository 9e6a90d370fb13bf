//! Imgvault API Library
//!
//! HTTP handlers, application state, and server setup for the upload service.

pub mod error;
pub mod handlers;
pub mod setup;
pub mod state;

pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
