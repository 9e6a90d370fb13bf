//! Upload count handler.

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::error::HttpAppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: usize,
}

/// Count regular files in the upload directory. Subdirectories and the
/// like are excluded; duplicates were never stored, so they never count.
pub async fn get_upload_count(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CountResponse>, HttpAppError> {
    let count = state.storage.count_files().await?;
    Ok(Json(CountResponse { count }))
}
