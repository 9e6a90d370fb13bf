//! Admin password verification handler.

use std::sync::Arc;

use axum::{extract::State, Form, Json};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

use imgvault_core::AppError;

use crate::error::HttpAppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct VerifyAdminForm {
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct VerifyAdminResponse {
    pub verified: bool,
}

/// Compare the submitted password against the configured admin secret.
///
/// The comparison is constant-time over the byte contents; only the length
/// check can short-circuit.
pub async fn verify_admin(
    State(state): State<Arc<AppState>>,
    Form(form): Form<VerifyAdminForm>,
) -> Result<Json<VerifyAdminResponse>, HttpAppError> {
    let Some(secret) = state.config.admin_password.as_deref() else {
        return Err(AppError::Unconfigured(
            "ADMIN_PASSWORD is not set; admin verification is disabled".to_string(),
        )
        .into());
    };

    if form.password.as_bytes().ct_eq(secret.as_bytes()).into() {
        Ok(Json(VerifyAdminResponse { verified: true }))
    } else {
        Err(AppError::Unauthorized("Invalid password.".to_string()).into())
    }
}
