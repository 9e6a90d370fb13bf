//! Upload ingestion handler.
//!
//! Orchestrates one upload: multipart parsing, validation, size-bounded
//! streaming write, duplicate detection, and the metadata log append.

use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Json,
};
use chrono::Utc;
use futures::TryStreamExt;
use serde::Serialize;
use uuid::Uuid;

use imgvault_core::{
    validation::{validate_content_type, validate_country, validate_extension, UNKNOWN_COUNTRY},
    AppError, UploadRecord,
};
use imgvault_storage::{ByteStream, StorageError, StoredObject};

use crate::error::HttpAppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub filename: String,
    pub duplicate: bool,
}

/// Upload image handler
///
/// Fields are processed in arrival order. The file part's headers (content
/// type, extension) are validated before a single body byte is read; the
/// body then streams straight to storage under the size limit. If the
/// country field arrives after the file and fails validation, the
/// just-stored file is deleted before the error response, so a rejected
/// request never leaves a file behind.
#[tracing::instrument(skip(state, multipart), fields(request_id = %Uuid::new_v4()))]
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, HttpAppError> {
    let mut country: Option<String> = None;
    let mut stored: Option<StoredObject> = None;
    let mut original_name = String::new();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                discard_stored(&state, stored.as_ref()).await;
                return Err(AppError::InvalidField(format!(
                    "Malformed multipart request: {}",
                    e
                ))
                .into());
            }
        };

        let field_name = field.name().map(str::to_string);
        match field_name.as_deref() {
            Some("country") => {
                let raw = match field.text().await {
                    Ok(raw) => raw,
                    Err(e) => {
                        discard_stored(&state, stored.as_ref()).await;
                        return Err(AppError::InvalidField(format!(
                            "Failed to read country field: {}",
                            e
                        ))
                        .into());
                    }
                };
                match validate_country(&raw) {
                    Ok(validated) => country = Some(validated),
                    Err(e) => {
                        discard_stored(&state, stored.as_ref()).await;
                        return Err(e.into());
                    }
                }
            }
            Some("file") if stored.is_none() => {
                let content_type = field.content_type().unwrap_or_default().to_string();
                validate_content_type(&content_type)?;

                let filename = field.file_name().unwrap_or_default().to_string();
                let extension = validate_extension(&filename)?;

                let body: ByteStream<'_> =
                    Box::pin(field.map_err(|e| StorageError::Stream(e.to_string())));
                let object = state
                    .storage
                    .store_stream(&extension, body, state.config.max_file_size)
                    .await?;

                original_name = filename;
                stored = Some(object);
            }
            // Unknown fields (and any extra file part) are skipped unread.
            _ => {}
        }
    }

    let Some(stored) = stored else {
        return Err(AppError::InvalidField("Missing file field.".to_string()).into());
    };
    let country = country.unwrap_or_else(|| UNKNOWN_COUNTRY.to_string());

    // Commit section: digest reservation and log append are serialized so a
    // digest can never be reserved twice and log writes never interleave.
    let commit_guard = state.commit_lock.lock().await;
    let duplicate = state.dedup.check_and_reserve(&stored.digest);

    if duplicate {
        drop(commit_guard);
        state.storage.delete(&stored.stored_name).await?;

        let existing_name = state
            .metadata_log
            .load_all()
            .await
            .into_iter()
            .find(|r| r.content_digest == stored.digest)
            .map(|r| r.stored_name);

        let (message, filename) = match existing_name {
            Some(name) => ("Duplicate upload".to_string(), name),
            None => {
                // The digest was reserved by an earlier request whose log
                // append failed: the content is known but no record names
                // its file, so there is no retrievable filename to return.
                tracing::warn!(
                    digest = %stored.digest,
                    "Duplicate of a reserved but unlogged upload"
                );
                (
                    "Duplicate upload; no stored file is retrievable for this content"
                        .to_string(),
                    String::new(),
                )
            }
        };

        tracing::info!(
            digest = %stored.digest,
            filename = %filename,
            "Duplicate upload discarded"
        );
        return Ok(Json(UploadResponse {
            message,
            filename,
            duplicate: true,
        }));
    }

    let record = UploadRecord {
        timestamp: Utc::now(),
        original_name: original_name.clone(),
        stored_name: stored.stored_name.clone(),
        country,
        content_digest: stored.digest.clone(),
    };
    // A failed append is not rolled back: the file stays on disk and the
    // digest stays reserved, so a retry of the same content reads as a
    // duplicate until restart.
    state.metadata_log.append(record).await?;
    drop(commit_guard);

    tracing::info!(
        original_name = %original_name,
        stored_name = %stored.stored_name,
        size_bytes = stored.size,
        "Upload accepted"
    );
    Ok(Json(UploadResponse {
        message: "Upload successful".to_string(),
        filename: stored.stored_name,
        duplicate: false,
    }))
}

/// Remove a file stored earlier in this request after a later field failed
/// validation. Best-effort; the validation error still wins.
async fn discard_stored(state: &AppState, stored: Option<&StoredObject>) {
    if let Some(object) = stored {
        if let Err(e) = state.storage.delete(&object.stored_name).await {
            tracing::warn!(
                stored_name = %object.stored_name,
                error = %e,
                "Failed to discard stored file after rejected request"
            );
        }
    }
}
