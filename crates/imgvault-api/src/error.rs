//! HTTP error response conversion
//!
//! **Preferred handler pattern:** Return `Result<impl IntoResponse, HttpAppError>`.
//! Use `AppError` (or types that implement `Into<AppError>`) for errors and let
//! `?` convert them to `HttpAppError` so they render consistently (status,
//! body, logging).

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use imgvault_core::{AppError, ErrorMetadata, LogLevel};
use imgvault_ledger::LedgerError;
use imgvault_storage::StorageError;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    /// Machine-readable error code for programmatic handling
    pub code: String,
}

/// Wrapper type for AppError to implement IntoResponse
/// This is necessary because of Rust's orphan rules - we can't implement
/// IntoResponse (external trait) for AppError (external type from imgvault-core)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::Internal(err.to_string()))
    }
}

// Convert domain errors to HttpAppError (avoids orphan rule: we impl for local HttpAppError)

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        let app = match err {
            StorageError::TooLarge { limit } => AppError::PayloadTooLarge(format!(
                "File too large. Maximum size is {}MB.",
                limit / 1024 / 1024
            )),
            StorageError::Stream(msg) => AppError::StreamTruncated(msg),
            StorageError::WriteFailed(msg) => AppError::Internal(msg),
            StorageError::DeleteFailed(msg) => AppError::Internal(msg),
            StorageError::InvalidName(msg) => AppError::InvalidField(msg),
            StorageError::DirectoryUnreadable(msg) => AppError::DirectoryUnreadable(msg),
            StorageError::IoError(err) => AppError::Internal(format!("IO error: {}", err)),
            StorageError::ConfigError(msg) => AppError::Unconfigured(msg),
        };
        HttpAppError(app)
    }
}

impl From<LedgerError> for HttpAppError {
    fn from(err: LedgerError) -> Self {
        HttpAppError(AppError::LogWrite(err.to_string()))
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type = error_type, "Error occurred");
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        let body = Json(ErrorResponse {
            error: app_error.client_message(),
            code: app_error.error_code().to_string(),
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_too_large_maps_to_payload_too_large() {
        let storage_err = StorageError::TooLarge {
            limit: 10 * 1024 * 1024,
        };
        let HttpAppError(app_err) = storage_err.into();
        match app_err {
            AppError::PayloadTooLarge(msg) => assert!(msg.contains("10MB")),
            _ => panic!("Expected PayloadTooLarge variant"),
        }
        let err: HttpAppError = StorageError::TooLarge {
            limit: 10 * 1024 * 1024,
        }
        .into();
        assert_eq!(err.0.http_status_code(), 413);
    }

    #[test]
    fn storage_stream_maps_to_truncated() {
        let storage_err = StorageError::Stream("client disconnected".to_string());
        let HttpAppError(app_err) = storage_err.into();
        match app_err {
            AppError::StreamTruncated(msg) => assert!(msg.contains("disconnected")),
            _ => panic!("Expected StreamTruncated variant"),
        }
    }

    #[test]
    fn ledger_errors_map_to_log_write() {
        let ledger_err = LedgerError::Serialize(serde_json::from_str::<u32>("x").unwrap_err());
        let HttpAppError(app_err) = ledger_err.into();
        assert_eq!(app_err.http_status_code(), 500);
        assert_eq!(app_err.error_code(), "LOG_WRITE_FAILURE");
    }

    /// Serialized ErrorResponse has "error" and "code" fields.
    #[test]
    fn error_response_shape() {
        let response = ErrorResponse {
            error: "Invalid file extension".to_string(),
            code: "INVALID_EXTENSION".to_string(),
        };
        let json = serde_json::to_value(&response).expect("serialize");
        assert!(json.get("error").and_then(|v| v.as_str()).is_some());
        assert_eq!(
            json.get("code").and_then(|v| v.as_str()),
            Some("INVALID_EXTENSION")
        );
    }
}
