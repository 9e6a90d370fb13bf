//! Error types module
//!
//! All failures are unified under the `AppError` enum. Each variant carries
//! its HTTP presentation via the `ErrorMetadata` trait so the API crate can
//! translate errors without matching on variants itself.

use std::io;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented.
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "INVALID_EXTENSION")
    fn error_code(&self) -> &'static str;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid field: {0}")]
    InvalidField(String),

    #[error("Invalid file type: {0}")]
    InvalidType(String),

    #[error("Invalid file extension: {0}")]
    InvalidExtension(String),

    #[error("File too large: {0}")]
    PayloadTooLarge(String),

    #[error("Stream truncated: {0}")]
    StreamTruncated(String),

    #[error("Metadata log write failed: {0}")]
    LogWrite(String),

    #[error("Upload directory unreadable: {0}")]
    DirectoryUnreadable(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Server misconfiguration: {0}")]
    Unconfigured(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal(format!("JSON error: {}", err))
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

/// Static metadata per variant: (http_status, error_code, log_level).
/// client_message stays per-variant for dynamic content.
fn app_error_static_metadata(err: &AppError) -> (u16, &'static str, LogLevel) {
    match err {
        AppError::InvalidField(_) => (400, "INVALID_FIELD", LogLevel::Debug),
        AppError::InvalidType(_) => (400, "INVALID_TYPE", LogLevel::Debug),
        AppError::InvalidExtension(_) => (400, "INVALID_EXTENSION", LogLevel::Debug),
        AppError::PayloadTooLarge(_) => (413, "PAYLOAD_TOO_LARGE", LogLevel::Debug),
        AppError::StreamTruncated(_) => (400, "STREAM_TRUNCATED", LogLevel::Warn),
        AppError::LogWrite(_) => (500, "LOG_WRITE_FAILURE", LogLevel::Error),
        AppError::DirectoryUnreadable(_) => (500, "DIRECTORY_UNREADABLE", LogLevel::Error),
        AppError::Unauthorized(_) => (401, "UNAUTHORIZED", LogLevel::Debug),
        AppError::Unconfigured(_) => (500, "UNCONFIGURED", LogLevel::Error),
        AppError::Internal(_) => (500, "INTERNAL_ERROR", LogLevel::Error),
    }
}

impl AppError {
    /// Error type name for structured log fields.
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::InvalidField(_) => "InvalidField",
            AppError::InvalidType(_) => "InvalidType",
            AppError::InvalidExtension(_) => "InvalidExtension",
            AppError::PayloadTooLarge(_) => "PayloadTooLarge",
            AppError::StreamTruncated(_) => "StreamTruncated",
            AppError::LogWrite(_) => "LogWrite",
            AppError::DirectoryUnreadable(_) => "DirectoryUnreadable",
            AppError::Unauthorized(_) => "Unauthorized",
            AppError::Unconfigured(_) => "Unconfigured",
            AppError::Internal(_) => "Internal",
        }
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).2
    }

    fn client_message(&self) -> String {
        match self {
            // Validation and size failures are descriptive and safe to echo.
            AppError::InvalidField(msg)
            | AppError::InvalidType(msg)
            | AppError::InvalidExtension(msg)
            | AppError::PayloadTooLarge(msg) => msg.clone(),
            AppError::StreamTruncated(_) => {
                "Upload stream ended unexpectedly".to_string()
            }
            AppError::Unauthorized(msg) => msg.clone(),
            // Server-side classes never expose internal detail.
            AppError::LogWrite(_) => "Failed to record upload metadata".to_string(),
            AppError::DirectoryUnreadable(_) => {
                "Could not retrieve file count".to_string()
            }
            AppError::Unconfigured(_) | AppError::Internal(_) => {
                "Internal server error".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_extension_is_client_error() {
        let err = AppError::InvalidExtension("Only .jpg allowed".to_string());
        assert_eq!(err.http_status_code(), 400);
        assert_eq!(err.error_code(), "INVALID_EXTENSION");
        assert_eq!(err.client_message(), "Only .jpg allowed");
        assert_eq!(err.log_level(), LogLevel::Debug);
    }

    #[test]
    fn payload_too_large_maps_to_413() {
        let err = AppError::PayloadTooLarge("Maximum size is 10MB".to_string());
        assert_eq!(err.http_status_code(), 413);
        assert_eq!(err.error_code(), "PAYLOAD_TOO_LARGE");
    }

    #[test]
    fn server_errors_hide_detail() {
        let err = AppError::LogWrite("disk full at /var/log".to_string());
        assert_eq!(err.http_status_code(), 500);
        assert!(!err.client_message().contains("/var/log"));
        assert_eq!(err.log_level(), LogLevel::Error);

        let err = AppError::Unconfigured("ADMIN_PASSWORD unset".to_string());
        assert_eq!(err.client_message(), "Internal server error");
    }

    #[test]
    fn io_errors_convert_to_internal() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = AppError::from(io_err);
        assert_eq!(err.error_type(), "Internal");
        assert_eq!(err.http_status_code(), 500);
    }
}
