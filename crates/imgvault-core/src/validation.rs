//! Pure validation for upload requests.
//!
//! These checks run before any byte of the request body is persisted, so
//! every function here is a pure decision over the part headers and form
//! fields. I/O never happens in this module.

use crate::error::AppError;

/// MIME types accepted for upload.
pub const ALLOWED_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif"];

/// File extensions accepted for upload (lowercase, no leading dot).
pub const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif"];

/// Maximum length of the country field, in characters.
pub const MAX_COUNTRY_LEN: usize = 50;

/// Sentinel value that bypasses the country character-set check.
pub const UNKNOWN_COUNTRY: &str = "Unknown";

/// Normalize a MIME type by stripping parameters
/// (e.g. "image/jpeg; charset=utf-8" -> "image/jpeg").
fn normalize_mime_type(content_type: &str) -> &str {
    content_type
        .split(';')
        .next()
        .map(|s| s.trim())
        .unwrap_or(content_type)
}

/// Validate the declared content type against the image allowlist.
pub fn validate_content_type(content_type: &str) -> Result<(), AppError> {
    let normalized = normalize_mime_type(content_type).to_lowercase();
    if !ALLOWED_CONTENT_TYPES.contains(&normalized.as_str()) {
        return Err(AppError::InvalidType(format!(
            "Invalid file type. Allowed types: {}",
            ALLOWED_CONTENT_TYPES.join(", ")
        )));
    }
    Ok(())
}

/// Validate the client filename's extension and return it normalized
/// (lowercase, no dot). The extension must be present and allowed.
pub fn validate_extension(filename: &str) -> Result<String, AppError> {
    let extension = match filename.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => ext.to_lowercase(),
        _ => String::new(),
    };

    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(AppError::InvalidExtension(format!(
            "Invalid file extension. Allowed extensions: {}",
            ALLOWED_EXTENSIONS
                .iter()
                .map(|e| format!(".{e}"))
                .collect::<Vec<_>>()
                .join(", ")
        )));
    }

    Ok(extension)
}

/// Validate and normalize the free-text country field.
///
/// The raw value is truncated to `MAX_COUNTRY_LEN` characters first. The
/// `"Unknown"` sentinel passes as-is; anything else must be non-empty and
/// contain only letters, whitespace, and hyphens.
pub fn validate_country(raw: &str) -> Result<String, AppError> {
    let truncated: String = raw.chars().take(MAX_COUNTRY_LEN).collect();

    if truncated == UNKNOWN_COUNTRY {
        return Ok(truncated);
    }

    let valid = !truncated.is_empty()
        && truncated
            .chars()
            .all(|c| c.is_ascii_alphabetic() || c.is_whitespace() || c == '-');
    if !valid {
        return Err(AppError::InvalidField(
            "Invalid country format".to_string(),
        ));
    }

    Ok(truncated)
}
