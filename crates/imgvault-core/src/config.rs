//! Configuration module
//!
//! Environment-driven configuration for the upload service. Paths and limits
//! come from the environment with defaults suitable for local development;
//! `validate` runs once at startup.

use std::env;
use std::path::PathBuf;

use anyhow::{bail, Context};

const DEFAULT_SERVER_PORT: u16 = 8000;
const DEFAULT_MAX_FILE_SIZE: usize = 10 * 1024 * 1024; // 10 MiB
const DEFAULT_UPLOAD_DIR: &str = "data/raw_uploads";
const DEFAULT_METADATA_LOG_NAME: &str = "upload_log.json";

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    /// Directory that receives stored upload files.
    pub upload_dir: PathBuf,
    /// Path of the JSON metadata document. Defaults to a sibling of the
    /// upload directory so it is never counted as an upload.
    pub metadata_log_path: PathBuf,
    /// Maximum accepted upload size in bytes.
    pub max_file_size: usize,
    /// Shared secret for the admin verification endpoint. `None` means the
    /// endpoint is unconfigured and always fails server-side.
    pub admin_password: Option<String>,
    /// Static frontend asset directory served at the root path.
    pub frontend_dir: Option<PathBuf>,
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let server_port = match env_opt("SERVER_PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("invalid SERVER_PORT: {raw}"))?,
            None => DEFAULT_SERVER_PORT,
        };

        let upload_dir =
            PathBuf::from(env_opt("UPLOAD_DIR").unwrap_or_else(|| DEFAULT_UPLOAD_DIR.to_string()));

        let metadata_log_path = match env_opt("METADATA_LOG") {
            Some(path) => PathBuf::from(path),
            None => upload_dir
                .parent()
                .map(|p| p.join(DEFAULT_METADATA_LOG_NAME))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_METADATA_LOG_NAME)),
        };

        let max_file_size = match env_opt("MAX_FILE_SIZE") {
            Some(raw) => raw
                .parse::<usize>()
                .with_context(|| format!("invalid MAX_FILE_SIZE: {raw}"))?,
            None => DEFAULT_MAX_FILE_SIZE,
        };

        let admin_password = env_opt("ADMIN_PASSWORD");
        let frontend_dir = env_opt("FRONTEND_DIR").map(PathBuf::from);

        let config = Config {
            server_port,
            upload_dir,
            metadata_log_path,
            max_file_size,
            admin_password,
            frontend_dir,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.max_file_size == 0 {
            bail!("MAX_FILE_SIZE must be greater than 0");
        }
        if self.metadata_log_path.starts_with(&self.upload_dir) {
            bail!(
                "METADATA_LOG must not live inside UPLOAD_DIR (it would be counted as an upload)"
            );
        }
        Ok(())
    }

    pub fn max_file_size_mb(&self) -> usize {
        self.max_file_size / 1024 / 1024
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_rejects_zero_max_size() {
        let config = Config {
            server_port: 8000,
            upload_dir: PathBuf::from("/tmp/uploads"),
            metadata_log_path: PathBuf::from("/tmp/upload_log.json"),
            max_file_size: 0,
            admin_password: None,
            frontend_dir: None,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_log_inside_upload_dir() {
        let config = Config {
            server_port: 8000,
            upload_dir: PathBuf::from("/tmp/uploads"),
            metadata_log_path: PathBuf::from("/tmp/uploads/upload_log.json"),
            max_file_size: 1024,
            admin_password: None,
            frontend_dir: None,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_accepts_sibling_log() {
        let config = Config {
            server_port: 8000,
            upload_dir: PathBuf::from("/tmp/data/uploads"),
            metadata_log_path: PathBuf::from("/tmp/data/upload_log.json"),
            max_file_size: 1024,
            admin_password: Some("secret".to_string()),
            frontend_dir: None,
        };
        assert!(config.validate().is_ok());
    }
}
