//! Test helpers: build AppState and router for integration tests.
//!
//! Each test app runs against its own temp directory; the upload directory
//! and metadata log live side by side the way the default config lays them
//! out.

use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use imgvault_core::Config;
use tempfile::TempDir;

pub const TEST_ADMIN_PASSWORD: &str = "test-admin-secret";

/// Test application: server, config, and owned temp directory.
pub struct TestApp {
    pub server: TestServer,
    pub config: Config,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn stored_file_count(&self) -> usize {
        std::fs::read_dir(&self.config.upload_dir)
            .map(|entries| {
                entries
                    .filter_map(|e| e.ok())
                    .filter(|e| e.path().is_file())
                    .count()
            })
            .unwrap_or(0)
    }

    pub fn log_records(&self) -> Vec<serde_json::Value> {
        let Ok(raw) = std::fs::read(&self.config.metadata_log_path) else {
            return Vec::new();
        };
        serde_json::from_slice(&raw).unwrap_or_default()
    }
}

pub fn test_config(temp_dir: &TempDir) -> Config {
    Config {
        server_port: 0,
        upload_dir: temp_dir.path().join("uploads"),
        metadata_log_path: temp_dir.path().join("upload_log.json"),
        max_file_size: 10 * 1024 * 1024,
        admin_password: Some(TEST_ADMIN_PASSWORD.to_string()),
        frontend_dir: None,
    }
}

/// Setup a test app with default config in a fresh temp directory.
pub async fn setup_test_app() -> TestApp {
    let temp_dir = TempDir::new().expect("create temp dir");
    let config = test_config(&temp_dir);
    setup_test_app_with(temp_dir, config).await
}

/// Setup a test app from an explicit config, e.g. to lower the size limit
/// or to restart against an existing directory.
pub async fn setup_test_app_with(temp_dir: TempDir, config: Config) -> TestApp {
    let (_state, router) = imgvault_api::setup::initialize_app(config.clone())
        .await
        .expect("initialize app");
    let server = TestServer::new(router).expect("build test server");

    TestApp {
        server,
        config,
        _temp_dir: temp_dir,
    }
}

/// Build a multipart upload form. Field order follows argument order:
/// the file part first, country (when given) after it.
pub fn upload_form(
    filename: &str,
    content_type: &str,
    data: Vec<u8>,
    country: Option<&str>,
) -> MultipartForm {
    let part = Part::bytes(data)
        .file_name(filename.to_string())
        .mime_type(content_type.to_string());
    let mut form = MultipartForm::new().add_part("file", part);
    if let Some(country) = country {
        form = form.add_text("country", country.to_string());
    }
    form
}

/// Minimal valid PNG header bytes followed by filler, enough to look like
/// image content without being one.
pub fn png_bytes(filler: &[u8]) -> Vec<u8> {
    let mut data = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    data.extend_from_slice(filler);
    data
}
