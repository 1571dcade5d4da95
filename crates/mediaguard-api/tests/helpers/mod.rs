//! Test helpers: build AppState and router for integration tests.
//!
//! Vendor APIs (Vision, Video Intelligence, Cloudflare Stream) all point at one
//! mockito server; the object store is a local directory.
//!
//! Run from workspace root: `cargo test -p mediaguard-api --test events_test`.

#![allow(dead_code)]

use axum_test::TestServer;
use mediaguard_api::setup::{routes, services};
use mediaguard_core::{BaseConfig, Config, ModerationConfig, SecretString, StorageBackend};
use mediaguard_storage::{LocalStorage, Storage};
use std::sync::Arc;
use tempfile::TempDir;

pub const BUCKET: &str = "uploads";
pub const ACCOUNT_ID: &str = "acct-1";
pub const CLOUDFLARE_TOKEN: &str = "cf-test-token";
pub const GOOGLE_API_KEY: &str = "google-test-key";

pub const IMAGE_PLACEHOLDER: &[u8] = b"PNG-PLACEHOLDER";
pub const VIDEO_PLACEHOLDER: &[u8] = b"MP4-PLACEHOLDER";

/// Test application: server, mocked vendors, and owned resources.
pub struct TestApp {
    pub server: TestServer,
    pub vendor: mockito::ServerGuard,
    pub storage: Arc<dyn Storage>,
    pub _bucket_dir: TempDir,
    pub scratch_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub async fn put_object(&self, key: &str, data: &[u8], content_type: &str) {
        self.storage
            .upload_with_key(key, data.to_vec(), content_type)
            .await
            .expect("Failed to seed object");
    }

    pub async fn object(&self, key: &str) -> Vec<u8> {
        self.storage
            .download(key)
            .await
            .expect("Object should exist")
    }
}

pub fn test_config(vendor_url: &str, bucket_dir: &TempDir, scratch_dir: &TempDir) -> Config {
    Config::from(ModerationConfig {
        base: BaseConfig {
            environment: "test".to_string(),
            ..BaseConfig::default()
        },
        storage_backend: StorageBackend::Local,
        local_storage_path: Some(bucket_dir.path().display().to_string()),
        local_storage_base_url: Some("http://localhost:8080/media".to_string()),
        scratch_dir: scratch_dir.path().to_path_buf(),
        google_api_key: Some(SecretString::new(GOOGLE_API_KEY)),
        vision_api_base_url: vendor_url.to_string(),
        video_intelligence_api_base_url: vendor_url.to_string(),
        video_poll_interval_ms: 10,
        cloudflare_base_url: format!("{}/client/v4/accounts", vendor_url),
        cloudflare_account_id: ACCOUNT_ID.to_string(),
        cloudflare_api_token: SecretString::new(CLOUDFLARE_TOKEN),
        ..ModerationConfig::default()
    })
}

/// Setup test app with local storage holding both placeholders.
pub async fn setup_test_app() -> TestApp {
    let vendor = mockito::Server::new_async().await;
    let bucket_dir = TempDir::new().expect("Failed to create bucket dir");
    let scratch_dir = TempDir::new().expect("Failed to create scratch dir");

    let config = test_config(&vendor.url(), &bucket_dir, &scratch_dir);
    config.validate().expect("Test config should be valid");

    let storage: Arc<dyn Storage> = Arc::new(
        LocalStorage::new(
            bucket_dir.path(),
            "http://localhost:8080/media".to_string(),
        )
        .await
        .expect("Failed to create local storage"),
    );
    storage
        .upload_with_key("prohibited.png", IMAGE_PLACEHOLDER.to_vec(), "image/png")
        .await
        .expect("Failed to seed image placeholder");
    storage
        .upload_with_key("annotate.mp4", VIDEO_PLACEHOLDER.to_vec(), "video/mp4")
        .await
        .expect("Failed to seed video placeholder");

    let state = services::initialize_services(&config, storage.clone())
        .expect("Failed to initialize services");
    let app = routes::setup_routes(&config, state);

    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        vendor,
        storage,
        _bucket_dir: bucket_dir,
        scratch_dir,
    }
}

/// Bare Cloud Storage object resource, as Eventarc delivers it.
pub fn storage_object(name: &str, content_type: &str) -> serde_json::Value {
    serde_json::json!({
        "kind": "storage#object",
        "bucket": BUCKET,
        "name": name,
        "contentType": content_type,
        "size": "1024",
        "timeCreated": "2024-05-01T10:00:00.000Z",
        "metadata": {}
    })
}
