//! Test helpers: build AppState and router for integration tests.
//!
//! The router is exercised end-to-end through `axum_test::TestServer`; the
//! catalog and tag index are in-memory doubles, blobs land in a tempdir via
//! the real `LocalBlobStore`.

#![allow(dead_code)]

pub mod memory;

use axum_test::multipart::{MultipartForm, Part};
use axum_test::{TestResponse, TestServer};
use std::sync::Arc;
use tempfile::TempDir;
use uuid::Uuid;

use clipstream_api::constants;
use clipstream_api::setup::routes;
use clipstream_api::state::AppState;
use clipstream_core::Config;
use clipstream_storage::{BlobStore, LocalBlobStore};

use memory::{InMemoryCatalog, InMemoryTagIndex};

/// Video size limit in tests, small enough that oversize uploads stay cheap.
pub const TEST_MAX_VIDEO_BYTES: usize = 1024 * 1024;
pub const TEST_MAX_THUMBNAIL_BYTES: usize = 64 * 1024;

/// API path prefix for tests (e.g. `/api`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::API_PREFIX, path)
}

/// A caller identity as the upstream gateway would forward it.
pub struct TestUser {
    pub id: Uuid,
    pub role: &'static str,
}

pub fn creator() -> TestUser {
    TestUser {
        id: Uuid::new_v4(),
        role: "creator",
    }
}

pub fn admin() -> TestUser {
    TestUser {
        id: Uuid::new_v4(),
        role: "admin",
    }
}

pub fn viewer() -> TestUser {
    TestUser {
        id: Uuid::new_v4(),
        role: "user",
    }
}

/// Test application: server plus typed handles on the backends so tests can
/// inspect and mutate state directly.
pub struct TestApp {
    pub server: TestServer,
    pub catalog: Arc<InMemoryCatalog>,
    pub tags: Arc<InMemoryTagIndex>,
    pub blobs: Arc<dyn BlobStore>,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Number of blob files currently on disk, across both kind directories.
    pub fn blob_count(&self) -> usize {
        fn count(dir: &std::path::Path) -> usize {
            let mut n = 0;
            if let Ok(entries) = std::fs::read_dir(dir) {
                for entry in entries.flatten() {
                    let path = entry.path();
                    if path.is_dir() {
                        n += count(&path);
                    } else {
                        n += 1;
                    }
                }
            }
            n
        }
        count(self._temp_dir.path())
    }
}

fn test_config() -> Config {
    Config {
        server_port: 3000,
        database_url: "postgres://localhost/clipstream-test".to_string(),
        db_max_connections: 5,
        db_timeout_seconds: 30,
        storage_path: "unused-in-tests".to_string(),
        base_url: "http://localhost:3000".to_string(),
        cors_origins: vec![],
        max_video_size_bytes: TEST_MAX_VIDEO_BYTES,
        max_thumbnail_size_bytes: TEST_MAX_THUMBNAIL_BYTES,
        environment: "test".to_string(),
    }
}

/// Setup test app with in-memory catalog and tempdir-backed blob storage.
pub async fn setup_test_app() -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let blobs: Arc<dyn BlobStore> = Arc::new(
        LocalBlobStore::new(temp_dir.path().to_path_buf())
            .await
            .expect("Failed to create local blob store"),
    );

    let catalog = Arc::new(InMemoryCatalog::default());
    let tags = Arc::new(InMemoryTagIndex::default());

    let state = Arc::new(AppState::new(
        catalog.clone(),
        tags.clone(),
        blobs.clone(),
        test_config(),
    ));

    let app = routes::build_router(state);
    let server =
        TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        catalog,
        tags,
        blobs,
        _temp_dir: temp_dir,
    }
}

pub fn video_part(data: &[u8], filename: &str, mime: &str) -> Part {
    Part::bytes(bytes::Bytes::from(data.to_vec()))
        .file_name(filename)
        .mime_type(mime)
}

/// Minimal valid upload form: title plus an mp4 video part.
pub fn video_form(title: &str, data: &[u8]) -> MultipartForm {
    MultipartForm::new()
        .add_text("title", title)
        .add_part("videoFile", video_part(data, "clip.mp4", "video/mp4"))
}

/// POST the form as `user` and return the raw response.
pub async fn post_video(app: &TestApp, user: &TestUser, form: MultipartForm) -> TestResponse {
    app.server
        .post(&api_path("/videos"))
        .add_header("X-Caller-Id", user.id.to_string())
        .add_header("X-Caller-Role", user.role)
        .multipart(form)
        .await
}

/// Upload a video and return its id, asserting success.
pub async fn upload_video(app: &TestApp, user: &TestUser, title: &str, data: &[u8]) -> Uuid {
    let response = post_video(app, user, video_form(title, data)).await;
    assert_eq!(response.status_code(), 201, "upload failed: {}", response.text());

    let body: serde_json::Value = response.json();
    Uuid::parse_str(body.get("id").and_then(|v| v.as_str()).expect("id in response"))
        .expect("valid UUID in response")
}

/// Fetch a header as a string, panicking with context if absent.
pub fn header_str(response: &TestResponse, name: &str) -> String {
    response
        .headers()
        .get(name)
        .unwrap_or_else(|| panic!("missing header {}", name))
        .to_str()
        .expect("header is valid UTF-8")
        .to_string()
}
