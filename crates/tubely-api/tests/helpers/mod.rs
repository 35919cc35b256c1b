//! Test helpers: build AppState and router for integration tests.
//!
//! The router is the production one from `setup::routes`; only the collaborators
//! differ. Local assets and staging live in temp dirs, the bucket is an
//! in-memory object store, and the repository and probe are in-memory fakes.

#![allow(dead_code)]

pub mod auth;
pub mod fixtures;

use axum_test::TestServer;
use fixtures::{FixedProbe, InMemoryVideoRepository};
use object_store::memory::InMemory;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use tubely_api::setup::routes;
use tubely_api::AppState;
use tubely_core::Config;
use tubely_processing::{IngestionPipeline, MediaProbe};
use tubely_storage::{AssetStores, LocalStorage, S3Config, S3Storage};

pub const TEST_BUCKET: &str = "tubely-test-videos";
pub const TEST_REGION: &str = "us-east-2";
pub const TEST_BASE_URL: &str = "http://localhost:8091";

/// Test application: server plus handles on everything it writes to.
pub struct TestApp {
    pub server: TestServer,
    pub repository: Arc<InMemoryVideoRepository>,
    pub bucket: Arc<InMemory>,
    pub config: Config,
    _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn assets_root(&self) -> &Path {
        &self.config.assets_root
    }

    pub fn staging_dir(&self) -> &Path {
        &self.config.staging_dir
    }

    /// Entries currently in the staging directory.
    pub fn staged_files(&self) -> Vec<PathBuf> {
        match std::fs::read_dir(self.staging_dir()) {
            Ok(entries) => entries.map(|e| e.unwrap().path()).collect(),
            Err(_) => Vec::new(),
        }
    }
}

pub fn create_test_config(temp_dir: &Path) -> Config {
    Config {
        server_port: 8091,
        environment: "test".to_string(),
        cors_origins: vec!["*".to_string()],
        jwt_secret: auth::TEST_JWT_SECRET.to_string(),
        database_url: "postgres://unused".to_string(),
        db_max_connections: 1,
        assets_root: temp_dir.join("assets"),
        public_base_url: TEST_BASE_URL.to_string(),
        s3_bucket: TEST_BUCKET.to_string(),
        s3_region: TEST_REGION.to_string(),
        s3_endpoint: None,
        staging_dir: temp_dir.join("staging"),
        ffprobe_path: "ffprobe".to_string(),
        max_thumbnail_size_bytes: 10 * 1024 * 1024,
        max_video_size_bytes: 64 * 1024 * 1024,
    }
}

/// Setup a test app whose probe reports `width`x`height` for every video.
pub async fn setup_test_app_with(
    width: u32,
    height: u32,
    configure: impl FnOnce(&mut Config),
) -> TestApp {
    setup_test_app_with_probe(Arc::new(FixedProbe { width, height }), configure).await
}

/// Setup a test app around an arbitrary probe.
pub async fn setup_test_app_with_probe(
    probe: Arc<dyn MediaProbe>,
    configure: impl FnOnce(&mut Config),
) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let mut config = create_test_config(temp_dir.path());
    configure(&mut config);
    config.validate().expect("Test config should be valid");

    let bucket = Arc::new(InMemory::new());
    let stores = AssetStores::new(
        Arc::new(LocalStorage::new(
            config.assets_root.clone(),
            config.assets_base_url(),
        )),
        Arc::new(S3Storage::with_store(
            bucket.clone(),
            S3Config {
                bucket: config.s3_bucket.clone(),
                region: config.s3_region.clone(),
                endpoint: config.s3_endpoint.clone(),
            },
        )),
    );

    let repository = Arc::new(InMemoryVideoRepository::default());
    let pipeline = IngestionPipeline::new(
        stores,
        probe,
        repository.clone(),
        config.staging_dir.clone(),
    );
    let state = Arc::new(AppState::new(config.clone(), pipeline));

    let router = routes::setup_routes(&config, state).expect("Failed to build routes");
    let server = TestServer::new(router).expect("Failed to start test server");

    TestApp {
        server,
        repository,
        bucket,
        config,
        _temp_dir: temp_dir,
    }
}

/// Setup a test app with a landscape probe and default limits.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(1920, 1080, |_| {}).await
}
