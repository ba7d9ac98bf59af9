// SPDX-License-Identifier: GPL-3.0-only
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

use crate::api::http::router;
use crate::api::ApiHandlers;
use crate::config::Config;
use crate::registry::InMemoryRegistry;
use crate::storage::CacheDirStore;

pub const REGISTER_FORM_BODY: &str = "<html><body>register form</body></html>";

/// Cache and static directories that live as long as the test holds this
pub struct TestDirs {
    root: TempDir,
}

impl TestDirs {
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp directory");
        let dirs = Self { root };
        std::fs::create_dir_all(dirs.static_dir()).expect("Failed to create static directory");
        std::fs::write(dirs.static_dir().join("RegisterForm.html"), REGISTER_FORM_BODY)
            .expect("Failed to write static page");
        dirs
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.root.path().join("cache")
    }

    pub fn static_dir(&self) -> PathBuf {
        self.root.path().join("static")
    }
}

/// Create a test configuration with temporary paths
pub fn create_test_config(dirs: &TestDirs) -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0, // Use port 0 to auto-assign
        cache_dir: dirs.cache_dir(),
        static_dir: dirs.static_dir(),
        max_upload_bytes: 1024 * 1024,
        log_level: "error".to_string(), // Reduce log noise in tests
        ..Config::default()
    }
}

/// Handlers over an empty registry and a fresh cache directory
pub async fn setup_test_handlers() -> (Arc<ApiHandlers>, TestDirs) {
    let dirs = TestDirs::new();
    let config = create_test_config(&dirs);
    let photos = CacheDirStore::new(&config.cache_dir)
        .await
        .expect("Failed to create photo store");

    let handlers = ApiHandlers::new(
        Arc::new(InMemoryRegistry::new()),
        Arc::new(photos),
        config.static_dir.clone(),
    );
    (Arc::new(handlers), dirs)
}

/// Start the full router on an ephemeral port and return its base URL
pub async fn spawn_test_server() -> (String, TestDirs) {
    let (handlers, dirs) = setup_test_handlers().await;
    let config = create_test_config(&dirs);
    let app = router(handlers, config.max_upload_bytes);

    let listener = tokio::net::TcpListener::bind(config.bind_addr())
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Listener has no local address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Test server failed");
    });

    (format!("http://{addr}"), dirs)
}
