use std::path::PathBuf;

use axum_test::TestServer;
use knot::build_router;
use knot::config::Config;
use knot::state::AppState;

/// Test configuration: a private in-memory SQLite database
pub fn test_config() -> Config {
    Config::in_memory()
}

/// A SQLite file in the temp directory, removed on drop
pub struct TempDatabase {
    path: PathBuf,
}

impl TempDatabase {
    pub fn new() -> Self {
        let path = std::env::temp_dir().join(format!("knot-test-{}.db", uuid::Uuid::new_v4()));
        Self { path }
    }

    /// Configuration with a pool of several connections to this file
    pub fn config(&self) -> Config {
        Config {
            database_url: format!("sqlite://{}?mode=rwc", self.path.display()),
            db_max_connections: 8,
            ..Config::in_memory()
        }
    }
}

impl Drop for TempDatabase {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm", "-journal"] {
            let mut file = self.path.clone().into_os_string();
            file.push(suffix);
            let _ = std::fs::remove_file(file);
        }
    }
}

/// Test application wrapper
pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
}

impl TestApp {
    /// Create a new test application with an empty catalog
    pub async fn new() -> Self {
        Self::with_config(test_config()).await
    }

    /// Create a test application on the given database
    pub async fn with_config(config: Config) -> Self {
        let state = AppState::new(config)
            .await
            .expect("Failed to create test app state");

        let router = build_router(state.clone());
        let server = TestServer::new(router).expect("Failed to create test server");

        Self { server, state }
    }
}
