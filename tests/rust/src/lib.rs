//! Shared test utilities and fixtures for Keel integration tests.

use std::path::Path;
use std::sync::Arc;

use keel_core::{LogLevel, LoggerRegistry, LoggingOptions};
use keel_gateway::{DependenciesBuilder, GatewayConfig, GatewayServer};
use keel_storage::DatabaseManager;
use tempfile::TempDir;

/// URI that parses without a reachable server (the driver connects lazily)
pub const TEST_DATABASE_URI: &str = "mongodb://localhost:27017/";

/// A logger registry rooted in a temporary directory
pub struct TestLogs {
    pub dir: TempDir,
    pub registry: Arc<LoggerRegistry>,
}

impl TestLogs {
    pub fn new(level: LogLevel) -> Self {
        Self::with_options(|options| options.level = level)
    }

    /// Start from defaults rooted in the temp dir, then apply `configure`
    pub fn with_options(configure: impl FnOnce(&mut LoggingOptions)) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let mut options = LoggingOptions {
            logs_dir: dir.path().to_path_buf(),
            ..LoggingOptions::default()
        };
        configure(&mut options);

        Self {
            dir,
            registry: Arc::new(LoggerRegistry::new(options)),
        }
    }

    /// All JSON records written so far by the named logger's file sink
    pub fn records(&self, name: &str) -> Vec<serde_json::Value> {
        read_json_lines(&self.registry.log_path(name))
    }
}

/// Parse a JSON-lines file; a missing file yields no records
pub fn read_json_lines(path: &Path) -> Vec<serde_json::Value> {
    match std::fs::read_to_string(path) {
        Ok(contents) => contents
            .lines()
            .map(|line| serde_json::from_str(line).expect("log line is not JSON"))
            .collect(),
        Err(_) => Vec::new(),
    }
}

pub fn test_database() -> Arc<DatabaseManager> {
    Arc::new(DatabaseManager::new(
        TEST_DATABASE_URI,
        format!("keel_test_{}", uuid::Uuid::new_v4().simple()),
    ))
}

/// Gateway wired to a temp registry and an uninitialized database manager
pub fn test_server(logs: &TestLogs, config: GatewayConfig) -> GatewayServer {
    let dependencies = DependenciesBuilder::new()
        .with_registry(logs.registry.clone())
        .with_database(test_database())
        .build()
        .expect("Failed to build dependencies");
    GatewayServer::new(config, dependencies)
}
