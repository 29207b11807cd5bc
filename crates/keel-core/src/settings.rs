//! Environment-driven settings
//!
//! Loaded once at process start, read-only afterwards. Every variable is optional
//! and falls back to a default. Loading creates the logs/data/temp/test directories.

use std::path::{Path, PathBuf};

use crate::domain::LogLevel;
use crate::error::SettingsError;

pub const DEFAULT_DATABASE_URI: &str = "mongodb://localhost:27017/";
pub const DEFAULT_DATABASE: &str = "default_db";
pub const DEFAULT_LOGGING_LEVEL: &str = "INFO";
pub const DEFAULT_LOGGING_FORMAT: &str = "%(asctime)s - %(name)s - %(levelname)s - %(message)s";
pub const DEFAULT_SERVER_HOST: &str = "127.0.0.1";
pub const DEFAULT_SERVER_PORT: u16 = 8000;

/// Overrides the working directory as the project root
pub const PROJECT_ROOT_VAR: &str = "KEEL_PROJECT_ROOT";

/// HTTP bind settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: DEFAULT_SERVER_HOST.to_string(),
            port: DEFAULT_SERVER_PORT,
        }
    }
}

/// Immutable process configuration
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_uri: String,
    pub database: String,
    pub logging_level: LogLevel,
    pub logging_format: String,
    pub project_root: PathBuf,
    pub logs_dir: PathBuf,
    pub data_dir: PathBuf,
    pub temp_dir: PathBuf,
    pub test_dir: PathBuf,
    pub server: ServerSettings,
}

/// Load settings from `.env` and the process environment.
///
/// Call once at startup; any error is a fatal startup error.
pub fn load_settings() -> Result<Settings, SettingsError> {
    Settings::load()
}

impl Settings {
    /// Load from the process environment (after reading `.env` if present)
    pub fn load() -> Result<Self, SettingsError> {
        dotenvy::dotenv().ok();

        let root = match non_empty(std::env::var(PROJECT_ROOT_VAR).ok()) {
            Some(root) => PathBuf::from(root),
            None => std::env::current_dir().map_err(SettingsError::CurrentDir)?,
        };

        Self::from_lookup(root, |key| std::env::var(key).ok())
    }

    /// Load with an explicit project root and variable lookup.
    ///
    /// `lookup` returns the raw value for a variable name; empty values count as unset.
    pub fn from_lookup<F>(project_root: impl Into<PathBuf>, lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let project_root = project_root.into();
        let var = |key: &str, default: &str| -> String {
            non_empty(lookup(key)).unwrap_or_else(|| default.to_string())
        };

        let level_name = var("LOGGING_LEVEL", DEFAULT_LOGGING_LEVEL);
        let logging_level =
            LogLevel::parse(&level_name).ok_or_else(|| SettingsError::InvalidLevel(level_name))?;

        let port = match non_empty(lookup("SERVER_PORT")) {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| SettingsError::InvalidPort(raw))?,
            None => DEFAULT_SERVER_PORT,
        };

        let settings = Self {
            database_uri: var("DATABASE_URI", DEFAULT_DATABASE_URI),
            database: var("DATABASE", DEFAULT_DATABASE),
            logging_level,
            logging_format: var("LOGGING_FORMAT", DEFAULT_LOGGING_FORMAT),
            logs_dir: project_root.join(var("LOGS_PATH", "logs")),
            data_dir: project_root.join(var("DATA_PATH", "data")),
            temp_dir: project_root.join(var("TEMP_PATH", "temp")),
            test_dir: project_root.join(var("TEST_PATH", "test")),
            server: ServerSettings {
                host: var("SERVER_HOST", DEFAULT_SERVER_HOST),
                port,
            },
            project_root,
        };

        settings.ensure_directories()?;
        Ok(settings)
    }

    /// Create the logs/data/temp/test directories (idempotent)
    pub fn ensure_directories(&self) -> Result<(), SettingsError> {
        for dir in self.directories() {
            create_dir(dir)?;
        }
        Ok(())
    }

    /// The directories managed by these settings
    pub fn directories(&self) -> [&Path; 4] {
        [
            self.logs_dir.as_path(),
            self.data_dir.as_path(),
            self.temp_dir.as_path(),
            self.test_dir.as_path(),
        ]
    }
}

fn create_dir(path: &Path) -> Result<(), SettingsError> {
    std::fs::create_dir_all(path).map_err(|source| SettingsError::Directory {
        path: path.to_path_buf(),
        source,
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
