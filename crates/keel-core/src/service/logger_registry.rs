//! Named logger registry - one configured logger per name

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::info;

use crate::domain::LogLevel;
use crate::error::LoggingError;
use crate::service::formatter::{JsonFormatter, TextFormatter, DEFAULT_CONSOLE_FORMAT};
use crate::service::logger::Logger;
use crate::service::sink::{
    ConsoleSink, RotatingFileSink, Sink, DEFAULT_BACKUP_COUNT, DEFAULT_MAX_BYTES,
};
use crate::settings::{Settings, DEFAULT_LOGGING_FORMAT};

/// Logger used by the request logging middleware
pub const REQUEST_LOGGER: &str = "request_logger";

/// Default application logger
pub const SERVICE_LOGGER: &str = "service";

/// Configuration applied to every logger the registry creates
#[derive(Debug, Clone)]
pub struct LoggingOptions {
    /// Minimum level for every logger
    pub level: LogLevel,
    /// JSON key template for file sinks
    pub format: String,
    /// Text template for console sinks
    pub console_format: String,
    /// Base directory for log files
    pub logs_dir: PathBuf,
    /// Maximum file size before rotation (bytes)
    pub max_bytes: u64,
    /// Maximum number of rotated files to keep
    pub backup_count: usize,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: DEFAULT_LOGGING_FORMAT.to_string(),
            console_format: DEFAULT_CONSOLE_FORMAT.to_string(),
            logs_dir: PathBuf::from("logs"),
            max_bytes: DEFAULT_MAX_BYTES,
            backup_count: DEFAULT_BACKUP_COUNT,
        }
    }
}

impl LoggingOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            level: settings.logging_level,
            format: settings.logging_format.clone(),
            logs_dir: settings.logs_dir.clone(),
            ..Self::default()
        }
    }
}

/// Process-wide cache of named loggers.
///
/// Owned by the application root and handed out by `Arc`. The first
/// `get_logger` for a name attaches a rotating file sink and a console sink;
/// later calls return the same instance.
pub struct LoggerRegistry {
    options: LoggingOptions,
    loggers: RwLock<HashMap<String, Arc<Logger>>>,
}

impl LoggerRegistry {
    pub fn new(options: LoggingOptions) -> Self {
        Self {
            options,
            loggers: RwLock::new(HashMap::new()),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(LoggingOptions::from_settings(settings))
    }

    pub fn options(&self) -> &LoggingOptions {
        &self.options
    }

    /// File stem for a logger name. Percent-encoding keeps distinct names on
    /// distinct files (`jobs:a`, `jobs/a` and `jobs_a` never share one).
    fn file_stem(name: &str) -> String {
        urlencoding::encode(name).into_owned()
    }

    /// Log file path for a logger name
    pub fn log_path(&self, name: &str) -> PathBuf {
        if name == REQUEST_LOGGER {
            self.options
                .logs_dir
                .join("request_logs")
                .join("request.log")
        } else {
            self.options
                .logs_dir
                .join("service_logs")
                .join(format!("{}.log", Self::file_stem(name)))
        }
    }

    /// Get or create the logger for `name`
    pub fn get_logger(&self, name: &str) -> Result<Arc<Logger>, LoggingError> {
        // Fast path: logger exists
        {
            let loggers = self.loggers.read();
            if let Some(logger) = loggers.get(name) {
                return Ok(logger.clone());
            }
        }

        // Slow path: create new logger
        let mut loggers = self.loggers.write();

        // Double-check (another thread might have created it)
        if let Some(logger) = loggers.get(name) {
            return Ok(logger.clone());
        }

        let logger = Arc::new(self.build_logger(name)?);
        loggers.insert(name.to_string(), logger.clone());
        Ok(logger)
    }

    fn build_logger(&self, name: &str) -> Result<Logger, LoggingError> {
        let path = self.log_path(name);
        let file_sink = RotatingFileSink::open(
            &path,
            self.options.max_bytes,
            self.options.backup_count,
            Box::new(JsonFormatter::new(&self.options.format)),
        )
        .map_err(|source| LoggingError::Open {
            path: path.clone(),
            source,
        })?;
        let console_sink = ConsoleSink::stderr(Box::new(TextFormatter::new(
            &self.options.console_format,
        )));

        info!("Created logger {} -> {:?}", name, path);

        let sinks: Vec<Box<dyn Sink>> = vec![Box::new(file_sink), Box::new(console_sink)];
        Ok(Logger::new(name, self.options.level, sinks))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.loggers.read().contains_key(name)
    }

    /// Number of loggers created so far
    pub fn len(&self) -> usize {
        self.loggers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.loggers.read().is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.loggers.read().keys().cloned().collect();
        names.sort();
        names
    }
}
