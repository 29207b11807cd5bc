//! Log record types

use std::any::Any;
use std::backtrace::{Backtrace, BacktraceStatus};
use std::fmt;
use std::panic::Location;
use std::path::Path;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Log level
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Critical => "CRITICAL",
        }
    }

    /// Numeric severity (10 = DEBUG ... 50 = CRITICAL)
    pub fn as_number(&self) -> u8 {
        match self {
            Self::Debug => 10,
            Self::Info => 20,
            Self::Warning => 30,
            Self::Error => 40,
            Self::Critical => 50,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "DEBUG" => Some(Self::Debug),
            "INFO" => Some(Self::Info),
            "WARNING" | "WARN" => Some(Self::Warning),
            "ERROR" => Some(Self::Error),
            "CRITICAL" | "FATAL" => Some(Self::Critical),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured key/values attached to a log call (insertion ordered)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields(Map<String, Value>);

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field, builder style
    pub fn with<T>(mut self, key: impl Into<String>, value: T) -> Self
    where
        T: Serialize + fmt::Debug,
    {
        self.insert(key, value);
        self
    }

    /// Insert a field. Values that fail to serialize are stored as their Debug string.
    pub fn insert<T>(&mut self, key: impl Into<String>, value: T)
    where
        T: Serialize + fmt::Debug,
    {
        let value = serde_json::to_value(&value).unwrap_or_else(|_| Value::String(format!("{value:?}")));
        self.0.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl From<Map<String, Value>> for Fields {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Captured error detail, rendered as separate record fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExceptionDetail {
    pub exception_type: String,
    pub message: String,
    pub traceback: String,
}

impl ExceptionDetail {
    /// Capture an error: its type, display message, source chain and (when
    /// `RUST_BACKTRACE` enables it) the current backtrace
    pub fn from_error<E>(error: &E) -> Self
    where
        E: std::error::Error + ?Sized,
    {
        let exception_type = exception_type_name(error);
        let message = error.to_string();

        let mut traceback = String::new();
        let backtrace = Backtrace::capture();
        if backtrace.status() == BacktraceStatus::Captured {
            traceback.push_str("Stack backtrace:\n");
            traceback.push_str(&backtrace.to_string());
            traceback.push('\n');
        }
        traceback.push_str(&format!("{exception_type}: {message}"));

        let mut source = error.source();
        while let Some(cause) = source {
            traceback.push_str(&format!("\nCaused by: {cause}"));
            source = cause.source();
        }

        Self {
            exception_type,
            message,
            traceback,
        }
    }

    /// Capture a panic payload caught with `catch_unwind`
    pub fn from_panic(payload: &(dyn Any + Send)) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "Box<dyn Any>".to_string()
        };

        Self {
            exception_type: "panic".to_string(),
            traceback: format!("panic: {message}"),
            message,
        }
    }
}

/// Type name for an error. Trait objects (`Box<dyn Error>`, `anyhow::Error::as_ref()`)
/// only know their static type, so the concrete name is read from the leading
/// identifier of the `Debug` output instead.
fn exception_type_name<E>(error: &E) -> String
where
    E: std::error::Error + ?Sized,
{
    let static_name = std::any::type_name::<E>();
    if !static_name.starts_with("dyn ") {
        return static_name.to_string();
    }

    let debug = format!("{error:?}");
    let leading: String = debug
        .chars()
        .take_while(|c| c.is_alphanumeric() || *c == '_' || *c == ':')
        .collect();
    if leading.is_empty() {
        static_name.to_string()
    } else {
        leading
    }
}

/// One log event
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub timestamp: DateTime<Local>,
    pub level: LogLevel,
    pub logger_name: String,
    /// File stem of the calling source file
    pub module: String,
    pub file: String,
    pub line: u32,
    pub message: String,
    /// Structured fields, including `request_id` when one is ambient
    pub fields: Fields,
    pub exception: Option<ExceptionDetail>,
    pub process: u32,
    pub thread: Option<String>,
}

impl LogRecord {
    /// Create a new record stamped with the current time, process and thread
    pub fn new(level: LogLevel, logger_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now(),
            level,
            logger_name: logger_name.into(),
            module: String::new(),
            file: String::new(),
            line: 0,
            message: message.into(),
            fields: Fields::new(),
            exception: None,
            process: std::process::id(),
            thread: std::thread::current().name().map(String::from),
        }
    }

    /// Record the calling source location
    pub fn with_location(mut self, location: &Location<'_>) -> Self {
        self.file = location.file().to_string();
        self.line = location.line();
        self.module = Path::new(location.file())
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        self
    }

    pub fn with_fields(mut self, fields: Fields) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_exception(mut self, exception: Option<ExceptionDetail>) -> Self {
        self.exception = exception;
        self
    }
}
