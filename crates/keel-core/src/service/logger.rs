//! Async logging facade
//!
//! Leveled methods build a record (enriched with the ambient correlation id and,
//! for `exception`, the captured error) and hand it synchronously to every sink.
//! They return futures so callers on a cooperative scheduler can `.await` them,
//! but no queueing happens: the sinks are written before the future completes.
//!
//! The methods capture the caller's source location, so they are plain functions
//! returning a future instead of `async fn`.

use std::future::Future;
use std::panic::Location;

use tracing::warn;

use crate::correlation;
use crate::domain::{ExceptionDetail, Fields, LogLevel, LogRecord};
use crate::service::sink::{Sink, SinkKind};

/// A named logger with a level threshold and ordered sinks
pub struct Logger {
    name: String,
    level: LogLevel,
    sinks: Vec<Box<dyn Sink>>,
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("level", &self.level)
            .field("sinks", &self.sink_kinds())
            .finish()
    }
}

impl Logger {
    pub fn new(name: impl Into<String>, level: LogLevel, sinks: Vec<Box<dyn Sink>>) -> Self {
        Self {
            name: name.into(),
            level,
            sinks,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    /// Whether a record at `level` passes the threshold
    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.level
    }

    /// Kinds of the attached sinks, in write order
    pub fn sink_kinds(&self) -> Vec<SinkKind> {
        self.sinks.iter().map(|s| s.kind()).collect()
    }

    #[track_caller]
    pub fn debug(&self, message: &str, fields: Fields) -> impl Future<Output = ()> + '_ {
        self.log_at(Location::caller(), LogLevel::Debug, message, fields, None)
    }

    #[track_caller]
    pub fn info(&self, message: &str, fields: Fields) -> impl Future<Output = ()> + '_ {
        self.log_at(Location::caller(), LogLevel::Info, message, fields, None)
    }

    #[track_caller]
    pub fn warning(&self, message: &str, fields: Fields) -> impl Future<Output = ()> + '_ {
        self.log_at(Location::caller(), LogLevel::Warning, message, fields, None)
    }

    #[track_caller]
    pub fn error(&self, message: &str, fields: Fields) -> impl Future<Output = ()> + '_ {
        self.log_at(Location::caller(), LogLevel::Error, message, fields, None)
    }

    #[track_caller]
    pub fn critical(&self, message: &str, fields: Fields) -> impl Future<Output = ()> + '_ {
        self.log_at(Location::caller(), LogLevel::Critical, message, fields, None)
    }

    /// Log at ERROR with the error's type, message and traceback attached
    #[track_caller]
    pub fn exception<E>(&self, message: &str, error: &E, fields: Fields) -> impl Future<Output = ()> + '_
    where
        E: std::error::Error + ?Sized,
    {
        let detail = self
            .enabled(LogLevel::Error)
            .then(|| ExceptionDetail::from_error(error));
        self.log_at(Location::caller(), LogLevel::Error, message, fields, detail)
    }

    /// Log at ERROR with an already captured exception (e.g. a caught panic)
    #[track_caller]
    pub fn exception_detail(
        &self,
        message: &str,
        detail: ExceptionDetail,
        fields: Fields,
    ) -> impl Future<Output = ()> + '_ {
        self.log_at(Location::caller(), LogLevel::Error, message, fields, Some(detail))
    }

    /// Log at an arbitrary level
    #[track_caller]
    pub fn log(&self, level: LogLevel, message: &str, fields: Fields) -> impl Future<Output = ()> + '_ {
        self.log_at(Location::caller(), level, message, fields, None)
    }

    fn log_at(
        &self,
        location: &'static Location<'static>,
        level: LogLevel,
        message: &str,
        fields: Fields,
        exception: Option<ExceptionDetail>,
    ) -> impl Future<Output = ()> + '_ {
        let message = message.to_string();
        async move {
            if !self.enabled(level) {
                return;
            }

            let mut fields = fields;
            if let Some(request_id) = correlation::get() {
                fields.insert("request_id", request_id);
            }

            let record = LogRecord::new(level, self.name.clone(), message)
                .with_location(location)
                .with_fields(fields)
                .with_exception(exception);

            self.emit(&record);
        }
    }

    /// Write a finished record to every sink
    pub fn emit(&self, record: &LogRecord) {
        for sink in &self.sinks {
            if let Err(e) = sink.write(record) {
                warn!(
                    logger = %self.name,
                    sink = ?sink.kind(),
                    "Failed to write log record: {}",
                    e
                );
            }
        }
    }
}
