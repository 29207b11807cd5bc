//! Logging services
//!
//! Formatting, sinks, the async logger facade and the named logger registry.

pub mod formatter;
mod logger;
mod logger_registry;
pub mod sink;

pub use formatter::{Formatter, JsonFormatter, Template, TextFormatter, DEFAULT_CONSOLE_FORMAT};
pub use logger::Logger;
pub use logger_registry::{LoggerRegistry, LoggingOptions, REQUEST_LOGGER, SERVICE_LOGGER};
pub use sink::{ConsoleSink, RotatingFileSink, Sink, SinkKind};
