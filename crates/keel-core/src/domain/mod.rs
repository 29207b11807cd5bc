//! Domain types for structured logging
//!
//! - `LogLevel` - severity with threshold ordering
//! - `LogRecord` - one log event, built per call and discarded after formatting
//! - `Fields` - structured key/values attached to a call
//! - `ExceptionDetail` - error type, message and traceback

mod log_record;

pub use log_record::*;
