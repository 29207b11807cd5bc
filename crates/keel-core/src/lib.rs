//! # Keel Core Library
//!
//! Settings and the structured logging subsystem shared by every Keel crate.
//!
//! ## Modules
//!
//! - `settings` - Environment-driven, immutable process configuration
//! - `correlation` - Request-scoped correlation id (task-local)
//! - `domain` - Log levels, records, structured fields, exception details
//! - `service` - Formatters, sinks, the async logger facade and the named registry
//! - `error` - Error types for settings and logging

pub mod correlation;
pub mod domain;
pub mod error;
pub mod service;
pub mod settings;

// Re-export commonly used types
pub use domain::*;
pub use error::{LoggingError, SettingsError};
pub use service::*;
pub use settings::{load_settings, ServerSettings, Settings};
