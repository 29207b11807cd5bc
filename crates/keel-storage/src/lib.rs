//! Keel Storage Layer
//!
//! Lifecycle of the shared MongoDB client handle. Pooling and per-request
//! connection checkout are handled by the driver.
//!
//! # Usage
//!
//! ```rust,ignore
//! use keel_storage::DatabaseManager;
//! use std::sync::Arc;
//!
//! let database = Arc::new(DatabaseManager::from_settings(&settings));
//!
//! // Startup hook
//! database.init().await?;
//! assert!(database.status().await);
//!
//! // Shutdown hook
//! database.close().await;
//! ```

mod database;
mod error;

pub use database::DatabaseManager;
pub use error::StorageError;
