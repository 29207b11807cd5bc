//! Storage error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("database client error: {0}")]
    Client(#[from] mongodb::error::Error),
}
