//! Database lifecycle manager for the shared MongoDB client.
//!
//! The driver maintains its own connection pool; this type only owns the single
//! client handle. It is created by the startup hook and released by the
//! shutdown hook. Absence of a handle is a valid, queryable state.

use keel_core::Settings;
use mongodb::{Client, Database};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::StorageError;

/// Owner of the process-wide MongoDB client handle.
pub struct DatabaseManager {
    uri: String,
    database_name: String,
    client: RwLock<Option<Client>>,
}

impl DatabaseManager {
    pub fn new(uri: impl Into<String>, database_name: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            database_name: database_name.into(),
            client: RwLock::new(None),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.database_uri.clone(), settings.database.clone())
    }

    pub fn database_name(&self) -> &str {
        &self.database_name
    }

    /// Create the client if absent.
    ///
    /// Returns the new client, or `None` if a handle already existed.
    pub async fn init(&self) -> Result<Option<Client>, StorageError> {
        let mut guard = self.client.write().await;
        if guard.is_some() {
            debug!("Database client already initialized");
            return Ok(None);
        }

        let client = Client::with_uri_str(&self.uri).await?;
        info!("Database client initialized (database: {})", self.database_name);
        *guard = Some(client.clone());
        Ok(Some(client))
    }

    /// Release the client if present. Idempotent.
    pub async fn close(&self) {
        let client = self.client.write().await.take();
        if let Some(client) = client {
            client.shutdown().await;
            info!("Database client closed");
        }
    }

    /// Whether a client handle currently exists
    pub async fn status(&self) -> bool {
        self.client.read().await.is_some()
    }

    /// The current client handle
    pub async fn client(&self) -> Option<Client> {
        self.client.read().await.clone()
    }

    /// The configured database on the current client
    pub async fn database(&self) -> Option<Database> {
        self.client
            .read()
            .await
            .as_ref()
            .map(|client| client.database(&self.database_name))
    }
}
