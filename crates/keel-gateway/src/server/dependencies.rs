//! Dependency Injection Container
//!
//! The application root owns the logger registry and the database manager and
//! hands them to the gateway here.

use std::sync::Arc;

use keel_core::{Logger, LoggerRegistry, SERVICE_LOGGER};
use keel_storage::DatabaseManager;

/// Dependency container for Gateway
#[derive(Clone)]
pub struct GatewayDependencies {
    pub registry: Arc<LoggerRegistry>,
    pub database: Arc<DatabaseManager>,
    /// Logger handed to route handlers
    pub service_logger: Arc<Logger>,
}

/// Builder for GatewayDependencies
#[derive(Default)]
pub struct DependenciesBuilder {
    registry: Option<Arc<LoggerRegistry>>,
    database: Option<Arc<DatabaseManager>>,
    service_logger: Option<Arc<Logger>>,
}

impl DependenciesBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_registry(mut self, registry: Arc<LoggerRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn with_database(mut self, database: Arc<DatabaseManager>) -> Self {
        self.database = Some(database);
        self
    }

    pub fn with_service_logger(mut self, logger: Arc<Logger>) -> Self {
        self.service_logger = Some(logger);
        self
    }

    /// Build the container. The service logger defaults to the registry's
    /// `service` logger.
    pub fn build(self) -> anyhow::Result<GatewayDependencies> {
        let registry = self
            .registry
            .ok_or_else(|| anyhow::anyhow!("registry is required"))?;
        let database = self
            .database
            .ok_or_else(|| anyhow::anyhow!("database is required"))?;

        let service_logger = match self.service_logger {
            Some(logger) => logger,
            None => registry.get_logger(SERVICE_LOGGER)?,
        };

        Ok(GatewayDependencies {
            registry,
            database,
            service_logger,
        })
    }
}
