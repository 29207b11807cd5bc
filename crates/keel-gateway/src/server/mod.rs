//! Gateway Server
//!
//! HTTP server with CORS and request logging. All external dependencies
//! (logger registry, database manager) are injected.

mod dependencies;
mod handlers;
pub mod logging_middleware;

pub use dependencies::{DependenciesBuilder, GatewayDependencies};
pub use handlers::{AppState, HealthResponse};

use std::future::Future;
use std::net::SocketAddr;

use axum::{middleware, routing::get, Router};
use keel_core::ServerSettings;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tracing::{info, warn};

/// Gateway server configuration
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Enable CORS for browser access
    pub enable_cors: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self::from_settings(&ServerSettings::default())
    }
}

impl GatewayConfig {
    pub fn from_settings(server: &ServerSettings) -> Self {
        Self {
            host: server.host.clone(),
            port: server.port,
            enable_cors: true,
        }
    }

    /// Get the base URL for this gateway
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

/// Allow-all CORS with credentials.
///
/// A literal `*` may not be combined with credentials, so origin, methods and
/// headers are mirrored from the request instead.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

/// HTTP Gateway Server
pub struct GatewayServer {
    config: GatewayConfig,
    dependencies: GatewayDependencies,
}

impl GatewayServer {
    pub fn new(config: GatewayConfig, dependencies: GatewayDependencies) -> Self {
        Self {
            config,
            dependencies,
        }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn dependencies(&self) -> &GatewayDependencies {
        &self.dependencies
    }

    /// Build the Axum router
    pub fn router(&self) -> Router {
        let app_state = AppState {
            database: self.dependencies.database.clone(),
            service_logger: self.dependencies.service_logger.clone(),
        };

        let mut router = Router::new()
            .route("/health", get(handlers::health))
            .with_state(app_state);

        if self.config.enable_cors {
            router = router.layer(cors_layer());
        }

        // Outermost: every request (including CORS preflights) is logged
        router.layer(middleware::from_fn_with_state(
            self.dependencies.registry.clone(),
            logging_middleware::request_logging_middleware,
        ))
    }

    /// Run the gateway server until Ctrl-C
    ///
    /// Startup hook: database `init()`. Shutdown hook: database `close()`.
    pub async fn run(self) -> anyhow::Result<()> {
        let listener = TcpListener::bind((self.config.host.as_str(), self.config.port)).await?;
        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` resolves
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let database = self.dependencies.database.clone();
        database.init().await?;

        info!("[Gateway] Starting on {}", listener.local_addr()?);
        info!(
            "[Gateway] CORS: {}",
            if self.config.enable_cors {
                "enabled"
            } else {
                "disabled"
            }
        );

        let router = self.router();
        let result = axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown)
        .await;

        database.close().await;
        info!("[Gateway] Stopped");

        result?;
        Ok(())
    }

    /// Start the server in the background
    pub fn spawn(self) -> tokio::task::JoinHandle<anyhow::Result<()>> {
        tokio::spawn(async move { self.run().await })
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("[Gateway] Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("[Gateway] Shutdown signal received");
}
