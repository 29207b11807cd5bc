//! Keel Gateway
//!
//! HTTP application shell that provides:
//! - Allow-all CORS with credentials
//! - Per-request correlation ids (`X-Request-ID`)
//! - Structured request/response logging via the `request_logger`
//! - Database lifecycle hooks on startup and shutdown
//! - Dependency Injection for the registry and database manager

pub mod logging;
pub mod server;

pub use logging::{TraceContext, UNKNOWN_IP};
pub use server::{
    cors_layer, AppState, DependenciesBuilder, GatewayConfig, GatewayDependencies, GatewayServer,
    HealthResponse,
};
