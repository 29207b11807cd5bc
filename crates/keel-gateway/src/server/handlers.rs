//! HTTP handlers for the gateway server

use std::sync::Arc;

use axum::{extract::State, response::Json};
use keel_core::{Fields, Logger};
use keel_storage::DatabaseManager;
use serde::Serialize;

/// App State shared by all routes
#[derive(Clone)]
pub struct AppState {
    pub database: Arc<DatabaseManager>,
    pub service_logger: Arc<Logger>,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: bool,
}

/// Health check endpoint
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = state.database.status().await;
    state
        .service_logger
        .debug("Health check", Fields::new().with("database", database))
        .await;

    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database,
    })
}
