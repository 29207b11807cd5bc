//! Keel server entry point

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use keel_core::{LogLevel, LoggerRegistry, Settings, REQUEST_LOGGER};
use keel_gateway::{DependenciesBuilder, GatewayConfig, GatewayServer};
use keel_storage::DatabaseManager;
use tracing::info;

/// Diagnostics file prefix: `keel.<date>.log`
const LOG_PREFIX: &str = "keel";

/// Crates whose diagnostics follow `LOGGING_LEVEL` when `RUST_LOG` is unset
const KEEL_TARGETS: [&str; 4] = ["keel", "keel_core", "keel_gateway", "keel_storage"];

#[tokio::main]
async fn main() {
    // Settings first: the diagnostics file lives in the configured logs directory
    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load settings: {}", e);
            std::process::exit(1);
        }
    };

    let _guard = match init_tracing(&settings.logs_dir, settings.logging_level) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize tracing: {:#}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(settings).await {
        tracing::error!("Keel exited with error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(settings: Settings) -> anyhow::Result<()> {
    info!(
        "Starting Keel v{} (root: {})",
        env!("CARGO_PKG_VERSION"),
        settings.project_root.display()
    );

    let registry = Arc::new(LoggerRegistry::from_settings(&settings));
    // Fail at startup rather than on the first request
    registry
        .get_logger(REQUEST_LOGGER)
        .context("Failed to open request log")?;

    let database = Arc::new(DatabaseManager::from_settings(&settings));

    let dependencies = DependenciesBuilder::new()
        .with_registry(registry)
        .with_database(database)
        .build()?;

    let config = GatewayConfig::from_settings(&settings.server);
    info!("Gateway listening at {}", config.base_url());

    GatewayServer::new(config, dependencies).run().await
}

fn tracing_level(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Debug => "debug",
        LogLevel::Info => "info",
        LogLevel::Warning => "warn",
        LogLevel::Error | LogLevel::Critical => "error",
    }
}

fn init_tracing(
    logs_dir: &Path,
    level: LogLevel,
) -> anyhow::Result<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    // File appender with daily rotation: keel.2026-01-22.log
    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_PREFIX)
        .filename_suffix("log")
        .build(logs_dir)
        .context("Failed to create log file appender")?;
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    // RUST_LOG takes precedence
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => {
            let mut filter = EnvFilter::new("info");
            for target in KEEL_TARGETS {
                let directive = format!("{}={}", target, tracing_level(level));
                filter = filter.add_directive(directive.parse()?);
            }
            filter
        }
    };

    // Console layer: colored, compact
    let console_layer = fmt::layer()
        .with_ansi(true)
        .compact()
        .with_thread_names(false)
        .with_line_number(false)
        .with_file(false)
        .with_target(true);

    // File layer: no colors, include more detail
    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .with_thread_ids(true)
        .with_line_number(true)
        .with_file(true)
        .with_target(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    Ok(guard)
}
