//! LoggerRegistry integration tests
//!
//! Tests for:
//! - One instance per name under concurrent first access
//! - File layout per logger name
//! - Size rotation through registry-created sinks

use keel_core::{LogLevel, SinkKind, REQUEST_LOGGER, SERVICE_LOGGER};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use tests::TestLogs;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_get_logger_yields_one_instance() {
    let logs = TestLogs::new(LogLevel::Info);

    let tasks: Vec<_> = (0..32)
        .map(|_| {
            let registry = logs.registry.clone();
            tokio::spawn(async move { registry.get_logger("x").unwrap() })
        })
        .collect();

    let loggers = futures::future::try_join_all(tasks).await.unwrap();
    let first = &loggers[0];
    assert!(loggers.iter().all(|l| Arc::ptr_eq(l, first)));
    assert_eq!(first.sink_kinds(), vec![SinkKind::File, SinkKind::Console]);
    assert_eq!(logs.registry.len(), 1);

    first.info("once", Default::default()).await;
    assert_eq!(logs.records("x").len(), 1);
}

#[tokio::test]
async fn test_log_file_layout() {
    let logs = TestLogs::new(LogLevel::Info);

    for name in [REQUEST_LOGGER, SERVICE_LOGGER, "billing:worker"] {
        logs.registry
            .get_logger(name)
            .unwrap()
            .info("hello", Default::default())
            .await;
    }

    let root = logs.dir.path();
    assert!(root.join("request_logs").join("request.log").is_file());
    assert!(root.join("service_logs").join("service.log").is_file());
    assert!(root.join("service_logs").join("billing%3Aworker.log").is_file());
    assert_eq!(
        logs.registry.names(),
        vec!["billing:worker", REQUEST_LOGGER, SERVICE_LOGGER]
    );
}

#[tokio::test]
async fn test_registry_sinks_rotate() {
    let logs = TestLogs::with_options(|options| {
        options.max_bytes = 300;
        options.backup_count = 2;
    });
    let logger = logs.registry.get_logger("rotating").unwrap();

    for i in 0..30 {
        logger
            .info(&format!("record number {i}"), Default::default())
            .await;
    }

    let path = logs.registry.log_path("rotating");
    let backup = |i: usize| {
        let mut name = path.as_os_str().to_owned();
        name.push(format!(".{i}"));
        std::path::PathBuf::from(name)
    };

    assert!(path.is_file());
    assert!(backup(1).is_file());
    assert!(backup(2).is_file());
    assert!(!backup(3).exists());
    assert!(std::fs::metadata(&path).unwrap().len() <= 300);

    // The newest record stays in the live file
    let live = tests::read_json_lines(&path);
    assert_eq!(live.last().unwrap()["message"], "record number 29");
}

#[tokio::test]
async fn test_records_follow_key_template() {
    let logs = TestLogs::with_options(|options| {
        options.format = "%(asctime)s %(levelname)s %(message)s".to_string();
    });
    logs.registry
        .get_logger(SERVICE_LOGGER)
        .unwrap()
        .warning("disk almost full", keel_core::Fields::new().with("free_mb", 12))
        .await;

    let records = logs.records(SERVICE_LOGGER);
    let record = records[0].as_object().unwrap();
    let keys: Vec<&str> = record.keys().map(String::as_str).collect();
    assert_eq!(
        keys[..4],
        ["asctime", "levelname", "message", "free_mb"]
    );
    assert_eq!(record["levelname"], "WARNING");
    assert_eq!(record["level"], "WARNING");
    assert_eq!(record["logger_name"], SERVICE_LOGGER);
    assert_eq!(record["module"], "registry");
}
