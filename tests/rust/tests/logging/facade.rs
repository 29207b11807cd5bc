//! Async logging facade integration tests

use keel_core::{correlation, Fields, LogLevel, SERVICE_LOGGER};
use pretty_assertions::assert_eq;
use std::io;
use tests::TestLogs;

#[tokio::test]
async fn test_correlation_id_reaches_every_logger() {
    let logs = TestLogs::new(LogLevel::Info);
    let service = logs.registry.get_logger(SERVICE_LOGGER).unwrap();
    let audit = logs.registry.get_logger("audit").unwrap();

    correlation::scope_with("req-42", async {
        service.info("charging card", Fields::new()).await;
        audit.info("charge recorded", Fields::new()).await;
    })
    .await;
    service.info("outside", Fields::new()).await;

    let service_records = logs.records(SERVICE_LOGGER);
    assert_eq!(service_records[0]["request_id"], "req-42");
    assert!(service_records[1].get("request_id").is_none());
    assert_eq!(logs.records("audit")[0]["request_id"], "req-42");
}

#[tokio::test]
async fn test_threshold_filters_records() {
    let logs = TestLogs::new(LogLevel::Warning);
    let logger = logs.registry.get_logger("quiet").unwrap();

    logger.debug("dropped", Fields::new()).await;
    logger.info("dropped", Fields::new()).await;
    logger.warning("kept", Fields::new()).await;
    logger.critical("kept", Fields::new()).await;

    let levels: Vec<_> = logs
        .records("quiet")
        .iter()
        .map(|r| r["level"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(levels, vec!["WARNING", "CRITICAL"]);
}

#[tokio::test]
async fn test_exception_record() {
    let logs = TestLogs::new(LogLevel::Info);
    let logger = logs.registry.get_logger("jobs").unwrap();
    let error = io::Error::new(io::ErrorKind::NotFound, "config.toml missing");

    logger
        .exception("Job failed", &error, Fields::new().with("job", "sync"))
        .await;
    logger.error("plain error", Fields::new()).await;

    let records = logs.records("jobs");
    let failed = &records[0];
    assert_eq!(failed["level"], "ERROR");
    assert_eq!(failed["job"], "sync");
    assert_eq!(failed["exception"], "config.toml missing");
    assert!(failed["exception_type"].as_str().unwrap().contains("io::error::Error"));
    assert!(!failed["traceback"].as_str().unwrap().is_empty());

    let plain = &records[1];
    for key in ["exception", "exception_type", "traceback"] {
        assert!(plain.get(key).is_none(), "unexpected {key}");
    }
}

#[derive(Debug)]
struct QuotaExceeded;

impl std::fmt::Display for QuotaExceeded {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("quota exceeded")
    }
}

impl std::error::Error for QuotaExceeded {}

#[tokio::test]
async fn test_exception_record_from_boxed_error() {
    let logs = TestLogs::new(LogLevel::Info);
    let logger = logs.registry.get_logger("uploads").unwrap();
    let boxed: Box<dyn std::error::Error + Send + Sync> = Box::new(QuotaExceeded);

    logger
        .exception("Upload failed", boxed.as_ref(), Fields::new())
        .await;

    let records = logs.records("uploads");
    assert_eq!(records[0]["exception_type"], "QuotaExceeded");
    assert_eq!(records[0]["exception"], "quota exceeded");
}
