//! End-to-end server tests over a real TCP listener

use keel_core::{LogLevel, REQUEST_LOGGER};
use keel_gateway::{GatewayConfig, HealthResponse};
use pretty_assertions::assert_eq;
use tests::{test_server, TestLogs};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

#[tokio::test]
async fn test_serve_lifecycle_and_client_ip() {
    let logs = TestLogs::new(LogLevel::Info);
    let server = test_server(&logs, GatewayConfig::default());
    let database = server.dependencies().database.clone();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let handle = tokio::spawn(server.serve(listener, async move {
        shutdown_rx.await.ok();
    }));

    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    let response = client
        .get(format!("http://{}/health", addr))
        .header("X-Request-ID", "e2e-1")
        .header("Origin", "http://localhost:3000")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "http://localhost:3000"
    );
    assert_eq!(response.headers()["access-control-allow-credentials"], "true");

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    // Startup hook ran before the first request
    assert_eq!(body["database"], true);
    assert!(database.status().await);

    shutdown_tx.send(()).unwrap();
    handle.await.unwrap().unwrap();

    // Shutdown hook released the client
    assert!(!database.status().await);

    let records = logs.records(REQUEST_LOGGER);
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["request_id"], "e2e-1");
    assert_eq!(records[0]["ip_address"], "127.0.0.1");
    assert_eq!(records[0]["url"], format!("http://{}/health", addr));
    assert_eq!(records[1]["status_code"], 200);
}

#[tokio::test]
async fn test_health_response_shape() {
    let logs = TestLogs::new(LogLevel::Info);
    let server = test_server(&logs, GatewayConfig::default());

    let body = serde_json::to_value(HealthResponse {
        status: "ok".to_string(),
        version: "0.1.0".to_string(),
        database: false,
    })
    .unwrap();
    let keys: Vec<&str> = body.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["status", "version", "database"]);
    assert!(!server.dependencies().database.status().await);
}
