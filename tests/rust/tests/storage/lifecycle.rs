//! DatabaseManager lifecycle tests

use keel_core::Settings;
use keel_storage::{DatabaseManager, StorageError};
use std::collections::HashMap;
use std::sync::Arc;

fn settings_with(vars: &[(&str, &str)]) -> (tempfile::TempDir, Settings) {
    let root = tempfile::tempdir().unwrap();
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let settings = Settings::from_lookup(root.path(), |key| vars.get(key).cloned()).unwrap();
    (root, settings)
}

#[tokio::test]
async fn test_manager_from_settings() {
    let (_root, settings) = settings_with(&[("DATABASE", "orders")]);
    let manager = DatabaseManager::from_settings(&settings);

    assert_eq!(manager.database_name(), "orders");
    assert!(!manager.status().await);
    assert!(manager.database().await.is_none());

    manager.init().await.unwrap();
    assert_eq!(manager.database().await.unwrap().name(), "orders");
    manager.close().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_init_creates_one_client() {
    let manager = tests::test_database();

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let manager = Arc::clone(&manager);
            tokio::spawn(async move { manager.init().await.unwrap().is_some() })
        })
        .collect();
    let created = futures::future::try_join_all(tasks).await.unwrap();

    assert_eq!(created.iter().filter(|c| **c).count(), 1);
    assert!(manager.status().await);

    manager.close().await;
    manager.close().await;
    assert!(!manager.status().await);
}

#[tokio::test]
async fn test_invalid_uri_is_client_error() {
    let (_root, settings) = settings_with(&[("DATABASE_URI", "postgres://nope")]);
    let manager = DatabaseManager::from_settings(&settings);

    let err = manager.init().await.unwrap_err();
    assert!(matches!(err, StorageError::Client(_)));
    assert!(!manager.status().await);
}
