//! Tests for persistent tier backends

use crate::app::services::cache::entry::CacheEntry;
use crate::app::services::cache::store::{FileStore, MemoryStore, PersistentStore};
use chrono::{TimeZone, Utc};
use serde_json::json;
use std::time::Duration;
use tempfile::TempDir;

fn create_test_entry(key: &str) -> CacheEntry {
    CacheEntry::new(
        key,
        json!({"payload": key}),
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap(),
        Duration::from_secs(300),
    )
}

#[tokio::test]
async fn test_file_store_round_trip() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::new(dir.path()).unwrap();

    let entry = create_test_entry("stations");
    store.put(&entry).await.unwrap();

    let loaded = store.get("stations").await.unwrap().unwrap();
    assert_eq!(loaded, entry);
}

#[tokio::test]
async fn test_file_store_missing_key() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::new(dir.path()).unwrap();
    assert!(store.get("absent").await.unwrap().is_none());
}

#[tokio::test]
async fn test_file_store_overwrite_is_last_write_wins() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::new(dir.path()).unwrap();

    let mut entry = create_test_entry("k");
    store.put(&entry).await.unwrap();

    entry.value = json!({"payload": "second"});
    store.put(&entry).await.unwrap();

    let loaded = store.get("k").await.unwrap().unwrap();
    assert_eq!(loaded.value, json!({"payload": "second"}));
    assert_eq!(store.keys().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_file_store_delete() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::new(dir.path()).unwrap();

    store.put(&create_test_entry("k")).await.unwrap();
    store.delete("k").await.unwrap();
    assert!(store.get("k").await.unwrap().is_none());

    // Deleting a missing key is not an error.
    store.delete("k").await.unwrap();
}

#[tokio::test]
async fn test_file_store_keys() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::new(dir.path()).unwrap();

    store.put(&create_test_entry("alpha")).await.unwrap();
    store.put(&create_test_entry("beta")).await.unwrap();

    let mut keys = store.keys().await.unwrap();
    keys.sort();
    assert_eq!(keys, vec!["alpha", "beta"]);
}

#[tokio::test]
async fn test_file_store_handles_awkward_key_strings() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::new(dir.path()).unwrap();

    // Keys become hashed file names, so separators and spaces are fine.
    let key = "stations/nsw?brand=BP&fuel=diesel .. weird";
    store.put(&create_test_entry(key)).await.unwrap();

    let loaded = store.get(key).await.unwrap().unwrap();
    assert_eq!(loaded.key, key);
    assert_eq!(store.keys().await.unwrap(), vec![key]);
}

#[tokio::test]
async fn test_file_store_discards_unreadable_file() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::new(dir.path()).unwrap();

    store.put(&create_test_entry("good")).await.unwrap();

    // Corrupt the entry on disk; the next read treats it as a miss.
    let path = dir.path().read_dir().unwrap().next().unwrap().unwrap().path();
    std::fs::write(&path, b"not json").unwrap();

    assert!(store.get("good").await.unwrap().is_none());
    assert!(!path.exists());
}

#[tokio::test]
async fn test_file_store_persists_across_instances() {
    let dir = TempDir::new().unwrap();

    {
        let store = FileStore::new(dir.path()).unwrap();
        store.put(&create_test_entry("k")).await.unwrap();
    }

    let reopened = FileStore::new(dir.path()).unwrap();
    assert!(reopened.get("k").await.unwrap().is_some());
}

#[tokio::test]
async fn test_memory_store_round_trip() {
    let store = MemoryStore::new();

    store.put(&create_test_entry("k")).await.unwrap();
    assert_eq!(store.get("k").await.unwrap().unwrap().key, "k");

    store.delete("k").await.unwrap();
    assert!(store.get("k").await.unwrap().is_none());
    assert!(store.keys().await.unwrap().is_empty());
}
