//! Tests for expired-entry sweeping and cache statistics

use super::create_test_cache;
use crate::app::services::cache::store::PersistentStore;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[tokio::test]
async fn test_sweep_removes_only_expired_entries() {
    let (cache, clock) = create_test_cache();

    cache
        .set("short", &1u32, Duration::from_secs(10))
        .await
        .unwrap();
    cache
        .set("long", &2u32, Duration::from_secs(1000))
        .await
        .unwrap();

    clock.advance_secs(11);

    let swept = cache.sweep().await.unwrap();
    assert_eq!(swept, 1);

    assert!(cache.store().get("short").await.unwrap().is_none());
    assert!(cache.store().get("long").await.unwrap().is_some());
    assert_eq!(cache.get::<u32>("long").await.unwrap(), Some(2));
}

#[tokio::test]
async fn test_sweep_counts_each_key_once_across_tiers() {
    let (cache, clock) = create_test_cache();

    // The entry exists in both memory and the persistent tier.
    cache
        .set("k", &1u32, Duration::from_secs(10))
        .await
        .unwrap();
    clock.advance_secs(11);

    assert_eq!(cache.sweep().await.unwrap(), 1);
    // Nothing left to sweep.
    assert_eq!(cache.sweep().await.unwrap(), 0);
}

#[tokio::test]
async fn test_sweep_empty_cache() {
    let (cache, _clock) = create_test_cache();
    assert_eq!(cache.sweep().await.unwrap(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_spawned_sweeper_sweeps_and_stops_on_cancel() {
    let (cache, clock) = create_test_cache();

    cache
        .set("k", &1u32, Duration::from_secs(10))
        .await
        .unwrap();
    clock.advance_secs(11);

    let token = CancellationToken::new();
    let handle = cache.spawn_sweeper(Duration::from_secs(5), token.clone());

    // Let at least one sweep interval elapse on the paused runtime.
    tokio::time::sleep(Duration::from_secs(6)).await;

    assert!(cache.store().get("k").await.unwrap().is_none());

    token.cancel();
    handle.await.unwrap();
}

#[tokio::test]
async fn test_stats_reports_expired_counts() {
    let (cache, clock) = create_test_cache();

    cache
        .set("fresh", &1u32, Duration::from_secs(1000))
        .await
        .unwrap();
    cache
        .set("expired", &2u32, Duration::from_secs(10))
        .await
        .unwrap();

    clock.advance_secs(11);

    let stats = cache.stats().await.unwrap();
    assert_eq!(stats.memory_entries, 2);
    assert_eq!(stats.memory_expired, 1);
    assert_eq!(stats.persistent_entries, 2);
    assert_eq!(stats.persistent_expired, 1);
}
