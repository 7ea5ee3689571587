//! Shared test utilities and fixtures for cache tests

use super::{Clock, ManualClock, MemoryStore, TieredCache};
use chrono::{TimeZone, Utc};
use std::sync::Arc;

pub mod store_tests;
pub mod sweep_tests;

/// Create a memory-backed cache on a manual clock starting at a fixed time
pub fn create_test_cache() -> (TieredCache<MemoryStore>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap(),
    ));
    let dyn_clock: Arc<dyn Clock> = Arc::clone(&clock) as Arc<dyn Clock>;
    let cache = TieredCache::with_clock(MemoryStore::new(), dyn_clock);
    (cache, clock)
}

/// Create two caches sharing one persistent tier, as after a restart
pub fn create_shared_store_caches() -> (
    TieredCache<Arc<MemoryStore>>,
    TieredCache<Arc<MemoryStore>>,
    Arc<ManualClock>,
) {
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap(),
    ));
    let store = Arc::new(MemoryStore::new());
    let first = TieredCache::with_clock(
        Arc::clone(&store),
        Arc::clone(&clock) as Arc<dyn Clock>,
    );
    let second = TieredCache::with_clock(store, Arc::clone(&clock) as Arc<dyn Clock>);
    (first, second, clock)
}
