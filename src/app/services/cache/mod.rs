//! Two-tier TTL cache with single-flight fetch de-duplication
//!
//! This module provides the resilient data cache the directory loads its
//! station data through: an in-memory tier in front of a persistent tier,
//! TTL expiry judged against an injected clock, single-flight sharing of
//! concurrent fetches per key, stale-while-revalidate serving, and a
//! periodic expired-entry sweeper.
//!
//! Caches are constructed explicitly and passed by reference; there is no
//! module-level singleton, so tests never share hidden state.

use crate::{Error, Result};
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub mod clock;
pub mod entry;
pub mod store;

#[cfg(test)]
pub mod tests;

pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use store::{FileStore, MemoryStore, PersistentStore};

/// In-flight fetch shared by all concurrent callers for one key
type SharedFetch = Shared<BoxFuture<'static, std::result::Result<serde_json::Value, Arc<Error>>>>;

/// A cached value together with its freshness at read time
#[derive(Debug, Clone, PartialEq)]
pub struct CacheRead<T> {
    pub value: T,
    /// True when the entry had already expired and a background
    /// revalidation was triggered
    pub stale: bool,
}

/// Entry counts per tier, for maintenance reports
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CacheStats {
    pub memory_entries: usize,
    pub memory_expired: usize,
    pub persistent_entries: usize,
    pub persistent_expired: usize,
}

/// Two-tier key/value cache with TTL expiry
///
/// Reads check the memory tier first, then the persistent tier (promoting
/// hits into memory). Writes go to both tiers, last-write-wins per key.
/// Payloads are stored as JSON, so any serde-serializable value can be
/// cached; the cache itself is agnostic to what the values mean.
pub struct TieredCache<S> {
    memory: Arc<Mutex<HashMap<String, CacheEntry>>>,
    store: Arc<S>,
    clock: Arc<dyn Clock>,
    in_flight: Arc<Mutex<HashMap<String, SharedFetch>>>,
    sweeping: Arc<AtomicBool>,
}

impl<S> Clone for TieredCache<S> {
    fn clone(&self) -> Self {
        Self {
            memory: Arc::clone(&self.memory),
            store: Arc::clone(&self.store),
            clock: Arc::clone(&self.clock),
            in_flight: Arc::clone(&self.in_flight),
            sweeping: Arc::clone(&self.sweeping),
        }
    }
}

impl<S: PersistentStore> TieredCache<S> {
    /// Create a cache over the given persistent tier, using system time
    pub fn new(store: S) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    /// Create a cache with an explicit clock (used by tests)
    pub fn with_clock(store: S, clock: Arc<dyn Clock>) -> Self {
        Self {
            memory: Arc::new(Mutex::new(HashMap::new())),
            store: Arc::new(store),
            clock,
            in_flight: Arc::new(Mutex::new(HashMap::new())),
            sweeping: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Access the persistent tier
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Read an entry from either tier without expiry handling
    ///
    /// Expired entries are returned as-is; they stay in place so the
    /// stale-while-revalidate and failure-fallback paths can still serve
    /// them until a successful refresh overwrites the key.
    async fn lookup(&self, key: &str) -> Result<Option<CacheEntry>> {
        if let Some(entry) = self.memory.lock().await.get(key).cloned() {
            return Ok(Some(entry));
        }

        let entry = self.store.get(key).await?;
        if let Some(entry) = &entry {
            debug!("Promoting cache entry '{}' from persistent tier", key);
            self.memory
                .lock()
                .await
                .insert(key.to_string(), entry.clone());
        }
        Ok(entry)
    }

    /// Get a fresh value, `None` on miss
    ///
    /// A found-but-expired entry is deleted from both tiers and treated as
    /// a miss.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(entry) = self.lookup(key).await? else {
            return Ok(None);
        };

        if entry.is_expired(self.clock.now()) {
            debug!("Cache entry '{}' expired; purging", key);
            self.remove(key).await?;
            return Ok(None);
        }

        Ok(Some(serde_json::from_value(entry.value)?))
    }

    /// Write a value to both tiers with the given time-to-live
    pub async fn set<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) -> Result<()> {
        let json = serde_json::to_value(value)?;
        self.set_value(key, json, ttl).await
    }

    async fn set_value(&self, key: &str, value: serde_json::Value, ttl: Duration) -> Result<()> {
        let entry = CacheEntry::new(key, value, self.clock.now(), ttl);
        self.store.put(&entry).await?;
        self.memory.lock().await.insert(key.to_string(), entry);
        Ok(())
    }

    /// Delete a key from both tiers
    pub async fn remove(&self, key: &str) -> Result<()> {
        self.memory.lock().await.remove(key);
        self.store.delete(key).await
    }

    /// Delete every entry from both tiers
    pub async fn clear(&self) -> Result<usize> {
        let keys = self.store.keys().await?;
        for key in &keys {
            self.store.delete(key).await?;
        }
        let mut memory = self.memory.lock().await;
        let cleared = memory.len().max(keys.len());
        memory.clear();
        info!("Cleared {} cache entries", cleared);
        Ok(cleared)
    }

    /// Get a fresh value, fetching and caching it on miss
    ///
    /// Concurrent callers for the same key share a single outstanding
    /// fetch and all receive the same value or the same error. When the
    /// fetch fails with a network-shaped error and a previous (possibly
    /// expired) entry exists, that entry is served instead of the error;
    /// aborted fetches propagate without touching the cache.
    pub async fn get_or_fetch<T, F, Fut>(&self, key: &str, ttl: Duration, fetcher: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned + Send + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let existing = self.lookup(key).await?;
        if let Some(entry) = &existing {
            if entry.is_fresh(self.clock.now()) {
                debug!("Cache hit for '{}'", key);
                return Ok(serde_json::from_value(entry.value.clone())?);
            }
        }

        let flight = self.join_or_start_flight(key, ttl, fetcher).await;
        match flight.await {
            Ok(json) => Ok(serde_json::from_value(json)?),
            Err(shared) => {
                let err = Error::Shared(shared);
                if !err.is_aborted() && err.allows_stale_fallback() {
                    if let Some(entry) = existing {
                        warn!("Fetch for '{}' failed; serving stale entry: {}", key, err);
                        return Ok(serde_json::from_value(entry.value)?);
                    }
                }
                Err(err)
            }
        }
    }

    /// Serve any cached value immediately, revalidating expired entries in
    /// the background
    ///
    /// With a cached value (fresh or expired) the call returns it at once;
    /// an expired entry additionally triggers a fire-and-forget refresh
    /// whose errors are logged, not surfaced. With no cached value this
    /// behaves like [`TieredCache::get_or_fetch`].
    pub async fn get_stale<T, F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        fetcher: F,
    ) -> Result<CacheRead<T>>
    where
        T: Serialize + DeserializeOwned + Send + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        match self.lookup(key).await? {
            Some(entry) => {
                let stale = entry.is_expired(self.clock.now());
                let value = serde_json::from_value(entry.value)?;

                if stale {
                    debug!("Serving stale '{}' and revalidating in background", key);
                    let flight = self.join_or_start_flight(key, ttl, fetcher).await;
                    let key = key.to_string();
                    tokio::spawn(async move {
                        if let Err(e) = flight.await {
                            warn!("Background revalidation for '{}' failed: {}", key, e);
                        }
                    });
                }

                Ok(CacheRead { value, stale })
            }
            None => {
                let flight = self.join_or_start_flight(key, ttl, fetcher).await;
                match flight.await {
                    Ok(json) => Ok(CacheRead {
                        value: serde_json::from_value(json)?,
                        stale: false,
                    }),
                    Err(shared) => Err(Error::Shared(shared)),
                }
            }
        }
    }

    /// Join the in-flight fetch for a key, or start one
    ///
    /// The fetcher is only invoked when no fetch is outstanding for the
    /// key. The flight stores its result in both tiers before resolving,
    /// then unregisters itself, so later callers hit the cache.
    async fn join_or_start_flight<T, F, Fut>(&self, key: &str, ttl: Duration, fetcher: F) -> SharedFetch
    where
        T: Serialize + Send + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let mut flights = self.in_flight.lock().await;
        if let Some(flight) = flights.get(key) {
            debug!("Joining in-flight fetch for '{}'", key);
            return flight.clone();
        }

        let cache = self.clone();
        let key_owned = key.to_string();
        let fetch = fetcher();
        let flight: SharedFetch = async move {
            let outcome = match fetch.await {
                Ok(value) => match serde_json::to_value(&value) {
                    Ok(json) => match cache.set_value(&key_owned, json.clone(), ttl).await {
                        Ok(()) => Ok(json),
                        Err(e) => Err(Arc::new(e)),
                    },
                    Err(e) => Err(Arc::new(Error::from(e))),
                },
                Err(e) => Err(Arc::new(e)),
            };
            cache.in_flight.lock().await.remove(&key_owned);
            outcome
        }
        .boxed()
        .shared();

        flights.insert(key.to_string(), flight.clone());
        flight
    }

    /// Delete expired entries from both tiers
    ///
    /// Returns the number of distinct keys removed. Reentrant calls are
    /// skipped: a sweep never runs concurrently with itself.
    pub async fn sweep(&self) -> Result<usize> {
        if self.sweeping.swap(true, Ordering::AcqRel) {
            debug!("Sweep already in progress; skipping");
            return Ok(0);
        }

        let result = self.sweep_expired().await;
        self.sweeping.store(false, Ordering::Release);
        result
    }

    async fn sweep_expired(&self) -> Result<usize> {
        let now = self.clock.now();
        let mut swept: HashSet<String> = HashSet::new();

        {
            let mut memory = self.memory.lock().await;
            memory.retain(|key, entry| {
                if entry.is_expired(now) {
                    swept.insert(key.clone());
                    false
                } else {
                    true
                }
            });
        }

        for key in self.store.keys().await? {
            if let Some(entry) = self.store.get(&key).await? {
                if entry.is_expired(now) {
                    self.store.delete(&key).await?;
                    swept.insert(key);
                }
            }
        }

        if !swept.is_empty() {
            info!("Swept {} expired cache entries", swept.len());
        }
        Ok(swept.len())
    }

    /// Run [`TieredCache::sweep`] on a timer until the token is cancelled
    pub fn spawn_sweeper(
        &self,
        interval: Duration,
        token: CancellationToken,
    ) -> tokio::task::JoinHandle<()> {
        let cache = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            // The first tick completes immediately; consume it so the
            // first sweep lands one interval after startup.
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = token.cancelled() => {
                        debug!("Cache sweeper stopped");
                        break;
                    }
                    _ = ticker.tick() => {
                        if let Err(e) = cache.sweep().await {
                            warn!("Cache sweep failed: {}", e);
                        }
                    }
                }
            }
        })
    }

    /// Entry counts per tier, for the maintenance report
    pub async fn stats(&self) -> Result<CacheStats> {
        let now = self.clock.now();
        let mut stats = CacheStats::default();

        {
            let memory = self.memory.lock().await;
            stats.memory_entries = memory.len();
            stats.memory_expired = memory
                .values()
                .filter(|entry| entry.is_expired(now))
                .count();
        }

        for key in self.store.keys().await? {
            if let Some(entry) = self.store.get(&key).await? {
                stats.persistent_entries += 1;
                if entry.is_expired(now) {
                    stats.persistent_expired += 1;
                }
            }
        }

        Ok(stats)
    }
}
