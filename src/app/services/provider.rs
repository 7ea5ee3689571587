//! Station data provider
//!
//! Ties the fetch client and the tiered cache together: station records are
//! served through the cache under a single key, fetched from the configured
//! endpoint when needed, and normalized at this boundary. When the endpoint
//! cannot be reached and nothing is cached, a configured local JSON file
//! stands in for the remote data.

use crate::app::models::{RawStationRecord, StationRecord, normalize_records};
use crate::app::services::cache::{CacheRead, PersistentStore, TieredCache};
use crate::app::services::fetch::FetchClient;
use crate::constants::STATIONS_CACHE_KEY;
use crate::{Error, Result};
use chrono::Utc;
use futures::FutureExt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Cached, resilient source of the full station list
pub struct StationProvider<S> {
    cache: TieredCache<S>,
    client: FetchClient,
    endpoint: String,
    ttl: Duration,
    fallback_path: Option<PathBuf>,
}

impl<S: PersistentStore> StationProvider<S> {
    /// Create a provider fetching from `endpoint` with the given list TTL
    pub fn new(
        cache: TieredCache<S>,
        client: FetchClient,
        endpoint: impl Into<String>,
        ttl: Duration,
    ) -> Self {
        Self {
            cache,
            client,
            endpoint: endpoint.into(),
            ttl,
            fallback_path: None,
        }
    }

    /// Use a local JSON file when the fetch fails with nothing cached
    pub fn with_fallback(mut self, path: impl Into<PathBuf>) -> Self {
        self.fallback_path = Some(path.into());
        self
    }

    /// The cache this provider reads through
    pub fn cache(&self) -> &TieredCache<S> {
        &self.cache
    }

    /// Load the station list, fetching and caching on miss
    pub async fn stations(&self) -> Result<Vec<StationRecord>> {
        let result = self
            .cache
            .get_or_fetch(STATIONS_CACHE_KEY, self.ttl, self.make_fetcher())
            .await;
        self.or_local_fallback(result).await
    }

    /// Load the station list, serving any cached copy immediately
    ///
    /// Expired entries come back flagged stale while a background
    /// revalidation runs. Records loaded from the local fallback file are
    /// also flagged stale so callers can surface the data's provenance.
    pub async fn stations_allow_stale(&self) -> Result<CacheRead<Vec<StationRecord>>> {
        let result = self
            .cache
            .get_stale(STATIONS_CACHE_KEY, self.ttl, self.make_fetcher())
            .await;

        match result {
            Ok(read) => Ok(read),
            Err(err) => {
                let value = self.or_local_fallback(Err(err)).await?;
                Ok(CacheRead { value, stale: true })
            }
        }
    }

    fn make_fetcher(
        &self,
    ) -> impl FnOnce() -> futures::future::BoxFuture<'static, Result<Vec<StationRecord>>> {
        let client = self.client.clone();
        let endpoint = self.endpoint.clone();
        move || {
            async move {
                let raw: Vec<RawStationRecord> =
                    client.get_json(&endpoint).await.map_err(Error::from)?;
                Ok(normalize_records(raw, Utc::now()))
            }
            .boxed()
        }
    }

    async fn or_local_fallback(
        &self,
        result: Result<Vec<StationRecord>>,
    ) -> Result<Vec<StationRecord>> {
        match result {
            Ok(records) => Ok(records),
            // Aborts propagate; everything else may use the local file.
            Err(err) if !err.is_aborted() => match &self.fallback_path {
                Some(path) => {
                    warn!("Station fetch failed ({}); loading local fallback", err);
                    load_records_from_file(path)
                }
                None => Err(err),
            },
            Err(err) => Err(err),
        }
    }
}

/// Load raw station rows from a local JSON file and normalize them
pub fn load_records_from_file(path: &Path) -> Result<Vec<StationRecord>> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::file_not_found(path.display().to_string()));
        }
        Err(e) => {
            return Err(Error::io(
                format!("Failed to read station file {}", path.display()),
                e,
            ));
        }
    };

    let raw: Vec<RawStationRecord> = serde_json::from_slice(&bytes)?;
    let records = normalize_records(raw, Utc::now());
    info!(
        "Loaded {} station records from {}",
        records.len(),
        path.display()
    );
    Ok(records)
}
