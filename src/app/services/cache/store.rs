//! Persistent tier backends for the cache
//!
//! The cache writes through to a [`PersistentStore`] so entries survive
//! process restarts. [`FileStore`] keeps one JSON document per key under a
//! cache directory; [`MemoryStore`] backs tests and cache-less operation.

use super::entry::CacheEntry;
use crate::{Error, Result};
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// Key/value storage for cache entries
///
/// Implementations store whole entries (payload plus expiry metadata) under
/// the entry's key. Writes are last-write-wins per key with no merge logic.
#[async_trait]
pub trait PersistentStore: Send + Sync + 'static {
    /// Load the entry for a key, `None` when absent
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>>;

    /// Write an entry, replacing any previous entry for the same key
    async fn put(&self, entry: &CacheEntry) -> Result<()>;

    /// Delete the entry for a key; deleting a missing key is not an error
    async fn delete(&self, key: &str) -> Result<()>;

    /// All keys currently stored
    async fn keys(&self) -> Result<Vec<String>>;
}

// Shared stores: a cache can sit on an `Arc<S>` when the same tier backs
// several cache instances.
#[async_trait]
impl<S: PersistentStore> PersistentStore for Arc<S> {
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>> {
        (**self).get(key).await
    }

    async fn put(&self, entry: &CacheEntry) -> Result<()> {
        (**self).put(entry).await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        (**self).delete(key).await
    }

    async fn keys(&self) -> Result<Vec<String>> {
        (**self).keys().await
    }
}

// =============================================================================
// File-backed Store
// =============================================================================

/// Persistent tier keeping one JSON file per key
///
/// File names are the SHA-256 of the key, so arbitrary key strings map to
/// safe, collision-free file names; the original key is recovered from the
/// entry payload.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a file store rooted at `dir`, creating the directory if needed
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .map_err(|e| Error::io(format!("Failed to create cache dir {}", dir.display()), e))?;
        Ok(Self { dir })
    }

    /// Directory this store writes into
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let digest = Sha256::digest(key.as_bytes());
        let name: String = digest.iter().map(|byte| format!("{:02x}", byte)).collect();
        self.dir.join(format!("{}.json", name))
    }
}

#[async_trait]
impl PersistentStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>> {
        let path = self.path_for(key);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(Error::io(
                    format!("Failed to read cache file {}", path.display()),
                    e,
                ));
            }
        };

        match serde_json::from_slice::<CacheEntry>(&bytes) {
            Ok(entry) => Ok(Some(entry)),
            Err(e) => {
                // Unreadable entries are dropped rather than poisoning reads
                warn!(
                    "Discarding unreadable cache file {}: {}",
                    path.display(),
                    e
                );
                let _ = tokio::fs::remove_file(&path).await;
                Ok(None)
            }
        }
    }

    async fn put(&self, entry: &CacheEntry) -> Result<()> {
        let path = self.path_for(&entry.key);
        let bytes = serde_json::to_vec(entry)?;
        tokio::fs::write(&path, bytes).await.map_err(|e| {
            Error::io(format!("Failed to write cache file {}", path.display()), e)
        })?;
        debug!("Persisted cache entry '{}' to {}", entry.key, path.display());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::io(
                format!("Failed to delete cache file {}", path.display()),
                e,
            )),
        }
    }

    async fn keys(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        let mut dir = tokio::fs::read_dir(&self.dir).await.map_err(|e| {
            Error::io(
                format!("Failed to read cache dir {}", self.dir.display()),
                e,
            )
        })?;

        while let Some(item) = dir
            .next_entry()
            .await
            .map_err(|e| Error::io("Failed to enumerate cache dir", e))?
        {
            let path = item.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            // The key lives inside the entry; file names are hashes.
            if let Ok(bytes) = tokio::fs::read(&path).await {
                if let Ok(entry) = serde_json::from_slice::<CacheEntry>(&bytes) {
                    keys.push(entry.key);
                }
            }
        }

        Ok(keys)
    }
}

// =============================================================================
// In-memory Store
// =============================================================================

/// Persistent-tier stand-in holding entries in process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PersistentStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn put(&self, entry: &CacheEntry) -> Result<()> {
        self.entries
            .lock()
            .unwrap()
            .insert(entry.key.clone(), entry.clone());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>> {
        Ok(self.entries.lock().unwrap().keys().cloned().collect())
    }
}
