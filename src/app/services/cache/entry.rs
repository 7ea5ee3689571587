//! Cache entry model with TTL expiry

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One cached payload with its expiry window
///
/// Entries are owned exclusively by the cache; the payload is opaque JSON.
/// An entry is fresh while `now < expires_at`. Once expired it is purged on
/// plain reads, but may be served one more time as stale by the
/// stale-while-revalidate path before being replaced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Caller-supplied cache key
    pub key: String,

    /// Cached payload
    pub value: serde_json::Value,

    /// When the entry was written
    pub stored_at: DateTime<Utc>,

    /// When the entry stops being fresh (`stored_at + ttl`)
    pub expires_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Create an entry stored at `now` that expires after `ttl`
    pub fn new(
        key: impl Into<String>,
        value: serde_json::Value,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        let ttl = ChronoDuration::from_std(ttl).unwrap_or_else(|_| ChronoDuration::MAX);
        Self {
            key: key.into(),
            value,
            stored_at: now,
            expires_at: now.checked_add_signed(ttl).unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }

    /// Whether the entry is still fresh at the given instant
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }

    /// Whether the entry has expired at the given instant
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        !self.is_fresh(now)
    }
}
