//! Configuration management and validation.
//!
//! Provides the runtime configuration for the directory: where station
//! data comes from, where the persistent cache lives, how long entries
//! stay fresh, and how fetches are retried.

use crate::app::services::fetch::RetryPolicy;
use crate::constants::{
    CACHE_DIR_NAME, DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_MAX_RETRY_ATTEMPTS, DEFAULT_PAGE_SIZE,
    DEFAULT_RETRY_BASE_DELAY_MS, DEFAULT_STATIONS_TTL_SECS, DEFAULT_SWEEP_INTERVAL_SECS,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Retry and timeout settings for the fetch layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum total attempts per request, including the first
    pub max_attempts: u32,

    /// Backoff base in milliseconds; delay before attempt N+1 is `base * N`
    pub base_delay_ms: u64,

    /// Timeout for a single attempt, in seconds
    pub timeout_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_RETRY_ATTEMPTS,
            base_delay_ms: DEFAULT_RETRY_BASE_DELAY_MS,
            timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
        }
    }
}

impl RetryConfig {
    /// Build the pure retry policy from this configuration
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, Duration::from_millis(self.base_delay_ms))
    }

    /// Per-attempt timeout as a duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Global configuration for the fuel directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// URL of the station data endpoint; may be empty when only a local
    /// fallback file is used
    pub endpoint: String,

    /// Directory for the persistent cache tier
    pub cache_dir: PathBuf,

    /// Time-to-live for the cached station list, in seconds
    pub stations_ttl_secs: u64,

    /// Stations per listing page
    pub page_size: usize,

    /// Interval between expired-entry sweeps, in seconds
    pub sweep_interval_secs: u64,

    /// Retry and timeout settings
    pub retry: RetryConfig,

    /// Local JSON file used when the endpoint is unreachable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            cache_dir: Self::default_cache_dir(),
            stations_ttl_secs: DEFAULT_STATIONS_TTL_SECS,
            page_size: DEFAULT_PAGE_SIZE,
            sweep_interval_secs: DEFAULT_SWEEP_INTERVAL_SECS,
            retry: RetryConfig::default(),
            fallback_path: None,
        }
    }
}

impl Config {
    /// Platform cache directory for the persistent tier
    ///
    /// Falls back to a relative `cache/` directory when the platform
    /// location cannot be determined.
    pub fn default_cache_dir() -> PathBuf {
        dirs::cache_dir()
            .map(|dir| dir.join(CACHE_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from("cache"))
    }

    /// Create configuration with a station data endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Create configuration with a custom cache directory
    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = dir.into();
        self
    }

    /// Create configuration with a custom station list TTL
    pub fn with_stations_ttl(mut self, ttl_secs: u64) -> Self {
        self.stations_ttl_secs = ttl_secs;
        self
    }

    /// Create configuration with a custom page size
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Create configuration with a local fallback file
    pub fn with_fallback_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.fallback_path = Some(path.into());
        self
    }

    /// Create configuration with custom retry settings
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Station list TTL as a duration
    pub fn stations_ttl(&self) -> Duration {
        Duration::from_secs(self.stations_ttl_secs)
    }

    /// Sweep interval as a duration
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    /// Validate the configuration for consistency
    pub fn validate(&self) -> Result<()> {
        if self.endpoint.trim().is_empty() && self.fallback_path.is_none() {
            return Err(Error::configuration(
                "Either an endpoint or a fallback file must be configured".to_string(),
            ));
        }

        if !self.endpoint.trim().is_empty()
            && !self.endpoint.starts_with("http://")
            && !self.endpoint.starts_with("https://")
        {
            return Err(Error::configuration(format!(
                "Endpoint '{}' must be an http(s) URL",
                self.endpoint
            )));
        }

        if self.page_size == 0 {
            return Err(Error::configuration(
                "Page size must be at least 1".to_string(),
            ));
        }

        if self.retry.max_attempts == 0 {
            return Err(Error::configuration(
                "Retry attempts must be at least 1".to_string(),
            ));
        }

        if self.sweep_interval_secs == 0 {
            return Err(Error::configuration(
                "Sweep interval must be at least 1 second".to_string(),
            ));
        }

        Ok(())
    }
}
