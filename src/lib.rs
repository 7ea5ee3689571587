//! Fuel Directory Library
//!
//! A Rust library implementing the data core of a fuel station price
//! directory: loading station and price records from an external provider,
//! caching them locally, and producing filtered, sorted, paginated listing
//! views.
//!
//! This library provides tools for:
//! - A pure filter/sort/paginate pipeline over in-memory station records
//! - A two-tier (memory + disk) TTL cache with single-flight de-duplication
//!   and stale-while-revalidate serving
//! - A retry-with-backoff fetch wrapper with offline detection and
//!   cancellation support
//! - Normalizing loosely-shaped provider payloads into fixed station records
//! - Comprehensive error handling and recovery

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod cache;
        pub mod fetch;
        pub mod listing;
        pub mod provider;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{FuelPrices, FuelType, StationRecord};
pub use app::services::cache::TieredCache;
pub use app::services::fetch::FetchError;
pub use app::services::listing::{ListingPage, ListingQuery, SortKey};
pub use config::Config;

use std::sync::Arc;

/// Result type alias for the fuel directory
pub type Result<T> = std::result::Result<T, Error>;

/// Comprehensive error types for fuel directory operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Fetch layer error (network, retry exhaustion, offline, abort)
    #[error(transparent)]
    Fetch(#[from] app::services::fetch::FetchError),

    /// JSON serialization or deserialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Cache tier error
    #[error("cache error: {message}")]
    Cache { message: String },

    /// Configuration error
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// Data validation error
    #[error("data validation error: {message}")]
    DataValidation { message: String },

    /// File not found
    #[error("file not found: {path}")]
    FileNotFound { path: String },

    /// Processing interrupted
    #[error("processing interrupted: {reason}")]
    ProcessingInterrupted { reason: String },

    /// Error shared between single-flight waiters for the same cache key
    #[error(transparent)]
    Shared(Arc<Error>),
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a cache error
    pub fn cache(message: impl Into<String>) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a data validation error
    pub fn data_validation(message: impl Into<String>) -> Self {
        Self::DataValidation {
            message: message.into(),
        }
    }

    /// Create a file not found error
    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create a processing interrupted error
    pub fn processing_interrupted(reason: impl Into<String>) -> Self {
        Self::ProcessingInterrupted {
            reason: reason.into(),
        }
    }

    /// Whether this error stems from a caller-initiated abort.
    ///
    /// Aborted fetches are a no-op from the cache's perspective: never
    /// retried, never served from stale data, not reported as a failure.
    pub fn is_aborted(&self) -> bool {
        match self {
            Self::Fetch(fetch) => fetch.is_aborted(),
            Self::Shared(inner) => inner.is_aborted(),
            _ => false,
        }
    }

    /// Whether a stale cache entry may be served in place of this error.
    ///
    /// Applies to network-shaped failures (transient, timeout, offline,
    /// retry exhaustion) where resilience beats freshness. Malformed
    /// payloads, non-retryable HTTP errors, and aborts always surface.
    pub fn allows_stale_fallback(&self) -> bool {
        match self {
            Self::Fetch(fetch) => fetch.allows_stale_fallback(),
            Self::Shared(inner) => inner.allows_stale_fallback(),
            _ => false,
        }
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<Arc<Error>> for Error {
    fn from(error: Arc<Error>) -> Self {
        Self::Shared(error)
    }
}
