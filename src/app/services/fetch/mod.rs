//! Resilient HTTP fetch wrapper
//!
//! Wraps the HTTP client with the concerns the directory's data loading
//! needs: per-attempt timeouts, retry with backoff driven by a pure
//! [`RetryPolicy`], offline detection, and cancellation. The wrapper is
//! agnostic to what is being fetched; the cache and provider layers sit on
//! top of it.

use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

pub mod error;
pub mod retry;

#[cfg(test)]
pub mod tests;

pub use error::FetchError;
pub use retry::{RetryDecision, RetryPolicy};

use crate::constants::DEFAULT_FETCH_TIMEOUT_SECS;

/// Shared online/offline signal
///
/// Mirrors a network-status indicator: when flipped offline, in-progress
/// and subsequent fetches are abandoned immediately instead of retried.
#[derive(Debug, Clone)]
pub struct OnlineStatus(Arc<AtomicBool>);

impl OnlineStatus {
    pub fn new(online: bool) -> Self {
        Self(Arc::new(AtomicBool::new(online)))
    }

    pub fn set_online(&self, online: bool) {
        self.0.store(online, Ordering::Release);
    }

    pub fn is_online(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

impl Default for OnlineStatus {
    fn default() -> Self {
        Self::new(true)
    }
}

/// HTTP fetch client with retry, offline, and cancellation handling
#[derive(Debug, Clone)]
pub struct FetchClient {
    http: reqwest::Client,
    policy: RetryPolicy,
    online: OnlineStatus,
    token: CancellationToken,
}

impl FetchClient {
    /// Build a client with the default per-attempt timeout
    pub fn new(
        policy: RetryPolicy,
        online: OnlineStatus,
        token: CancellationToken,
    ) -> crate::Result<Self> {
        Self::with_timeout(
            policy,
            Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            online,
            token,
        )
    }

    /// Build a client with an explicit per-attempt timeout
    pub fn with_timeout(
        policy: RetryPolicy,
        timeout: Duration,
        online: OnlineStatus,
        token: CancellationToken,
    ) -> crate::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                crate::Error::configuration(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            http,
            policy,
            online,
            token,
        })
    }

    /// The retry policy this client runs under
    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Fetch a URL and deserialize its JSON body, retrying per the policy
    ///
    /// Each failed attempt is classified and fed to the retry policy;
    /// timeouts take the same path as retryable server errors. Offline
    /// detection abandons the request at once, cancellation aborts it, and
    /// retry exhaustion surfaces the final attempt's error wrapped in
    /// [`FetchError::Exhausted`].
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
    ) -> std::result::Result<T, FetchError> {
        let mut attempt: u32 = 0;

        loop {
            if !self.online.is_online() {
                return Err(FetchError::Offline);
            }
            if self.token.is_cancelled() {
                return Err(FetchError::Aborted);
            }

            attempt += 1;
            let result = tokio::select! {
                _ = self.token.cancelled() => return Err(FetchError::Aborted),
                result = self.attempt_get::<T>(url) => result,
            };

            let error = match result {
                Ok(value) => return Ok(value),
                Err(error) => error,
            };

            let decision = self.policy.decide(attempt, &error);
            if !decision.retry {
                return Err(if error.is_retryable() {
                    warn!("Fetch of {} exhausted after {} attempts: {}", url, attempt, error);
                    FetchError::Exhausted {
                        attempts: attempt,
                        last: Box::new(error),
                    }
                } else {
                    error
                });
            }

            debug!(
                "Fetch attempt {} for {} failed ({}); retrying in {:?}",
                attempt, url, error, decision.delay
            );
            tokio::select! {
                _ = self.token.cancelled() => return Err(FetchError::Aborted),
                _ = tokio::time::sleep(decision.delay) => {}
            }
        }
    }

    async fn attempt_get<T: DeserializeOwned>(
        &self,
        url: &str,
    ) -> std::result::Result<T, FetchError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(FetchError::classify)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::from_status(status.as_u16()));
        }

        response.json::<T>().await.map_err(FetchError::classify)
    }
}
