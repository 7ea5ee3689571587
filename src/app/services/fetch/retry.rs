//! Pure retry policy for fetch attempts
//!
//! The policy is decoupled from the transport: given the attempt number
//! that just failed and its error, it decides whether to try again and how
//! long to wait first. The client drives the loop; the policy holds the
//! logic, so it is testable without any network.

use super::error::FetchError;
use crate::constants::{DEFAULT_MAX_RETRY_ATTEMPTS, DEFAULT_RETRY_BASE_DELAY_MS};
use std::time::Duration;

/// Outcome of a retry decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryDecision {
    /// Whether to make another attempt
    pub retry: bool,

    /// Delay before the next attempt; zero when not retrying
    pub delay: Duration,
}

impl RetryDecision {
    fn stop() -> Self {
        Self {
            retry: false,
            delay: Duration::ZERO,
        }
    }
}

/// Retry configuration: attempt cap and backoff base
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum total attempts, including the first
    pub max_attempts: u32,

    /// Backoff base; the delay before attempt N+1 is `base_delay * N`
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_RETRY_ATTEMPTS,
            base_delay: Duration::from_millis(DEFAULT_RETRY_BASE_DELAY_MS),
        }
    }
}

impl RetryPolicy {
    /// Create a policy with explicit attempt cap and backoff base
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Decide whether to retry after `attempt` (1-based) failed with `error`
    pub fn decide(&self, attempt: u32, error: &FetchError) -> RetryDecision {
        if !error.is_retryable() || attempt >= self.max_attempts {
            return RetryDecision::stop();
        }

        RetryDecision {
            retry: true,
            delay: self.base_delay.saturating_mul(attempt),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.base_delay, Duration::from_millis(1000));
    }

    #[test]
    fn test_backoff_grows_with_attempt_number() {
        let policy = RetryPolicy::default();
        let err = FetchError::Transient { status: 503 };

        let first = policy.decide(1, &err);
        assert!(first.retry);
        assert_eq!(first.delay, Duration::from_secs(1));

        let second = policy.decide(2, &err);
        assert!(second.retry);
        assert_eq!(second.delay, Duration::from_secs(2));
    }

    #[test]
    fn test_attempt_cap() {
        let policy = RetryPolicy::default();
        let err = FetchError::Timeout;

        assert!(policy.decide(2, &err).retry);
        let capped = policy.decide(3, &err);
        assert!(!capped.retry);
        assert_eq!(capped.delay, Duration::ZERO);
    }

    #[test]
    fn test_non_retryable_errors_stop_immediately() {
        let policy = RetryPolicy::default();

        for err in [
            FetchError::NonRetryable { status: 404 },
            FetchError::Offline,
            FetchError::Aborted,
            FetchError::Malformed {
                message: "bad".to_string(),
            },
        ] {
            assert!(!policy.decide(1, &err).retry);
        }
    }

    #[test]
    fn test_custom_policy() {
        let policy = RetryPolicy::new(5, Duration::from_millis(250));
        let err = FetchError::Network {
            message: "reset".to_string(),
        };

        assert_eq!(policy.decide(4, &err).delay, Duration::from_millis(1000));
        assert!(!policy.decide(5, &err).retry);
    }

    #[test]
    fn test_attempt_floor() {
        // A zero cap would make every request fail without trying.
        let policy = RetryPolicy::new(0, Duration::ZERO);
        assert_eq!(policy.max_attempts, 1);
    }
}
