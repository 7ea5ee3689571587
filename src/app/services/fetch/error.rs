//! Error taxonomy for the fetch layer
//!
//! Classifies fetch failures into the categories the retry policy and the
//! cache's failure semantics are written against: retryable transport
//! problems, terminal HTTP errors, offline detection, caller aborts, and
//! malformed payloads.

use crate::constants::is_retryable_status;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    /// Retryable HTTP response (408, 429, or 5xx)
    #[error("transient HTTP error: status {status}")]
    Transient { status: u16 },

    /// Terminal HTTP response (4xx other than 408/429)
    #[error("HTTP error: status {status}")]
    NonRetryable { status: u16 },

    /// Connection-level failure (DNS, refused, reset)
    #[error("network error: {message}")]
    Network { message: String },

    /// A single attempt exceeded its time budget
    #[error("request timed out")]
    Timeout,

    /// The client is offline; attempts are abandoned, not retried
    #[error("client is offline")]
    Offline,

    /// Caller-initiated cancellation; never retried, never stale-served
    #[error("request aborted")]
    Aborted,

    /// The response body did not match the expected shape
    #[error("malformed response payload: {message}")]
    Malformed { message: String },

    /// All retry attempts failed; carries the final attempt's error
    #[error("fetch failed after {attempts} attempts: {last}")]
    Exhausted { attempts: u32, last: Box<FetchError> },
}

impl FetchError {
    /// Classify an HTTP status code
    pub fn from_status(status: u16) -> Self {
        if is_retryable_status(status) {
            Self::Transient { status }
        } else {
            Self::NonRetryable { status }
        }
    }

    /// Classify a transport error from the HTTP client
    pub fn classify(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else if error.is_decode() {
            Self::Malformed {
                message: error.to_string(),
            }
        } else if let Some(status) = error.status() {
            Self::from_status(status.as_u16())
        } else {
            Self::Network {
                message: error.to_string(),
            }
        }
    }

    /// Whether another attempt may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Transient { .. } | Self::Network { .. } | Self::Timeout
        )
    }

    /// Whether this error came from a caller-initiated abort
    pub fn is_aborted(&self) -> bool {
        match self {
            Self::Aborted => true,
            Self::Exhausted { last, .. } => last.is_aborted(),
            _ => false,
        }
    }

    /// Whether the cache may serve a stale entry in place of this error
    ///
    /// True for network-shaped failures; malformed payloads, terminal HTTP
    /// errors, and aborts always surface to the caller.
    pub fn allows_stale_fallback(&self) -> bool {
        matches!(
            self,
            Self::Transient { .. }
                | Self::Network { .. }
                | Self::Timeout
                | Self::Offline
                | Self::Exhausted { .. }
        )
    }
}
