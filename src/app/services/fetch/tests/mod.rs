//! Tests for the fetch client's short-circuit paths
//!
//! Policy decisions and error classification are covered next to their
//! modules; these tests exercise the client paths that never reach the
//! network.

use super::{FetchClient, FetchError, OnlineStatus, RetryPolicy};
use tokio_util::sync::CancellationToken;


/// Build a client that would never sleep long in tests
pub fn create_test_client(online: OnlineStatus, token: CancellationToken) -> FetchClient {
    FetchClient::with_timeout(
        RetryPolicy::new(2, std::time::Duration::from_millis(10)),
        std::time::Duration::from_millis(250),
        online,
        token,
    )
    .unwrap()
}

pub fn assert_offline(result: Result<serde_json::Value, FetchError>) {
    assert!(matches!(result, Err(FetchError::Offline)));
}
