//! Retry classification for Places lookups.
//!
//! Only transient failures are retried: network errors, 5xx responses and
//! quota throttling. Request-level rejections (`REQUEST_DENIED`,
//! `INVALID_REQUEST`) and malformed bodies are returned immediately.

use std::future::Future;

use agroscan_core::retry::RetryPolicy;

use crate::error::PlacesError;

const MAX_DELAY_MS: u64 = 10_000;

/// Returns `true` for errors that are worth retrying after a back-off delay.
///
/// **Retriable:**
/// - [`PlacesError::Http`] on timeout, connect failure or a 5xx status.
/// - [`PlacesError::RateLimited`]: HTTP 429 or `OVER_QUERY_LIMIT`.
/// - [`PlacesError::UnexpectedStatus`] with a 5xx status.
///
/// **Not retriable:** [`PlacesError::Api`], [`PlacesError::Deserialize`],
/// [`PlacesError::InvalidBaseUrl`] and 4xx statuses.
pub(crate) fn is_retriable(err: &PlacesError) -> bool {
    match err {
        PlacesError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        PlacesError::RateLimited(_) => true,
        PlacesError::UnexpectedStatus { status, .. } => *status >= 500,
        PlacesError::Api { .. }
        | PlacesError::Deserialize { .. }
        | PlacesError::InvalidBaseUrl { .. } => false,
    }
}

/// Runs `operation` with up to `max_retries` additional attempts on
/// transient errors, back-off capped at 10 s.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    operation: F,
) -> Result<T, PlacesError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, PlacesError>>,
{
    let policy = RetryPolicy {
        max_retries,
        backoff_base_ms,
        max_delay_ms: MAX_DELAY_MS,
    };
    agroscan_core::retry::retry_with_backoff(policy, "places", is_retriable, operation).await
}
