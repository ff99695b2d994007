//! Retry policy for the diagnosis and dealer directory API.
//!
//! Network failures, HTTP 429 and 5xx responses are retried with exponential
//! back-off and ±25 % jitter. Everything else (4xx, malformed JSON, unreadable
//! image) is returned on the first failure.

use std::future::Future;

use agroscan_core::retry::RetryPolicy;

use crate::error::DiagnosisError;

const MAX_DELAY_MS: u64 = 30_000;

pub(crate) fn is_retriable(err: &DiagnosisError) -> bool {
    match err {
        DiagnosisError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        DiagnosisError::RateLimited { .. } => true,
        DiagnosisError::UnexpectedStatus { status, .. } => *status >= 500,
        DiagnosisError::Io { .. }
        | DiagnosisError::Deserialize { .. }
        | DiagnosisError::InvalidBaseUrl { .. } => false,
    }
}

/// Runs `operation` with up to `max_retries` additional attempts on
/// transient errors.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    operation: F,
) -> Result<T, DiagnosisError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DiagnosisError>>,
{
    let policy = RetryPolicy {
        max_retries,
        backoff_base_ms,
        max_delay_ms: MAX_DELAY_MS,
    };
    agroscan_core::retry::retry_with_backoff(policy, "diagnosis", is_retriable, operation).await
}
