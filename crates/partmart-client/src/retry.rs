//! Retry with exponential back-off and jitter for the parts client.
//!
//! [`retry_with_backoff`] wraps any fallible async operation and retries on
//! transient errors (network failures, 5xx). Everything else is returned
//! immediately.

use std::future::Future;
use std::time::Duration;

use crate::error::ClientError;

/// Returns `true` for errors that are worth retrying after a back-off delay.
///
/// **Retriable:** timeouts, connection failures and HTTP 5xx responses.
///
/// **Not retriable:** 4xx responses (including [`ClientError::NotFound`]),
/// undecodable bodies, and configuration errors.
pub(crate) fn is_retriable(err: &ClientError) -> bool {
    match err {
        ClientError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        ClientError::UnexpectedStatus { status, .. } => (500..600).contains(status),
        ClientError::NotFound { .. }
        | ClientError::Deserialize { .. }
        | ClientError::InvalidBaseUrl { .. }
        | ClientError::EndpointsExhausted { .. } => false,
    }
}

const MAX_DELAY_MS: u64 = 30_000;

/// Runs `operation`, retrying transient errors up to `max_retries` times.
///
/// The n-th retry waits `backoff_base_ms * 2^(n-1)`, capped at 30 s, with
/// +-25 % jitter (see [`backoff_delay`]). Non-retriable errors are returned
/// from the first failing attempt.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, ClientError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ClientError>>,
{
    let mut retry = 0u32;
    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if retry < max_retries && is_retriable(&err) => err,
            Err(err) => return Err(err),
        };
        retry += 1;
        let delay = backoff_delay(backoff_base_ms, retry, rand::random::<f64>());
        tracing::warn!(
            retry,
            max_retries,
            delay = ?delay,
            error = %err,
            "parts API transient error, backing off"
        );
        tokio::time::sleep(delay).await;
    }
}

/// Delay before the 1-based `retry`. `unit` is a sample from `0.0..=1.0` that
/// picks the jitter factor in `0.75..=1.25`.
fn backoff_delay(base_ms: u64, retry: u32, unit: f64) -> Duration {
    let exponent = retry.saturating_sub(1).min(10);
    let nominal_ms = base_ms.saturating_mul(1u64 << exponent).min(MAX_DELAY_MS);
    let factor = 0.75 + unit.clamp(0.0, 1.0) * 0.5;
    #[allow(clippy::cast_precision_loss)]
    let seconds = nominal_ms as f64 * factor / 1000.0;
    Duration::from_secs_f64(seconds)
}
