//! Retry with exponential back-off and jitter for catalog API requests.
//!
//! [`retry_with_backoff`] wraps a fallible async request and retries it on
//! transient errors. Parse failures, 404s and other client errors are
//! returned immediately.

use std::future::Future;
use std::time::Duration;

use crate::error::ScraperError;

/// Upper bound for a single back-off sleep.
const MAX_DELAY_MS: u64 = 30_000;

/// Returns `true` for errors that are worth retrying after a back-off delay.
///
/// **Retriable:**
/// - [`ScraperError::RateLimited`]: HTTP 429.
/// - [`ScraperError::UnexpectedStatus`] with a 5xx status.
/// - [`ScraperError::Http`] timeouts, connection failures and 5xx statuses.
///
/// Everything else is a hard stop for this request.
pub(crate) fn is_retriable(err: &ScraperError) -> bool {
    match err {
        ScraperError::RateLimited { .. } => true,
        ScraperError::UnexpectedStatus { status, .. } => *status >= 500,
        ScraperError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        ScraperError::Deserialize { .. }
        | ScraperError::NotFound { .. }
        | ScraperError::InvalidBaseUrl { .. }
        | ScraperError::SinkClosed => false,
    }
}

/// Sleep before retry number `retry` (1-based): `base_ms * 2^(retry - 1)`,
/// capped at [`MAX_DELAY_MS`], then scaled by a random factor in
/// `[0.75, 1.25)`.
fn backoff_delay(retry: u32, base_ms: u64) -> Duration {
    let exponent = retry.saturating_sub(1).min(10);
    let nominal = base_ms.saturating_mul(1 << exponent).min(MAX_DELAY_MS);
    let jitter = rand::random_range(0.75..1.25);
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let millis = (nominal as f64 * jitter) as u64;
    Duration::from_millis(millis)
}

/// Sends `request` until it succeeds, fails with a non-retriable error, or
/// `max_retries` retries have been spent. With `max_retries = 3` the request
/// goes out at most four times.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut request: F,
) -> Result<T, ScraperError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScraperError>>,
{
    let mut retries = 0u32;
    loop {
        let err = match request().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        if retries == max_retries || !is_retriable(&err) {
            return Err(err);
        }
        retries += 1;

        let delay = backoff_delay(retries, backoff_base_ms);
        tracing::warn!(
            retry = retries,
            max_retries,
            delay = ?delay,
            error = %err,
            "catalog request failed, backing off"
        );
        tokio::time::sleep(delay).await;
    }
}
