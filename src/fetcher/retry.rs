use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::RetryConfig;
use crate::fetcher::{FetchError, FetchRequest, Fetcher};

/// Fetch with bounded retries and exponential backoff.
///
/// Only [`FetchError::is_retryable`] failures are retried; everything else is
/// returned after the first attempt. Cancellation is honored before each
/// attempt and while waiting between attempts.
pub async fn fetch_with_retry(
    fetcher: &(dyn Fetcher + Send + Sync),
    request: &FetchRequest,
    policy: &RetryConfig,
    cancel: &CancellationToken,
) -> Result<String, FetchError> {
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        if cancel.is_cancelled() {
            return Err(FetchError::Cancelled);
        }

        let error = match fetcher.fetch(request).await {
            Ok(body) => return Ok(body),
            Err(e) => e,
        };

        if !error.is_retryable() || attempt >= max_attempts {
            debug!(url = %request.url, attempt, error = %error, "Giving up on request");
            return Err(error);
        }

        let wait = policy.backoff(attempt);
        warn!(
            url = %request.url,
            attempt,
            max_attempts,
            error = %error,
            "Request failed, retrying in {:?}",
            wait
        );

        tokio::select! {
            _ = tokio::time::sleep(wait) => {},
            _ = cancel.cancelled() => return Err(FetchError::Cancelled),
        }

        attempt += 1;
    }
}
