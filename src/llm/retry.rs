//! Backoff helpers for provider requests.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use super::LlmError;

/// Parse Retry-After header value (seconds).
/// Returns duration to wait, or None if header is missing/invalid.
pub fn parse_retry_after(header_value: Option<&str>) -> Option<Duration> {
    let value = header_value?;
    value
        .trim()
        .parse::<u64>()
        .ok()
        .map(|secs| Duration::from_secs(secs.min(60)))
}

/// Calculate exponential backoff delay for a given attempt.
pub fn backoff_delay(attempt: u32, base_ms: u64) -> Duration {
    let delay_ms = base_ms.saturating_mul(2u64.saturating_pow(attempt));
    Duration::from_millis(delay_ms.min(60_000))
}

/// Run `op` until it succeeds, fails permanently, or runs out of retries.
///
/// Transient failures wait for the server's Retry-After hint when one was
/// given, otherwise for an exponential backoff.
pub async fn with_retry<T, F, Fut>(
    label: &str,
    max_retries: u32,
    base_ms: u64,
    mut op: F,
) -> Result<T, LlmError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, LlmError>>,
{
    let mut attempt = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_transient() && attempt < max_retries => {
                let wait = match &e {
                    LlmError::RateLimited {
                        retry_after_secs: Some(secs),
                    } => Duration::from_secs((*secs).min(60)),
                    _ => backoff_delay(attempt, base_ms),
                };
                warn!(
                    "{} request failed (attempt {}): {}, retrying in {:?}",
                    label,
                    attempt + 1,
                    e,
                    wait
                );
                tokio::time::sleep(wait).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
