//! Retry with exponential backoff, composed explicitly by the clients.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tracing::warn;

pub const DEFAULT_ATTEMPTS: u32 = 3;
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);

/// Run `op` up to `attempts` times, sleeping `base_delay * 2^n` between
/// tries. The last error is returned once attempts are exhausted.
pub async fn with_retry<T, E, F, Fut>(
    attempts: u32,
    base_delay: Duration,
    mut op: F,
) -> Result<T, E>
where
    E: Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(error) => {
                attempt += 1;
                if attempt >= attempts {
                    return Err(error);
                }
                let delay = base_delay * 2u32.saturating_pow(attempt - 1);
                warn!(
                    attempt,
                    attempts,
                    delay_secs = delay.as_secs_f64(),
                    "attempt failed: {error}; retrying"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn first_success_needs_no_retry() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, &str> = with_retry(3, Duration::from_secs(1), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok(42) }
        })
        .await;
        assert_eq!(result, Ok(42));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn recovers_after_transient_failures() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, &str> = with_retry(3, Duration::from_secs(1), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err("transient")
                } else {
                    Ok(7)
                }
            }
        })
        .await;
        assert_eq!(result, Ok(7));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_the_configured_attempts() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, &str> = with_retry(3, Duration::from_secs(1), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err("down") }
        })
        .await;
        assert_eq!(result, Err("down"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn backoff_doubles_between_attempts() {
        let start = tokio::time::Instant::now();
        let _: Result<u32, &str> = with_retry(3, Duration::from_secs(1), || async { Err("down") }).await;
        // 1s after the first failure, 2s after the second.
        assert_eq!(start.elapsed(), Duration::from_secs(3));
    }
}
