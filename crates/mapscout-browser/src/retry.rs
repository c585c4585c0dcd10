//! Retry with exponential backoff for transient browser failures.
//!
//! Navigation timeouts against a live site are transient more often than
//! not; protocol and launch failures are not worth retrying. The caller
//! supplies the retriability predicate so each layer can classify its own
//! error type.

use std::future::Future;
use std::time::Duration;

/// Executes `operation` with exponential backoff retries on errors that
/// `is_retriable` accepts.
///
/// On success the result is returned immediately. On a retriable error the
/// function sleeps for `backoff_base_secs * 2^attempt` seconds and tries
/// again, up to `max_retries` additional attempts after the first try. If
/// all retries are exhausted the last error is returned. Non-retriable
/// errors are returned immediately without sleeping.
///
/// With `max_retries = 1` the operation is attempted at most twice.
pub async fn retry_with_backoff<T, E, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    is_retriable: impl Fn(&E) -> bool,
    mut operation: F,
) -> Result<T, E>
where
    E: std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut last_err;
    let mut attempt = 0u32;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                last_err = err;
            }
        }

        // Exponential backoff: base * 2^attempt seconds, capped against overflow.
        let delay_secs = backoff_base_secs.saturating_mul(1u64 << attempt.min(62));
        tracing::warn!(
            attempt,
            max_retries,
            delay_secs,
            error = %last_err,
            "transient browser error — retrying after backoff"
        );
        tokio::time::sleep(Duration::from_secs(delay_secs)).await;
        attempt += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use crate::error::DriverError;

    fn nav_error() -> DriverError {
        DriverError::Navigation {
            url: "https://example.com/place".to_owned(),
            reason: "no load event within 1s".to_owned(),
        }
    }

    fn retriable(err: &DriverError) -> bool {
        matches!(
            err,
            DriverError::Navigation { .. } | DriverError::WaitTimeout { .. }
        )
    }

    #[tokio::test]
    async fn succeeds_immediately_on_first_try() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_backoff(3, 0, retriable, || {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                Ok::<u32, DriverError>(42)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_on_navigation_error_then_succeeds() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_backoff(3, 0, retriable, || {
            let cc = Arc::clone(&cc);
            async move {
                let n = cc.fetch_add(1, Ordering::SeqCst);
                if n < 2 {
                    Err(nav_error())
                } else {
                    Ok::<u32, DriverError>(99)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 99);
        assert_eq!(call_count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn propagates_last_error_after_exhausting_retries() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_backoff(2, 0, retriable, || {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                Err::<u32, DriverError>(nav_error())
            }
        })
        .await;
        // max_retries=2 → 3 total attempts
        assert_eq!(call_count.load(Ordering::SeqCst), 3);
        assert!(matches!(result, Err(DriverError::Navigation { .. })));
    }

    #[tokio::test]
    async fn does_not_retry_non_retriable_error() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_backoff(3, 0, retriable, || {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                Err::<u32, DriverError>(DriverError::Launch("no executable".to_owned()))
            }
        })
        .await;
        // Tried exactly once — launch failures are not transient.
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
        assert!(matches!(result, Err(DriverError::Launch(_))));
    }
}
