use std::future::Future;
use std::time::Duration;

/// Linear-backoff retry for calls that may be rate-limited upstream.
///
/// The first attempt runs immediately; each retry `n` (1-based) waits
/// `base_delay * n` first. Only errors the classifier marks as rate limits
/// are retried; anything else surfaces immediately.
#[derive(Clone, Debug)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
}

#[derive(Debug, thiserror::Error)]
pub enum RetryError<E: std::error::Error> {
    #[error("service unavailable after {attempts} retries")]
    Unavailable { attempts: u32 },
    #[error(transparent)]
    Inner(E),
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    pub async fn execute<T, E, F, Fut, P>(&self, mut operation: F, is_rate_limited: P) -> Result<T, RetryError<E>>
    where
        E: std::error::Error,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        P: Fn(&E) -> bool,
    {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if !is_rate_limited(&e) => return Err(RetryError::Inner(e)),
            Err(e) => debug!("rate limited, will retry: {}", e),
        }

        for attempt in 1..=self.max_attempts {
            tokio::time::sleep(self.base_delay * attempt).await;

            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) if !is_rate_limited(&e) => return Err(RetryError::Inner(e)),
                Err(e) => warn!("rate limited on retry {}/{}: {}", attempt, self.max_attempts, e),
            }
        }

        Err(RetryError::Unavailable {
            attempts: self.max_attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Instant;

    #[derive(Debug, thiserror::Error)]
    enum FakeError {
        #[error("rate limited")]
        RateLimited,
        #[error("boom")]
        Fatal,
    }

    fn is_rate_limited(e: &FakeError) -> bool {
        matches!(e, FakeError::RateLimited)
    }

    #[tokio::test]
    async fn test_succeeds_on_third_attempt_with_linear_backoff() {
        let policy = RetryPolicy::new(3, Duration::from_millis(20));
        let calls = AtomicU32::new(0);

        let started = Instant::now();
        let result = policy
            .execute(
                || async {
                    let n = calls.fetch_add(1, Ordering::SeqCst);
                    if n < 2 {
                        Err(FakeError::RateLimited)
                    } else {
                        Ok(n)
                    }
                },
                is_rate_limited,
            )
            .await;

        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        // two retries: base*1 + base*2 = 60ms cumulative wait
        assert!(started.elapsed() >= Duration::from_millis(60));
    }

    #[tokio::test]
    async fn test_exhausting_attempts_is_terminal() {
        let policy = RetryPolicy::new(3, Duration::from_millis(1));
        let calls = AtomicU32::new(0);

        let result: Result<(), _> = policy
            .execute(
                || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err(FakeError::RateLimited)
                },
                is_rate_limited,
            )
            .await;

        assert!(matches!(result, Err(RetryError::Unavailable { attempts: 3 })));
        // initial attempt + 3 retries, nothing more
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_non_rate_limit_error_does_not_retry() {
        let policy = RetryPolicy::new(3, Duration::from_millis(1));
        let calls = AtomicU32::new(0);

        let result: Result<(), _> = policy
            .execute(
                || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err(FakeError::Fatal)
                },
                is_rate_limited,
            )
            .await;

        assert!(matches!(result, Err(RetryError::Inner(FakeError::Fatal))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
