//! Minimum-interval rate limiting for generation requests.
//!
//! A token bucket of capacity 1 backed by the monotonic tokio clock:
//! one token refills every `min_interval`. [`RateLimiter::acquire`]
//! sleeps the remainder when called early, so requests that hold the
//! single-flight lock are spaced at least `min_interval` apart.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

pub struct RateLimiter {
    min_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl RateLimiter {
    #[must_use]
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: Mutex::new(None),
        }
    }

    /// Waits until the minimum interval since the previous acquisition
    /// has elapsed, then records this acquisition.
    pub async fn acquire(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                let remaining = self.min_interval - elapsed;
                tracing::debug!(?remaining, "rate limiter sleeping");
                tokio::time::sleep(remaining).await;
            }
        }
        *last = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn first_acquire_does_not_wait() {
        let limiter = RateLimiter::new(Duration::from_millis(2000));
        let start = Instant::now();
        limiter.acquire().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn second_acquire_waits_the_remainder() {
        let limiter = RateLimiter::new(Duration::from_millis(2000));
        limiter.acquire().await;
        tokio::time::advance(Duration::from_millis(500)).await;

        let start = Instant::now();
        limiter.acquire().await;
        // 1500 ms remained of the 2000 ms interval.
        assert_eq!(start.elapsed(), Duration::from_millis(1500));
    }

    #[tokio::test(start_paused = true)]
    async fn acquire_after_interval_is_immediate() {
        let limiter = RateLimiter::new(Duration::from_millis(2000));
        limiter.acquire().await;
        tokio::time::advance(Duration::from_millis(2500)).await;

        let start = Instant::now();
        limiter.acquire().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}
