use tokio::sync::Mutex;
use tokio::time::{self, Duration, Instant};

/// Enforces a minimum wall-clock gap between outbound calls to the taste
/// service, shared across every caller in the process.
///
/// The lock is held across the sleep so concurrent tasks serialize through
/// the gate; each task observes the true last dispatch time, and the
/// timestamp is updated after the wait, not before.
pub struct RateLimiter {
    min_interval: Duration,
    last_dispatch: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_dispatch: Mutex::new(None),
        }
    }

    /// Suspend until at least `min_interval` has elapsed since the previous
    /// return of this function, then record the new dispatch time.
    pub async fn wait_if_needed(&self) {
        let mut last = self.last_dispatch.lock().await;
        if let Some(prev) = *last {
            let elapsed = prev.elapsed();
            if elapsed < self.min_interval {
                time::sleep(self.min_interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_first_call_does_not_wait() {
        let limiter = RateLimiter::new(Duration::from_millis(100));
        let start = Instant::now();
        limiter.wait_if_needed().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_consecutive_calls_are_spaced() {
        let limiter = RateLimiter::new(Duration::from_millis(100));

        limiter.wait_if_needed().await;
        let first = Instant::now();
        limiter.wait_if_needed().await;
        let gap = first.elapsed();

        assert!(gap >= Duration::from_millis(100), "gap was {gap:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_elapsed_interval_passes_through() {
        let limiter = RateLimiter::new(Duration::from_millis(100));

        limiter.wait_if_needed().await;
        time::sleep(Duration::from_millis(250)).await;

        let before = Instant::now();
        limiter.wait_if_needed().await;
        assert_eq!(before.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gap_measured_from_last_dispatch() {
        let limiter = RateLimiter::new(Duration::from_millis(100));

        limiter.wait_if_needed().await;
        // Partial progress toward the interval; only the remainder is slept.
        time::sleep(Duration::from_millis(60)).await;

        let before = Instant::now();
        limiter.wait_if_needed().await;
        assert_eq!(before.elapsed(), Duration::from_millis(40));
    }
}
