//! Per-backend token-bucket rate limiter (spec §5 "Rate limiter"): caps
//! outbound translation requests to a configured rate, independent of the
//! orchestrator's own inter-batch pacing.

use parking_lot::Mutex;
use std::time::{Duration, Instant};

/// A simple token bucket: `capacity` tokens refilled continuously at
/// `refill_per_sec` tokens/second. `acquire` blocks (async) until a token
/// is available.
pub struct RateLimiter {
    state: Mutex<BucketState>,
    capacity: f64,
    refill_per_sec: f64,
}

struct BucketState {
    tokens: f64,
    last_refill: Instant,
}

impl RateLimiter {
    pub fn new(capacity: f64, refill_per_sec: f64) -> Self {
        Self {
            state: Mutex::new(BucketState { tokens: capacity, last_refill: Instant::now() }),
            capacity,
            refill_per_sec,
        }
    }

    /// An effectively unlimited limiter, used when the config specifies no
    /// rate cap for a backend.
    pub fn unlimited() -> Self {
        Self::new(f64::MAX, f64::MAX)
    }

    fn refill(&self, state: &mut BucketState) {
        let now = Instant::now();
        let elapsed = now.duration_since(state.last_refill).as_secs_f64();
        state.tokens = (state.tokens + elapsed * self.refill_per_sec).min(self.capacity);
        state.last_refill = now;
    }

    /// Time to wait before a single token would be available, or
    /// `Duration::ZERO` if one already is. Does not consume a token: call
    /// [`Self::acquire`] to both wait and consume.
    fn wait_for_token(&self) -> Duration {
        let mut state = self.state.lock();
        self.refill(&mut state);
        if state.tokens >= 1.0 {
            Duration::ZERO
        } else {
            let deficit = 1.0 - state.tokens;
            Duration::from_secs_f64(deficit / self.refill_per_sec)
        }
    }

    /// Wait for and consume one token.
    pub async fn acquire(&self) {
        loop {
            let wait = self.wait_for_token();
            if wait == Duration::ZERO {
                let mut state = self.state.lock();
                self.refill(&mut state);
                if state.tokens >= 1.0 {
                    state.tokens -= 1.0;
                    return;
                }
                continue;
            }
            tokio::time::sleep(wait).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_bucket_has_no_wait() {
        let limiter = RateLimiter::new(5.0, 1.0);
        assert_eq!(limiter.wait_for_token(), Duration::ZERO);
    }

    #[test]
    fn unlimited_never_waits() {
        let limiter = RateLimiter::unlimited();
        for _ in 0..1000 {
            assert_eq!(limiter.wait_for_token(), Duration::ZERO);
        }
    }

    #[tokio::test]
    async fn acquire_drains_bucket_then_waits() {
        let limiter = RateLimiter::new(1.0, 1000.0);
        limiter.acquire().await;
        let start = Instant::now();
        limiter.acquire().await;
        assert!(start.elapsed() < Duration::from_millis(50));
    }
}
