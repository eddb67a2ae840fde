//! Backoff computation for per-batch retries (spec §4.7: "exponential
//! backoff `0.5s * 2^k`, +/-20% jitter, capped at 32s").

use crate::config::RetryConfig;
use rand::Rng;
use std::time::Duration;

/// Compute the jittered backoff delay for retry attempt `attempt` (0 for
/// the first retry after an initial failure).
pub fn backoff_delay(config: &RetryConfig, attempt: u32) -> Duration {
    let raw = config.base_backoff_secs * 2f64.powi(attempt as i32);
    let capped = raw.min(config.max_backoff_secs);
    let jitter_span = capped * config.jitter_fraction;
    let jittered = if jitter_span > 0.0 {
        let mut rng = rand::rng();
        capped + rng.random_range(-jitter_span..=jitter_span)
    } else {
        capped
    };
    Duration::from_secs_f64(jittered.max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_grows_exponentially_before_the_cap() {
        let config = RetryConfig { max_retries: 5, base_backoff_secs: 0.5, jitter_fraction: 0.0, max_backoff_secs: 32.0 };
        assert_eq!(backoff_delay(&config, 0), Duration::from_secs_f64(0.5));
        assert_eq!(backoff_delay(&config, 1), Duration::from_secs_f64(1.0));
        assert_eq!(backoff_delay(&config, 2), Duration::from_secs_f64(2.0));
    }

    #[test]
    fn delay_is_capped() {
        let config = RetryConfig { max_retries: 10, base_backoff_secs: 0.5, jitter_fraction: 0.0, max_backoff_secs: 32.0 };
        assert_eq!(backoff_delay(&config, 20), Duration::from_secs_f64(32.0));
    }

    #[test]
    fn jitter_stays_within_twenty_percent() {
        let config = RetryConfig { max_retries: 5, base_backoff_secs: 1.0, jitter_fraction: 0.2, max_backoff_secs: 32.0 };
        for _ in 0..50 {
            let d = backoff_delay(&config, 0).as_secs_f64();
            assert!((0.8..=1.2).contains(&d), "delay {d} out of jitter range");
        }
    }
}
