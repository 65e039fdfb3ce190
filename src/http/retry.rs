//! Retry policies for OMS requests.
//!
//! Every OMS endpoint is a POST, so idempotency is decided per operation:
//! queries (order book, holdings, search, ...) retry, while login and order
//! mutations never do. A duplicate `PlaceOrder` is a duplicate order.

use std::time::Duration;

/// Retry policy for one request.
#[derive(Debug, Clone, Default)]
pub enum RetryPolicy {
    /// Single attempt. Login and order mutations.
    #[default]
    None,
    /// Retry transport failures and 429/502/503/504 with jittered backoff.
    Idempotent,
    Custom(RetryConfig),
}

/// Backoff parameters for a retried request.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Retries after the initial attempt.
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    /// Multiplier applied to the delay after each retry.
    pub backoff_factor: f64,
    /// Spread each delay by up to ±25%.
    pub jitter: bool,
    pub retryable_statuses: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::idempotent()
    }
}

impl RetryConfig {
    pub fn idempotent() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(10),
            backoff_factor: 2.0,
            jitter: true,
            retryable_statuses: vec![429, 502, 503, 504],
        }
    }

    /// Delay before retry number `attempt` (0-indexed).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let base = self.initial_delay.as_millis() as f64
            * self.backoff_factor.powi(attempt as i32);
        let capped = base.min(self.max_delay.as_millis() as f64);

        let final_ms = if self.jitter {
            let spread = capped * 0.25;
            let offset = (rand::random::<f64>() - 0.5) * 2.0 * spread;
            (capped + offset).max(0.0)
        } else {
            capped
        };

        Duration::from_millis(final_ms as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(initial_ms: u64, max_ms: u64, factor: f64) -> RetryConfig {
        RetryConfig {
            max_retries: 5,
            initial_delay: Duration::from_millis(initial_ms),
            max_delay: Duration::from_millis(max_ms),
            backoff_factor: factor,
            jitter: false,
            retryable_statuses: vec![],
        }
    }

    #[test]
    fn test_default_policy_never_retries() {
        assert!(matches!(RetryPolicy::default(), RetryPolicy::None));
    }

    #[test]
    fn test_idempotent_statuses() {
        let config = RetryConfig::idempotent();
        for status in [429, 502, 503, 504] {
            assert!(config.retryable_statuses.contains(&status));
        }
        assert!(!config.retryable_statuses.contains(&500));
    }

    #[test]
    fn test_backoff_doubles() {
        let config = fixed(100, 10_000, 2.0);
        let delays: Vec<u128> = (0..3).map(|a| config.delay_for_attempt(a).as_millis()).collect();
        assert_eq!(delays, vec![100, 200, 400]);
    }

    #[test]
    fn test_backoff_is_capped() {
        assert_eq!(fixed(1000, 2000, 10.0).delay_for_attempt(3).as_millis(), 2000);
    }

    #[test]
    fn test_jitter_stays_within_quarter() {
        let mut config = fixed(1000, 10_000, 1.0);
        config.jitter = true;
        for _ in 0..50 {
            let ms = config.delay_for_attempt(0).as_millis();
            assert!((750..=1250).contains(&ms), "delay {} out of range", ms);
        }
    }
}
