//! Retry policy of the provider call layer.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Attempts, backoff and failover limits for one provider call.
///
/// The wait after failed attempt `n` (0-based) is
/// `min(max_delay, jitter * backoff_base^n)` with `jitter` drawn uniformly
/// from `[jitter_min, jitter_max)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Attempts per call, counting the first one. Failovers do not count.
    pub max_attempts: u32,
    pub max_delay: Duration,
    pub backoff_base: f64,
    pub jitter_min: f64,
    pub jitter_max: f64,
    /// Deployment switches allowed per call.
    pub max_failovers: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            max_delay: Duration::from_secs(10),
            backoff_base: 1.5,
            jitter_min: 0.5,
            jitter_max: 1.5,
            max_failovers: 3,
        }
    }
}

impl RetryPolicy {
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    pub fn with_max_failovers(mut self, failovers: u32) -> Self {
        self.max_failovers = failovers;
        self
    }

    /// Backoff before the retry that follows failed attempt `attempt`.
    pub fn backoff_delay(&self, attempt: u32, jitter: f64) -> Duration {
        let secs = jitter * self.backoff_base.powi(attempt as i32);
        // Overflowed or NaN waits collapse to the cap
        if !secs.is_finite() || secs >= self.max_delay.as_secs_f64() {
            return self.max_delay;
        }
        Duration::from_secs_f64(secs.max(0.0))
    }

    /// Draw a jitter factor for [`backoff_delay`](Self::backoff_delay).
    pub fn sample_jitter<R: rand::Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.jitter_max > self.jitter_min {
            rng.gen_range(self.jitter_min..self.jitter_max)
        } else {
            self.jitter_min
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_backoff_grows_and_caps() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff_delay(0, 1.0), Duration::from_secs(1));
        assert_eq!(policy.backoff_delay(2, 1.0), Duration::from_secs_f64(2.25));
        assert_eq!(policy.backoff_delay(10, 1.5), Duration::from_secs(10));
    }

    #[test]
    fn test_huge_base_caps_instead_of_overflowing() {
        let policy = RetryPolicy {
            backoff_base: 1e200,
            ..RetryPolicy::default()
        };
        assert_eq!(policy.backoff_delay(2, 1.0), Duration::from_secs(10));

        let policy = RetryPolicy {
            backoff_base: f64::INFINITY,
            ..RetryPolicy::default()
        };
        assert_eq!(policy.backoff_delay(0, 1.0), Duration::from_secs(10));
        assert_eq!(policy.backoff_delay(3, f64::NAN), Duration::from_secs(10));
    }

    #[test]
    fn test_jitter_within_bounds() {
        let policy = RetryPolicy::default();
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..100 {
            let j = policy.sample_jitter(&mut rng);
            assert!((0.5..1.5).contains(&j));
        }
    }
}
