//! Retry configuration from TOML (`[retry]` section)

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tooltrial_application::RetryPolicy;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRetryConfig {
    /// Requests per call before giving up, counting the first.
    pub max_attempts: Option<u32>,
    /// Backoff ceiling in seconds.
    pub max_delay_seconds: Option<u64>,
    pub backoff_base: Option<f64>,
    /// Deployment switches allowed per call.
    pub max_failovers: Option<u32>,
}

impl FileRetryConfig {
    pub fn apply(&self, base: RetryPolicy) -> RetryPolicy {
        let mut policy = base;
        if let Some(v) = self.max_attempts {
            policy = policy.with_max_attempts(v);
        }
        if let Some(v) = self.max_delay_seconds {
            policy = policy.with_max_delay(Duration::from_secs(v));
        }
        if let Some(v) = self.backoff_base {
            policy.backoff_base = v;
        }
        if let Some(v) = self.max_failovers {
            policy = policy.with_max_failovers(v);
        }
        policy
    }
}
