//! Application-level configuration.
//!
//! This module provides configuration types that control how use cases behave:
//!
//! - [`EpisodeParams`]: turn loop control (turns, steps, feedback thresholds)
//! - [`RetryPolicy`]: provider call attempts, backoff and failover limits

pub mod episode_params;
pub mod retry_policy;

pub use episode_params::EpisodeParams;
pub use retry_policy::RetryPolicy;
