//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into application types
//! ([`EpisodeParams`], [`RetryPolicy`]) after validation.

mod episode;
mod output;
mod provider;
mod retry;
mod simulator;

pub use episode::FileEpisodeConfig;
pub use output::FileOutputConfig;
pub use provider::{FileDeploymentsConfig, FileProviderConfig, FileRateLimitConfig};
pub use retry::FileRetryConfig;
pub use simulator::FileSimulatorConfig;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tooltrial_application::{EpisodeParams, RetryPolicy};

/// Configuration validation errors
#[derive(Debug, Error, PartialEq)]
pub enum ConfigValidationError {
    #[error("provider.timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("provider.model cannot be empty")]
    EmptyModelName,

    #[error("provider.base_url cannot be empty")]
    EmptyBaseUrl,

    #[error("deployments.{0} must list at least one deployment")]
    EmptyDeploymentList(String),

    #[error("{0} must be greater than 0")]
    ZeroLimit(&'static str),

    #[error("simulator.base_success_rate must be within [0, 1], got {0}")]
    InvalidSuccessRate(f64),

    #[error("retry.backoff_base must be a finite number of at least 1.0, got {0}")]
    InvalidBackoffBase(f64),

    #[error("provider.temperature must be between 0.0 and 2.0, got {0}")]
    InvalidTemperature(f32),
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// OpenAI-compatible endpoint
    pub provider: FileProviderConfig,
    /// Logical model → deployments in failover order
    pub deployments: FileDeploymentsConfig,
    /// Shared request throttle
    pub rate_limit: FileRateLimitConfig,
    /// Turn loop limits
    pub episode: FileEpisodeConfig,
    /// Provider retry and failover
    pub retry: FileRetryConfig,
    /// Tool simulator
    pub simulator: FileSimulatorConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the entire configuration, stopping at the first problem.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.provider.timeout_seconds == 0 {
            return Err(ConfigValidationError::InvalidTimeout);
        }
        if let Some(t) = self.provider.temperature
            && !(0.0..=2.0).contains(&t)
        {
            return Err(ConfigValidationError::InvalidTemperature(t));
        }
        if self.provider.model.trim().is_empty() {
            return Err(ConfigValidationError::EmptyModelName);
        }
        if self.provider.base_url.trim().is_empty() {
            return Err(ConfigValidationError::EmptyBaseUrl);
        }
        if let Some((model, _)) = self.deployments.iter().find(|(_, d)| d.is_empty()) {
            return Err(ConfigValidationError::EmptyDeploymentList(model.clone()));
        }

        let limits = [
            (
                "rate_limit.requests_per_minute",
                self.rate_limit.requests_per_minute.map(|v| v as usize),
            ),
            ("episode.max_turns", self.episode.max_turns),
            ("episode.max_steps", self.episode.max_steps),
            ("episode.search_top_k", self.episode.search_top_k),
            ("retry.max_attempts", self.retry.max_attempts.map(|v| v as usize)),
        ];
        if let Some((field, _)) = limits.iter().find(|(_, v)| *v == Some(0)) {
            return Err(ConfigValidationError::ZeroLimit(*field));
        }

        let rate = self.simulator.base_success_rate;
        if !(0.0..=1.0).contains(&rate) {
            return Err(ConfigValidationError::InvalidSuccessRate(rate));
        }
        if let Some(base) = self.retry.backoff_base
            && (!base.is_finite() || base < 1.0)
        {
            return Err(ConfigValidationError::InvalidBackoffBase(base));
        }
        Ok(())
    }

    /// Episode limits with the provider timeout folded in.
    pub fn episode_params(&self) -> EpisodeParams {
        self.episode
            .apply(EpisodeParams::default())
            .with_request_timeout(self.provider.timeout())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry.apply(RetryPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[provider]
base_url = "https://llm.internal/v1"
api_key_env = "LLM_KEY"
model = "gpt-4o"
timeout_seconds = 30

[deployments]
gpt-4o = ["gpt-4o-east", "gpt-4o-west"]

[rate_limit]
requests_per_minute = 60

[episode]
max_turns = 12
max_steps = 10

[retry]
max_attempts = 4

[simulator]
base_success_rate = 0.9
seed = 42

[output]
color = false
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.provider.api_key_env, "LLM_KEY");
        assert_eq!(config.deployments.len(), 1);
        assert_eq!(config.simulator.seed, Some(42));
        assert!(config.validate().is_ok());

        let params = config.episode_params();
        assert_eq!(params.max_turns, 12);
        assert_eq!(params.max_steps, 10);
        assert_eq!(params.request_timeout, Duration::from_secs(30));
        assert_eq!(config.retry_policy().max_attempts, 4);
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config: FileConfig = toml::from_str("[simulator]\nseed = 7\n").unwrap();
        assert_eq!(config.simulator.seed, Some(7));
        // Defaults should apply
        assert_eq!(config.provider, FileProviderConfig::default());
        assert_eq!(config.simulator.base_success_rate, 0.8);
        assert!(config.output.color);
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = FileConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.episode_params().max_turns, 20);
        assert_eq!(config.retry_policy().max_attempts, 5);
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = FileConfig::default();
        config.provider.timeout_seconds = 0;
        assert_eq!(config.validate(), Err(ConfigValidationError::InvalidTimeout));
    }

    #[test]
    fn test_validate_rejects_empty_model() {
        let mut config = FileConfig::default();
        config.provider.model = "  ".to_string();
        assert_eq!(config.validate(), Err(ConfigValidationError::EmptyModelName));
    }

    #[test]
    fn test_validate_rejects_empty_deployment_list() {
        let mut config = FileConfig::default();
        config.deployments.insert("gpt-4o".to_string(), Vec::new());
        assert_eq!(
            config.validate(),
            Err(ConfigValidationError::EmptyDeploymentList("gpt-4o".to_string()))
        );
    }

    #[test]
    fn test_validate_rejects_zero_limits() {
        let mut config = FileConfig::default();
        config.episode.max_turns = Some(0);
        assert_eq!(
            config.validate(),
            Err(ConfigValidationError::ZeroLimit("episode.max_turns"))
        );

        let mut config = FileConfig::default();
        config.rate_limit.requests_per_minute = Some(0);
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::ZeroLimit("rate_limit.requests_per_minute"))
        ));
    }

    #[test]
    fn test_validate_rejects_out_of_range_rate() {
        let mut config = FileConfig::default();
        config.simulator.base_success_rate = 1.5;
        assert_eq!(
            config.validate(),
            Err(ConfigValidationError::InvalidSuccessRate(1.5))
        );

        let mut config = FileConfig::default();
        config.retry.backoff_base = Some(0.5);
        assert_eq!(
            config.validate(),
            Err(ConfigValidationError::InvalidBackoffBase(0.5))
        );
    }

    #[test]
    fn test_validate_rejects_infinite_backoff_base() {
        let mut config = FileConfig::default();
        config.retry.backoff_base = Some(f64::INFINITY);
        assert_eq!(
            config.validate(),
            Err(ConfigValidationError::InvalidBackoffBase(f64::INFINITY))
        );

        config.retry.backoff_base = Some(f64::NAN);
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::InvalidBackoffBase(b)) if b.is_nan()
        ));

        // Large but finite bases are capped by max_delay at backoff time
        config.retry.backoff_base = Some(1e200);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range_temperature() {
        let mut config = FileConfig::default();
        config.provider.temperature = Some(2.5);
        assert_eq!(
            config.validate(),
            Err(ConfigValidationError::InvalidTemperature(2.5))
        );

        config.provider.temperature = Some(0.7);
        assert!(config.validate().is_ok());
    }
}
