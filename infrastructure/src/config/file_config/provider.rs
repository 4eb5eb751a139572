//! Provider configuration from TOML (`[provider]`, `[deployments]` and
//! `[rate_limit]` sections)

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// OpenAI-compatible endpoint settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    /// Base URL of the chat completions API.
    pub base_url: String,
    /// Environment variable holding the API key (default: "OPENAI_API_KEY").
    pub api_key_env: String,
    /// Logical model episodes are run against.
    pub model: String,
    /// Per-request timeout in seconds.
    pub timeout_seconds: u64,
    /// Sampling temperature sent with every request. Unset leaves the
    /// server default.
    pub temperature: Option<f32>,
}

impl Default for FileProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            model: "gpt-4o-mini".to_string(),
            timeout_seconds: 60,
            temperature: None,
        }
    }
}

impl FileProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Deployments serving each logical model, in failover order.
///
/// ```toml
/// [deployments]
/// gpt-4o = ["gpt-4o-east", "gpt-4o-west"]
/// ```
pub type FileDeploymentsConfig = BTreeMap<String, Vec<String>>;

/// Shared throttle settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRateLimitConfig {
    /// Requests per minute per model. Unset disables the throttle.
    pub requests_per_minute: Option<u32>,
}
