//! Simulator configuration from TOML (`[simulator]` section)

use serde::{Deserialize, Serialize};
use tooltrial_domain::DEFAULT_BASE_SUCCESS_RATE;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSimulatorConfig {
    /// Success probability before dependency and failure penalties.
    pub base_success_rate: f64,
    /// Fixed seed for reproducible runs. Unset draws one per run.
    pub seed: Option<u64>,
}

impl Default for FileSimulatorConfig {
    fn default() -> Self {
        Self {
            base_success_rate: DEFAULT_BASE_SUCCESS_RATE,
            seed: None,
        }
    }
}
