//! Episode configuration from TOML (`[episode]` section)

use serde::{Deserialize, Serialize};
use tooltrial_application::EpisodeParams;

/// Turn loop limits. Unset keys keep the engine defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileEpisodeConfig {
    pub max_turns: Option<usize>,
    pub max_steps: Option<usize>,
    pub no_action_min_length: Option<usize>,
    pub search_top_k: Option<usize>,
    pub partial_success_threshold: Option<usize>,
}

impl FileEpisodeConfig {
    /// Apply the configured values on top of `base`.
    pub fn apply(&self, base: EpisodeParams) -> EpisodeParams {
        let mut params = base;
        if let Some(v) = self.max_turns {
            params = params.with_max_turns(v);
        }
        if let Some(v) = self.max_steps {
            params = params.with_max_steps(v);
        }
        if let Some(v) = self.no_action_min_length {
            params = params.with_no_action_min_length(v);
        }
        if let Some(v) = self.search_top_k {
            params = params.with_search_top_k(v);
        }
        if let Some(v) = self.partial_success_threshold {
            params = params.with_partial_success_threshold(v);
        }
        params
    }
}
