//! Episode parameters: turn loop control.
//!
//! [`EpisodeParams`] groups the static parameters that bound the turn loop
//! in [`RunEpisodeUseCase`](crate::use_cases::run_episode::RunEpisodeUseCase)
//! and tune how its responses are judged.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tooltrial_domain::DEFAULT_PARTIAL_THRESHOLD;

/// Turn loop control parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeParams {
    /// Maximum model turns. Reaching it ends the episode without error.
    pub max_turns: usize,
    /// Absolute cap on executed tools; exceeding it terminates the episode.
    pub max_steps: usize,
    /// Untagged responses longer than this get quick no-action feedback.
    pub no_action_min_length: usize,
    /// Results returned per search query.
    pub search_top_k: usize,
    /// Timeout of a single provider request.
    pub request_timeout: Duration,
    /// Partial-success conditions needed out of four.
    pub partial_success_threshold: usize,
    /// Trailing executions that, all failed, terminate the episode.
    pub failure_window: usize,
    /// Trailing successful executions that, all one tool, terminate the
    /// episode.
    pub repeat_window: usize,
}

impl Default for EpisodeParams {
    fn default() -> Self {
        Self {
            max_turns: 20,
            max_steps: 15,
            no_action_min_length: 30,
            search_top_k: 5,
            request_timeout: Duration::from_secs(60),
            partial_success_threshold: DEFAULT_PARTIAL_THRESHOLD,
            failure_window: 5,
            repeat_window: 5,
        }
    }
}

impl EpisodeParams {
    // ==================== Builder Methods ====================

    pub fn with_max_turns(mut self, max: usize) -> Self {
        self.max_turns = max;
        self
    }

    pub fn with_max_steps(mut self, max: usize) -> Self {
        self.max_steps = max;
        self
    }

    pub fn with_no_action_min_length(mut self, len: usize) -> Self {
        self.no_action_min_length = len;
        self
    }

    pub fn with_search_top_k(mut self, k: usize) -> Self {
        self.search_top_k = k;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_partial_success_threshold(mut self, threshold: usize) -> Self {
        self.partial_success_threshold = threshold;
        self
    }
}
