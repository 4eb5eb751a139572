//! Progress notification port for episodes
//!
//! Receives turn and state transitions while an episode runs. Every
//! callback has a no-op default so implementations pick what they display.

use tooltrial_domain::{ApiIssue, EpisodeResult, ToolExecutionResult, TurnState};

pub trait EpisodeProgressNotifier: Send + Sync {
    fn on_episode_start(&self, _task_id: &str, _max_turns: usize) {}

    fn on_turn_start(&self, _turn: usize) {}

    /// Called once per turn with the state the turn moved to.
    fn on_turn_state(&self, _turn: usize, _state: TurnState) {}

    fn on_tool_result(&self, _result: &ToolExecutionResult) {}

    fn on_api_issue(&self, _issue: &ApiIssue) {}

    fn on_episode_end(&self, _result: &EpisodeResult) {}
}

/// No-op progress notifier
pub struct NoEpisodeProgress;

impl EpisodeProgressNotifier for NoEpisodeProgress {}
