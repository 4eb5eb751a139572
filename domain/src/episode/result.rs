//! Episode outcome handed back to the caller.

use super::conversation::TurnRecord;
use super::state::{ApiIssue, EpisodeState, SearchLogEntry};
use crate::evaluation::Verdict;
use crate::tool::ToolExecutionResult;
use serde::{Deserialize, Serialize};

/// Provider-side reason an episode ended early.
///
/// Episodes carrying one of these are graded `Failure` but never
/// attributed to the workflow itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The provider call timed out; never retried.
    Timeout,
    /// Every retry attempt failed.
    ApiExhausted,
    /// The provider answered with neither content nor reasoning text.
    EmptyResponse,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Timeout => "timeout",
            ErrorKind::ApiExhausted => "api_exhausted",
            ErrorKind::EmptyResponse => "empty_response",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why the turn loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    /// Completion signal with every required tool done
    Completed,
    /// `max_turns` reached; not an error by itself
    MaxTurnsReached,
    /// More tools executed than the absolute step cap allows
    StepLimitExceeded,
    /// The trailing executions all failed
    ConsecutiveFailures,
    /// The trailing successful executions were one tool repeated
    RepeatedTool,
    /// The provider call layer gave up
    ProviderFailure,
}

impl TerminationReason {
    /// Loop and overflow guards (fatal, but not provider errors).
    pub fn is_loop_or_overflow(&self) -> bool {
        matches!(
            self,
            TerminationReason::StepLimitExceeded
                | TerminationReason::ConsecutiveFailures
                | TerminationReason::RepeatedTool
        )
    }
}

/// Everything the batch harness needs about one finished episode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeResult {
    pub task_id: String,
    pub verdict: Verdict,
    pub diagnostic_message: String,
    pub executed_tools: Vec<String>,
    pub execution_history: Vec<ToolExecutionResult>,
    pub conversation_history: Vec<TurnRecord>,
    pub search_log: Vec<SearchLogEntry>,
    pub turns_used: usize,
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    pub termination: TerminationReason,
    pub format_error_count: usize,
    pub api_issue_log: Vec<ApiIssue>,
}

impl EpisodeResult {
    /// Consume the final state into a result.
    pub fn from_state(
        state: EpisodeState,
        verdict: Verdict,
        diagnostic_message: String,
        turns_used: usize,
        termination: TerminationReason,
        error_kind: Option<ErrorKind>,
    ) -> Self {
        Self {
            task_id: state.task_id().to_string(),
            verdict,
            diagnostic_message,
            executed_tools: state.executed_tools().to_vec(),
            execution_history: state.execution_history().to_vec(),
            conversation_history: state.conversation_history().to_vec(),
            search_log: state.search_log().to_vec(),
            turns_used,
            completed: state.is_completed(),
            error_kind,
            termination,
            format_error_count: state.format_error_count(),
            api_issue_log: state.api_issue_log().to_vec(),
        }
    }
}
