//! Episode state: the turn-indexed record of one run of the turn loop.
//!
//! The state is owned by a single controller. History fields are
//! append-only and only reachable through the mutators below, which keeps
//! `executed_tools` an exact projection of the successful entries of
//! `execution_history`.

use super::conversation::{ChatMessage, Role, TurnRecord, TurnTag};
use crate::task::{TaskDefinition, TaskType};
use crate::tool::ToolExecutionResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Classified provider problem recorded in the issue log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiIssueKind {
    Timeout,
    RateLimited,
    DeploymentSwitched,
    InvalidRequest,
    Connection,
    EmptyResponse,
    RetriesExhausted,
    Other,
}

/// A provider failure observed during the episode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiIssue {
    pub kind: ApiIssueKind,
    pub turn: usize,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub detail: String,
}

impl ApiIssue {
    pub fn new(kind: ApiIssueKind, turn: usize, detail: impl Into<String>) -> Self {
        Self {
            kind,
            turn,
            timestamp: Utc::now(),
            detail: detail.into(),
        }
    }
}

/// A tool search performed by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchLogEntry {
    pub turn: usize,
    pub query: String,
    /// Tool names returned, best first
    pub results: Vec<String>,
}

/// Mutable state of one episode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeState {
    task_id: String,
    task_type: TaskType,
    required_tools: Vec<String>,
    executed_tools: Vec<String>,
    execution_history: Vec<ToolExecutionResult>,
    conversation_history: Vec<TurnRecord>,
    search_log: Vec<SearchLogEntry>,
    current_step: usize,
    format_error_count: usize,
    api_issue_log: Vec<ApiIssue>,
    completed: bool,
}

impl EpisodeState {
    pub fn new(task: &TaskDefinition) -> Self {
        Self {
            task_id: task.task_id.clone(),
            task_type: task.task_type.clone(),
            required_tools: task.required_tools.clone(),
            executed_tools: Vec::new(),
            execution_history: Vec::new(),
            conversation_history: Vec::new(),
            search_log: Vec::new(),
            current_step: 0,
            format_error_count: 0,
            api_issue_log: Vec::new(),
            completed: false,
        }
    }

    // ==================== Accessors ====================

    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    pub fn task_type(&self) -> &TaskType {
        &self.task_type
    }

    pub fn required_tools(&self) -> &[String] {
        &self.required_tools
    }

    pub fn executed_tools(&self) -> &[String] {
        &self.executed_tools
    }

    pub fn execution_history(&self) -> &[ToolExecutionResult] {
        &self.execution_history
    }

    pub fn conversation_history(&self) -> &[TurnRecord] {
        &self.conversation_history
    }

    pub fn search_log(&self) -> &[SearchLogEntry] {
        &self.search_log
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn format_error_count(&self) -> usize {
        self.format_error_count
    }

    pub fn api_issue_log(&self) -> &[ApiIssue] {
        &self.api_issue_log
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    // ==================== Mutators ====================

    /// Append a tool execution. Advances `current_step`; successful results
    /// are also projected into `executed_tools`.
    pub fn record_execution(&mut self, result: ToolExecutionResult) {
        if result.success {
            self.executed_tools.push(result.tool_name.clone());
        }
        self.execution_history.push(result);
        self.current_step += 1;
    }

    pub fn push_turn(&mut self, record: TurnRecord) {
        self.conversation_history.push(record);
    }

    /// Append a synthetic corrective message and count the format error.
    pub fn record_format_feedback(&mut self, content: impl Into<String>, turn: usize) {
        self.format_error_count += 1;
        self.push_turn(TurnRecord::new(Role::User, content, turn).with_tag(TurnTag::FormatFeedback));
    }

    pub fn record_search(&mut self, entry: SearchLogEntry) {
        self.search_log.push(entry);
    }

    pub fn record_api_issue(&mut self, issue: ApiIssue) {
        self.api_issue_log.push(issue);
    }

    pub fn mark_completed(&mut self) {
        self.completed = true;
    }

    // ==================== Queries ====================

    /// Whether anything has happened yet (model turns, tool runs, searches).
    ///
    /// The opening task prompt does not count.
    pub fn has_history(&self) -> bool {
        !self.execution_history.is_empty()
            || !self.search_log.is_empty()
            || self
                .conversation_history
                .iter()
                .any(|r| !r.has_tag(TurnTag::TaskPrompt))
    }

    pub fn has_succeeded(&self, tool: &str) -> bool {
        self.executed_tools.iter().any(|t| t == tool)
    }

    pub fn has_attempted(&self, tool: &str) -> bool {
        self.execution_history.iter().any(|r| r.tool_name == tool)
    }

    /// Every required tool appears among successful executions.
    pub fn all_required_succeeded(&self) -> bool {
        self.required_tools.iter().all(|t| self.has_succeeded(t))
    }

    /// Number of required tools that have not yet succeeded.
    pub fn pending_required_count(&self) -> usize {
        self.required_tools
            .iter()
            .filter(|t| !self.has_succeeded(t))
            .count()
    }

    /// Most recent execution of a tool, if any.
    pub fn last_execution_of(&self, tool: &str) -> Option<&ToolExecutionResult> {
        self.execution_history
            .iter()
            .rev()
            .find(|r| r.tool_name == tool)
    }

    /// How many times a tool has been executed so far.
    pub fn attempts_of(&self, tool: &str) -> usize {
        self.execution_history
            .iter()
            .filter(|r| r.tool_name == tool)
            .count()
    }

    /// Failures among the last `window` executions.
    pub fn recent_failures(&self, window: usize) -> usize {
        self.execution_history
            .iter()
            .rev()
            .take(window)
            .filter(|r| !r.success)
            .count()
    }

    /// Whether any model turn satisfies `predicate`.
    pub fn any_assistant_turn(&self, predicate: impl Fn(&str) -> bool) -> bool {
        self.conversation_history
            .iter()
            .filter(|r| r.role == Role::Assistant)
            .any(|r| predicate(&r.content))
    }

    /// Build the provider conversation: system prompt then every turn record.
    pub fn to_conversation(&self, system_prompt: &str) -> Vec<ChatMessage> {
        std::iter::once(ChatMessage::system(system_prompt))
            .chain(self.conversation_history.iter().map(TurnRecord::to_message))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::{ExecutionMetadata, ToolCategory, ToolFailure};

    fn task() -> TaskDefinition {
        TaskDefinition::new(
            "task-1",
            TaskType::BasicTask,
            "fetch then post",
            vec!["fetch".to_string(), "post".to_string()],
        )
    }

    fn meta() -> ExecutionMetadata {
        ExecutionMetadata {
            category: ToolCategory::Generic,
            attempt: 1,
        }
    }

    fn ok(name: &str) -> ToolExecutionResult {
        ToolExecutionResult::success(name, serde_json::json!({}), meta())
    }

    fn fail(name: &str) -> ToolExecutionResult {
        ToolExecutionResult::failure(name, ToolFailure::new("E", "boom"), meta())
    }

    #[test]
    fn test_new_state_is_zeroed() {
        let state = EpisodeState::new(&task());
        assert_eq!(state.current_step(), 0);
        assert_eq!(state.format_error_count(), 0);
        assert!(state.executed_tools().is_empty());
        assert!(!state.is_completed());
        assert!(!state.has_history());
    }

    #[test]
    fn test_executed_tools_projects_successes_in_order() {
        let mut state = EpisodeState::new(&task());
        state.record_execution(ok("fetch"));
        state.record_execution(fail("post"));
        state.record_execution(ok("post"));

        assert_eq!(state.executed_tools(), &["fetch", "post"]);
        assert_eq!(state.execution_history().len(), 3);
        assert_eq!(state.current_step(), 3);
        let successes: Vec<&str> = state
            .execution_history()
            .iter()
            .filter(|r| r.success)
            .map(|r| r.tool_name.as_str())
            .collect();
        assert_eq!(state.executed_tools(), successes.as_slice());
    }

    #[test]
    fn test_required_tracking() {
        let mut state = EpisodeState::new(&task());
        assert_eq!(state.pending_required_count(), 2);
        state.record_execution(ok("fetch"));
        assert!(!state.all_required_succeeded());
        state.record_execution(ok("post"));
        assert!(state.all_required_succeeded());
        assert_eq!(state.pending_required_count(), 0);
    }

    #[test]
    fn test_recent_failures_window() {
        let mut state = EpisodeState::new(&task());
        state.record_execution(fail("fetch"));
        state.record_execution(ok("fetch"));
        state.record_execution(fail("post"));
        state.record_execution(fail("post"));
        assert_eq!(state.recent_failures(3), 2);
        assert_eq!(state.recent_failures(10), 3);
        assert_eq!(state.attempts_of("post"), 2);
        assert!(!state.last_execution_of("post").unwrap().success);
    }

    #[test]
    fn test_format_feedback_counts_and_appends() {
        let mut state = EpisodeState::new(&task());
        state.record_format_feedback("use tags", 2);
        assert_eq!(state.format_error_count(), 1);
        let last = state.conversation_history().last().unwrap();
        assert_eq!(last.role, Role::User);
        assert!(last.has_tag(TurnTag::FormatFeedback));
    }

    #[test]
    fn test_task_prompt_is_not_history() {
        let mut state = EpisodeState::new(&task());
        state.push_turn(TurnRecord::new(Role::User, "task", 0).with_tag(TurnTag::TaskPrompt));
        assert!(!state.has_history());
        state.push_turn(TurnRecord::new(Role::Assistant, "hi", 1));
        assert!(state.has_history());
    }

    #[test]
    fn test_to_conversation_starts_with_system() {
        let mut state = EpisodeState::new(&task());
        state.push_turn(TurnRecord::new(Role::User, "task", 0));
        let conv = state.to_conversation("sys");
        assert_eq!(conv.len(), 2);
        assert_eq!(conv[0], ChatMessage::system("sys"));
        assert_eq!(conv[1].role, Role::User);
    }
}
