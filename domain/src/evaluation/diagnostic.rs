//! Human-readable diagnostic message for a graded episode.

use super::evaluator::{required_subsequence, unmatched_required};
use super::verdict::Verdict;
use crate::episode::{EpisodeState, ErrorKind};
use crate::tool::ToolExecutionResult;

const DEPENDENCY_MARKERS: &[&str] = &[
    "depend",
    "prerequisite",
    "upstream",
    "not ready",
    "missing input",
    "requires",
];

const PARAMETER_MARKERS: &[&str] = &[
    "param",
    "invalid",
    "argument",
    "schema",
    "validation",
    "malformed",
];

/// How informative a tool failure is, most informative first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FailureClass {
    Timeout,
    Dependency,
    Parameter,
    Generic,
}

impl FailureClass {
    pub fn classify(result: &ToolExecutionResult) -> Option<Self> {
        let failure = result.error()?;
        if failure.is_timeout() {
            return Some(FailureClass::Timeout);
        }
        let text = format!("{} {}", failure.code, failure.description).to_lowercase();
        if DEPENDENCY_MARKERS.iter().any(|m| text.contains(m)) {
            Some(FailureClass::Dependency)
        } else if PARAMETER_MARKERS.iter().any(|m| text.contains(m)) {
            Some(FailureClass::Parameter)
        } else {
            Some(FailureClass::Generic)
        }
    }

    fn label(&self) -> &'static str {
        match self {
            FailureClass::Timeout => "Timeout",
            FailureClass::Dependency => "Dependency failure",
            FailureClass::Parameter => "Invalid parameters",
            FailureClass::Generic => "Tool failure",
        }
    }
}

/// The failure a reader should look at first.
///
/// Ties within a class go to the earliest failure.
pub fn most_informative_failure(
    history: &[ToolExecutionResult],
) -> Option<(FailureClass, &ToolExecutionResult)> {
    history
        .iter()
        .filter_map(|r| FailureClass::classify(r).map(|c| (c, r)))
        .min_by_key(|(c, _)| *c)
}

/// Build the one-paragraph diagnostic for a finished episode.
pub fn diagnostic_message(
    state: &EpisodeState,
    verdict: &Verdict,
    error_kind: Option<ErrorKind>,
) -> String {
    if let Some(kind) = error_kind {
        let detail = state
            .api_issue_log()
            .last()
            .map(|issue| format!(" at turn {}: {}", issue.turn, issue.detail))
            .unwrap_or_default();
        return format!(
            "Provider failure ({}){}. The episode ended early and is not attributed to the workflow.",
            kind, detail
        );
    }

    if verdict.is_full_success() {
        return format!(
            "All {} required tools executed successfully in order.",
            state.required_tools().len()
        );
    }

    if let Some((class, result)) = most_informative_failure(state.execution_history())
        && let Some(failure) = result.error()
    {
        return format!(
            "{}: '{}' failed with {}.",
            class.label(),
            result.tool_name,
            failure
        );
    }

    selection_mismatch(state)
}

fn selection_mismatch(state: &EpisodeState) -> String {
    let required = state.required_tools();
    let executed = state.executed_tools();

    if executed.is_empty() {
        return if state.format_error_count() > 0 {
            format!(
                "No tools were executed; {} malformed responses.",
                state.format_error_count()
            )
        } else {
            "No tools were executed.".to_string()
        };
    }

    let missing = unmatched_required(state);
    let mut unexpected: Vec<&str> = Vec::new();
    for tool in executed.iter().filter(|t| !required.contains(t)) {
        if !unexpected.contains(&tool.as_str()) {
            unexpected.push(tool);
        }
    }

    let mut parts = Vec::new();
    if !missing.is_empty() {
        parts.push(format!("Missing required tools: {}.", missing.join(", ")));
    }
    if !unexpected.is_empty() {
        parts.push(format!(
            "Tools outside the workflow: {}.",
            unexpected.join(", ")
        ));
    }
    if parts.is_empty() {
        let observed = required_subsequence(state);
        let problem = if observed.len() > required.len() {
            "Required tools repeated"
        } else {
            "Tools executed out of order"
        };
        parts.push(format!(
            "{}: expected {}, got {}.",
            problem,
            required.join(" -> "),
            observed.join(" -> ")
        ));
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::episode::{ApiIssue, ApiIssueKind};
    use crate::evaluation::SuccessEvaluator;
    use crate::task::{TaskDefinition, TaskType};
    use crate::tool::{ExecutionMetadata, ToolCategory, ToolFailure};

    fn state(required: &[&str]) -> EpisodeState {
        EpisodeState::new(&TaskDefinition::new(
            "t1",
            TaskType::BasicTask,
            "",
            required.iter().map(|s| s.to_string()).collect(),
        ))
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

    fn fail(name: &str, code: &str, desc: &str) -> ToolExecutionResult {
        ToolExecutionResult::failure(name, ToolFailure::new(code, desc), meta())
    }

    fn message(s: &EpisodeState) -> String {
        let verdict = SuccessEvaluator::new().evaluate(s);
        diagnostic_message(s, &verdict, None)
    }

    #[test]
    fn test_timeout_outranks_other_failures() {
        let mut s = state(&["a", "b", "c"]);
        s.record_execution(fail("a", "INVALID_INPUT", "Invalid input parameters"));
        s.record_execution(fail("b", "UPSTREAM", "Upstream dependency missing"));
        s.record_execution(fail("c", "NETWORK_TIMEOUT", "Request timed out (after 30s)"));
        let msg = message(&s);
        assert!(msg.starts_with("Timeout: 'c' failed with [NETWORK_TIMEOUT]"), "{msg}");
    }

    #[test]
    fn test_dependency_outranks_parameter() {
        let mut s = state(&["a", "b"]);
        s.record_execution(fail("a", "INVALID_INPUT", "Invalid input parameters"));
        s.record_execution(fail("b", "DEP_FAILED", "Prerequisite step did not complete"));
        assert!(message(&s).starts_with("Dependency failure: 'b'"));
    }

    #[test]
    fn test_generic_failure_reported() {
        let mut s = state(&["a"]);
        s.record_execution(fail("a", "EXECUTION_ERROR", "Tool execution failed unexpectedly"));
        assert!(message(&s).starts_with("Tool failure: 'a'"));
    }

    #[test]
    fn test_mismatch_lists_missing_and_unexpected() {
        let mut s = state(&["fetch", "validate", "post"]);
        s.record_execution(ok("fetch"));
        s.record_execution(ok("gzip"));
        s.record_execution(ok("gzip"));
        let msg = message(&s);
        assert!(msg.contains("Missing required tools: validate, post."));
        assert!(msg.contains("Tools outside the workflow: gzip."));
    }

    #[test]
    fn test_out_of_order_reported() {
        let mut s = state(&["fetch", "post"]);
        s.record_execution(ok("post"));
        s.record_execution(ok("fetch"));
        assert_eq!(
            message(&s),
            "Tools executed out of order: expected fetch -> post, got post -> fetch."
        );
    }

    #[test]
    fn test_extra_repeat_reported() {
        let mut s = state(&["fetch", "post"]);
        s.record_execution(ok("fetch"));
        s.record_execution(ok("fetch"));
        s.record_execution(ok("post"));
        assert_eq!(
            message(&s),
            "Required tools repeated: expected fetch -> post, got fetch -> fetch -> post."
        );
    }

    #[test]
    fn test_missing_repeat_of_required_tool_reported() {
        let mut s = state(&["fetch", "fetch", "post"]);
        s.record_execution(ok("fetch"));
        s.record_execution(ok("post"));
        assert_eq!(message(&s), "Missing required tools: fetch.");
    }

    #[test]
    fn test_nothing_executed() {
        let mut s = state(&["fetch"]);
        s.record_format_feedback("use the tags", 1);
        assert_eq!(message(&s), "No tools were executed; 1 malformed responses.");
    }

    #[test]
    fn test_provider_failure_message() {
        let mut s = state(&["fetch"]);
        s.record_api_issue(ApiIssue::new(ApiIssueKind::Timeout, 4, "request timed out"));
        let verdict = SuccessEvaluator::new().evaluate_provider_failure(&s, ErrorKind::Timeout);
        let msg = diagnostic_message(&s, &verdict, Some(ErrorKind::Timeout));
        assert!(msg.starts_with("Provider failure (timeout) at turn 4: request timed out."));
        assert!(msg.contains("not attributed"));
    }

    #[test]
    fn test_full_success_message() {
        let mut s = state(&["fetch", "post"]);
        s.record_execution(ok("fetch"));
        s.record_execution(ok("post"));
        assert_eq!(
            message(&s),
            "All 2 required tools executed successfully in order."
        );
    }
}
