//! Termination policy checked after every turn.

use crate::config::EpisodeParams;
use tooltrial_domain::{EpisodeState, TerminationReason};

/// Loop and overflow guards. `None` means the episode may continue.
pub fn check_termination(state: &EpisodeState, params: &EpisodeParams) -> Option<TerminationReason> {
    if state.current_step() > params.max_steps {
        return Some(TerminationReason::StepLimitExceeded);
    }

    let history = state.execution_history();
    if params.failure_window > 0
        && history.len() >= params.failure_window
        && history
            .iter()
            .rev()
            .take(params.failure_window)
            .all(|r| !r.success)
    {
        return Some(TerminationReason::ConsecutiveFailures);
    }

    let executed = state.executed_tools();
    if params.repeat_window > 0 && executed.len() >= params.repeat_window {
        let tail = &executed[executed.len() - params.repeat_window..];
        if tail.iter().all(|t| *t == tail[0]) {
            return Some(TerminationReason::RepeatedTool);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use tooltrial_domain::{
        ExecutionMetadata, TaskDefinition, TaskType, ToolCategory, ToolExecutionResult, ToolFailure,
    };

    fn state() -> EpisodeState {
        EpisodeState::new(&TaskDefinition::new(
            "t",
            TaskType::BasicTask,
            "",
            vec!["fetch".into(), "post".into()],
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

    fn fail(name: &str) -> ToolExecutionResult {
        ToolExecutionResult::failure(name, ToolFailure::new("E", "boom"), meta())
    }

    #[test]
    fn test_fresh_state_continues() {
        assert_eq!(check_termination(&state(), &EpisodeParams::default()), None);
    }

    #[test]
    fn test_step_limit_is_strictly_greater() {
        let params = EpisodeParams::default().with_max_steps(3);
        let mut s = state();
        for name in ["a", "b", "c"] {
            s.record_execution(ok(name));
        }
        assert_eq!(check_termination(&s, &params), None);
        s.record_execution(ok("d"));
        assert_eq!(
            check_termination(&s, &params),
            Some(TerminationReason::StepLimitExceeded)
        );
    }

    #[test]
    fn test_five_failures_in_a_row() {
        let mut s = state();
        s.record_execution(ok("fetch"));
        for _ in 0..4 {
            s.record_execution(fail("post"));
        }
        assert_eq!(check_termination(&s, &EpisodeParams::default()), None);
        s.record_execution(fail("post"));
        assert_eq!(
            check_termination(&s, &EpisodeParams::default()),
            Some(TerminationReason::ConsecutiveFailures)
        );
    }

    #[test]
    fn test_same_tool_five_times() {
        let mut s = state();
        for _ in 0..4 {
            s.record_execution(ok("fetch"));
        }
        s.record_execution(fail("post"));
        assert_eq!(check_termination(&s, &EpisodeParams::default()), None);
        s.record_execution(ok("fetch"));
        assert_eq!(
            check_termination(&s, &EpisodeParams::default()),
            Some(TerminationReason::RepeatedTool)
        );
    }
}
