//! Aggregate statistics over a suite run

use serde::Serialize;
use tooltrial_domain::{EpisodeResult, VerdictKind};

/// What happened to one task of a suite.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EpisodeOutcome {
    /// The episode ran and was graded
    Finished(EpisodeResult),
    /// The episode never produced a result (invalid task, cancellation)
    NotRun { task_id: String, reason: String },
}

impl EpisodeOutcome {
    pub fn task_id(&self) -> &str {
        match self {
            EpisodeOutcome::Finished(result) => &result.task_id,
            EpisodeOutcome::NotRun { task_id, .. } => task_id,
        }
    }

    pub fn result(&self) -> Option<&EpisodeResult> {
        match self {
            EpisodeOutcome::Finished(result) => Some(result),
            EpisodeOutcome::NotRun { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SuiteSummary {
    pub total: usize,
    pub full_success: usize,
    pub partial_success: usize,
    pub failure: usize,
    /// Failures caused by the provider, excluded from the success rate
    pub provider_failures: usize,
    /// Episodes stopped by the step cap, a failure streak or a repeated tool
    pub loop_terminations: usize,
    pub not_run: usize,
    pub format_errors: usize,
    pub mean_coverage: f64,
    pub mean_turns: f64,
}

impl SuiteSummary {
    pub fn from_outcomes(outcomes: &[EpisodeOutcome]) -> Self {
        let mut summary = SuiteSummary {
            total: outcomes.len(),
            ..Default::default()
        };

        let results: Vec<&EpisodeResult> = outcomes.iter().filter_map(|o| o.result()).collect();
        summary.not_run = outcomes.len() - results.len();

        for result in &results {
            match result.verdict.kind {
                VerdictKind::FullSuccess => summary.full_success += 1,
                VerdictKind::PartialSuccess => summary.partial_success += 1,
                VerdictKind::Failure => summary.failure += 1,
            }
            if !result.verdict.workflow_attributable {
                summary.provider_failures += 1;
            }
            if result.termination.is_loop_or_overflow() {
                summary.loop_terminations += 1;
            }
            summary.format_errors += result.format_error_count;
        }

        if !results.is_empty() {
            let n = results.len() as f64;
            summary.mean_coverage = results.iter().map(|r| r.verdict.coverage).sum::<f64>() / n;
            summary.mean_turns = results.iter().map(|r| r.turns_used as f64).sum::<f64>() / n;
        }
        summary
    }

    /// Episodes the workflow can be judged on.
    pub fn attributable(&self) -> usize {
        self.full_success + self.partial_success + self.failure - self.provider_failures
    }

    /// FullSuccess share of attributable episodes; `None` when there are none.
    pub fn full_success_rate(&self) -> Option<f64> {
        match self.attributable() {
            0 => None,
            n => Some(self.full_success as f64 / n as f64),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tooltrial_domain::{
        EpisodeState, ErrorKind, SuccessEvaluator, TaskDefinition, TaskType, TerminationReason,
    };

    fn result(
        task_id: &str,
        kind: VerdictKind,
        attributable: bool,
        termination: TerminationReason,
    ) -> EpisodeResult {
        let state = EpisodeState::new(&TaskDefinition::new(
            task_id,
            TaskType::BasicTask,
            "",
            vec!["fetch".to_string()],
        ));
        let mut verdict = SuccessEvaluator::new().evaluate(&state);
        verdict.kind = kind;
        verdict.workflow_attributable = attributable;
        verdict.coverage = if kind == VerdictKind::FullSuccess { 1.0 } else { 0.0 };
        let error_kind = (!attributable).then_some(ErrorKind::Timeout);
        EpisodeResult::from_state(state, verdict, String::new(), 4, termination, error_kind)
    }

    #[test]
    fn test_summary_counts_and_means() {
        let outcomes = vec![
            EpisodeOutcome::Finished(result(
                "a",
                VerdictKind::FullSuccess,
                true,
                TerminationReason::Completed,
            )),
            EpisodeOutcome::Finished(result(
                "b",
                VerdictKind::Failure,
                false,
                TerminationReason::ProviderFailure,
            )),
            EpisodeOutcome::Finished(result(
                "c",
                VerdictKind::Failure,
                true,
                TerminationReason::RepeatedTool,
            )),
            EpisodeOutcome::NotRun {
                task_id: "d".to_string(),
                reason: "cancelled".to_string(),
            },
        ];
        let summary = SuiteSummary::from_outcomes(&outcomes);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.full_success, 1);
        assert_eq!(summary.failure, 2);
        assert_eq!(summary.provider_failures, 1);
        assert_eq!(summary.loop_terminations, 1);
        assert_eq!(summary.not_run, 1);
        assert_eq!(summary.attributable(), 2);
        assert_eq!(summary.full_success_rate(), Some(0.5));
        assert!((summary.mean_coverage - 1.0 / 3.0).abs() < 1e-9);
        assert_eq!(summary.mean_turns, 4.0);
    }

    #[test]
    fn test_empty_suite_has_no_rate() {
        let summary = SuiteSummary::from_outcomes(&[]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.full_success_rate(), None);
    }

    #[test]
    fn test_outcome_serializes_with_status_tag() {
        let outcome = EpisodeOutcome::NotRun {
            task_id: "t9".to_string(),
            reason: "Operation cancelled".to_string(),
        };
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["status"], "not_run");
        assert_eq!(value["task_id"], "t9");
    }
}
