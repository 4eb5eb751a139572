//! Success evaluator.
//!
//! Grades an episode from its final [`EpisodeState`] alone:
//!
//! 1. **FullSuccess**: every required tool succeeded and the successful
//!    sequence, restricted to required tools, is exactly `required_tools`.
//! 2. **PartialSuccess**: at least `partial_threshold` of four softer
//!    conditions hold (coverage, output artifact, execution count,
//!    completion signal).
//! 3. **Failure** otherwise, with one reason per unmet condition.

use super::verdict::{Verdict, VerdictKind};
use crate::action::is_completion_signal;
use crate::episode::{EpisodeState, ErrorKind};
use std::collections::HashMap;

/// Name fragments of tools that produce a deliverable.
pub const OUTPUT_KEYWORDS: &[&str] = &[
    "writer",
    "export",
    "save",
    "output",
    "post",
    "publish",
    "store",
    "emit",
    "notify",
    "report",
    "generate",
    "filter",
    "aggregator",
    "compressor",
];

/// Minimum coverage counted as a partial-success condition.
pub const PARTIAL_COVERAGE: f64 = 0.6;

/// Conditions needed for PartialSuccess by default.
pub const DEFAULT_PARTIAL_THRESHOLD: usize = 2;

/// Whether a tool name marks an output-producing tool.
pub fn is_output_tool(name: &str) -> bool {
    let lower = name.to_lowercase();
    OUTPUT_KEYWORDS.iter().any(|k| lower.contains(k))
}

#[derive(Debug, Clone, Copy)]
pub struct SuccessEvaluator {
    partial_threshold: usize,
}

impl Default for SuccessEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl SuccessEvaluator {
    pub fn new() -> Self {
        Self {
            partial_threshold: DEFAULT_PARTIAL_THRESHOLD,
        }
    }

    pub fn with_partial_threshold(mut self, threshold: usize) -> Self {
        self.partial_threshold = threshold;
        self
    }

    /// Grade a normally finished episode.
    pub fn evaluate(&self, state: &EpisodeState) -> Verdict {
        let m = Measurements::from_state(state);

        if !state.required_tools().is_empty() && m.coverage >= 1.0 && m.sequence_correct {
            return m.into_verdict(VerdictKind::FullSuccess, Vec::new(), true);
        }

        let mut reasons = Vec::new();
        if !state.required_tools().is_empty() {
            if m.coverage < 1.0 {
                reasons.push(format!(
                    "{} of {} required tools succeeded",
                    m.covered,
                    m.required_total
                ));
            } else {
                reasons.push("required tools succeeded out of order or repeated".to_string());
            }
        }
        if m.coverage < PARTIAL_COVERAGE {
            reasons.push(format!(
                "coverage {:.0}% below {:.0}%",
                m.coverage * 100.0,
                PARTIAL_COVERAGE * 100.0
            ));
        }
        if !m.has_output_artifact {
            reasons.push("no output-producing tool succeeded".to_string());
        }
        if !m.enough_executions {
            reasons.push(format!(
                "{} successful executions, {} needs {}",
                m.successful_executions,
                state.task_type(),
                state.task_type().min_successful_executions()
            ));
        }
        if !m.completion_signaled {
            reasons.push("no completion signal".to_string());
        }

        let kind = if m.conditions_met() >= self.partial_threshold {
            VerdictKind::PartialSuccess
        } else {
            VerdictKind::Failure
        };
        m.into_verdict(kind, reasons, true)
    }

    /// Grade an episode that a provider failure cut short.
    ///
    /// Always `Failure`, never attributed to the workflow. Measurements are
    /// still filled in for reporting.
    pub fn evaluate_provider_failure(&self, state: &EpisodeState, kind: ErrorKind) -> Verdict {
        let m = Measurements::from_state(state);
        let reasons = vec![format!(
            "provider failure ({}) ended the episode after {} tool executions",
            kind,
            state.current_step()
        )];
        m.into_verdict(VerdictKind::Failure, reasons, false)
    }
}

struct Measurements {
    coverage: f64,
    covered: usize,
    required_total: usize,
    sequence_correct: bool,
    has_output_artifact: bool,
    successful_executions: usize,
    enough_executions: bool,
    completion_signaled: bool,
}

impl Measurements {
    fn from_state(state: &EpisodeState) -> Self {
        let required = state.required_tools();
        let executed = state.executed_tools();

        let covered = required.len() - unmatched_required(state).len();
        let coverage = if required.is_empty() {
            0.0
        } else {
            covered as f64 / required.len() as f64
        };

        let successful_executions = executed.len();
        Self {
            coverage,
            covered,
            required_total: required.len(),
            sequence_correct: sequence_correct(state),
            has_output_artifact: executed.iter().any(|t| is_output_tool(t)),
            successful_executions,
            enough_executions: successful_executions
                >= state.task_type().min_successful_executions(),
            completion_signaled: state.any_assistant_turn(is_completion_signal),
        }
    }

    fn conditions_met(&self) -> usize {
        [
            self.coverage >= PARTIAL_COVERAGE,
            self.has_output_artifact,
            self.enough_executions,
            self.completion_signaled,
        ]
        .into_iter()
        .filter(|c| *c)
        .count()
    }

    fn into_verdict(self, kind: VerdictKind, reasons: Vec<String>, attributable: bool) -> Verdict {
        Verdict {
            kind,
            conditions_met: self.conditions_met(),
            coverage: self.coverage,
            sequence_correct: self.sequence_correct,
            has_output_artifact: self.has_output_artifact,
            successful_executions: self.successful_executions,
            completion_signaled: self.completion_signaled,
            reasons,
            workflow_attributable: attributable,
        }
    }
}

/// Required entries with no matching successful execution.
///
/// Each entry of `required_tools` consumes one success of that tool, so a
/// tool listed twice needs two successes.
pub(crate) fn unmatched_required(state: &EpisodeState) -> Vec<&str> {
    let mut successes: HashMap<&str, usize> = HashMap::new();
    for tool in state.executed_tools() {
        *successes.entry(tool.as_str()).or_default() += 1;
    }
    state
        .required_tools()
        .iter()
        .filter(|t| match successes.get_mut(t.as_str()) {
            Some(n) if *n > 0 => {
                *n -= 1;
                false
            }
            _ => true,
        })
        .map(String::as_str)
        .collect()
}

/// Successful executions restricted to required tools, in order.
pub(crate) fn required_subsequence(state: &EpisodeState) -> Vec<&str> {
    let required = state.required_tools();
    state
        .executed_tools()
        .iter()
        .filter(|t| required.contains(*t))
        .map(String::as_str)
        .collect()
}

/// All-or-nothing order check: the required subsequence must equal
/// `required_tools` exactly. Failed attempts never enter `executed_tools`,
/// so retrying a failed step keeps the sequence intact; an extra success
/// of a required tool does not.
fn sequence_correct(state: &EpisodeState) -> bool {
    let required = state.required_tools();
    !required.is_empty()
        && required_subsequence(state)
            .into_iter()
            .eq(required.iter().map(String::as_str))
}
