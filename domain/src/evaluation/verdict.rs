//! Graded verdict types.

use serde::{Deserialize, Serialize};

/// Grade of an episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictKind {
    FullSuccess,
    PartialSuccess,
    Failure,
}

impl VerdictKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerdictKind::FullSuccess => "full_success",
            VerdictKind::PartialSuccess => "partial_success",
            VerdictKind::Failure => "failure",
        }
    }

    /// FullSuccess or PartialSuccess.
    pub fn is_success(&self) -> bool {
        !matches!(self, VerdictKind::Failure)
    }
}

impl std::fmt::Display for VerdictKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Verdict plus the measurements it was derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub kind: VerdictKind,
    /// Fraction of distinct required tools that succeeded at least once
    pub coverage: f64,
    pub sequence_correct: bool,
    /// A successful tool looked like it produced a deliverable
    pub has_output_artifact: bool,
    pub successful_executions: usize,
    pub completion_signaled: bool,
    /// Partial-success conditions that held
    pub conditions_met: usize,
    /// Why the verdict is not better; empty on FullSuccess
    pub reasons: Vec<String>,
    /// False when a provider failure ended the episode
    pub workflow_attributable: bool,
}

impl Verdict {
    pub fn is_full_success(&self) -> bool {
        self.kind == VerdictKind::FullSuccess
    }

    pub fn is_failure(&self) -> bool {
        self.kind == VerdictKind::Failure
    }
}
