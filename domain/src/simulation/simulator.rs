//! Stochastic, dependency-aware tool execution.

use super::outputs::{synthesize_failure, synthesize_output};
use super::probability::success_probability;
use crate::episode::EpisodeState;
use crate::tool::{ExecutionMetadata, ToolCapability, ToolExecutionResult};
use rand::Rng;

/// Default base success rate before adjustments.
pub const DEFAULT_BASE_SUCCESS_RATE: f64 = 0.8;

/// Simulates tool executions against an episode's state.
///
/// Computation only: nothing sleeps or touches I/O. The random source is
/// injected so runs are reproducible under a fixed seed.
#[derive(Debug, Clone)]
pub struct ToolSimulator<R> {
    base_rate: f64,
    rng: R,
}

impl<R: Rng> ToolSimulator<R> {
    pub fn new(base_rate: f64, rng: R) -> Self {
        Self { base_rate, rng }
    }

    /// Probability that `capability` succeeds right now.
    pub fn success_probability(&self, capability: &ToolCapability, state: &EpisodeState) -> f64 {
        success_probability(self.base_rate, capability, state)
    }

    /// Run one simulated execution. The state is read, never written; the
    /// caller records the returned result.
    pub fn execute(
        &mut self,
        capability: &ToolCapability,
        state: &EpisodeState,
    ) -> ToolExecutionResult {
        let probability = self.success_probability(capability, state);
        let metadata = ExecutionMetadata {
            category: capability.kind(),
            attempt: state.attempts_of(&capability.name) as u32 + 1,
        };

        if self.rng.gen_bool(probability) {
            let output = synthesize_output(capability.kind(), &capability.name, &mut self.rng);
            ToolExecutionResult::success(&capability.name, output, metadata)
                .with_duration(self.rng.gen_range(50..2_000))
        } else {
            let failure = synthesize_failure(capability, &mut self.rng);
            let duration = if failure.is_timeout() {
                self.rng.gen_range(10_000..60_000)
            } else {
                self.rng.gen_range(20..1_000)
            };
            ToolExecutionResult::failure(&capability.name, failure, metadata).with_duration(duration)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{TaskDefinition, TaskType};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn state() -> EpisodeState {
        EpisodeState::new(&TaskDefinition::new(
            "t",
            TaskType::BasicTask,
            "",
            vec!["fetch".to_string()],
        ))
    }

    #[test]
    fn test_same_seed_same_outcomes() {
        let cap = ToolCapability::new("fetch", "network").with_error("E", "e");
        let s = state();
        let mut a = ToolSimulator::new(0.5, StdRng::seed_from_u64(42));
        let mut b = ToolSimulator::new(0.5, StdRng::seed_from_u64(42));
        for _ in 0..10 {
            assert_eq!(a.execute(&cap, &s), b.execute(&cap, &s));
        }
    }

    #[test]
    fn test_attempt_index_counts_prior_runs() {
        let cap = ToolCapability::new("fetch", "network");
        let mut s = state();
        let mut sim = ToolSimulator::new(0.8, StdRng::seed_from_u64(1));
        let first = sim.execute(&cap, &s);
        assert_eq!(first.metadata.attempt, 1);
        s.record_execution(first);
        let second = sim.execute(&cap, &s);
        assert_eq!(second.metadata.attempt, 2);
        assert_eq!(second.metadata.category, crate::tool::ToolCategory::Network);
    }

    #[test]
    fn test_success_rate_roughly_matches_probability() {
        let cap = ToolCapability::new("fetch", "network");
        let s = state();
        let mut sim = ToolSimulator::new(0.8, StdRng::seed_from_u64(9));
        let successes = (0..2_000).filter(|_| sim.execute(&cap, &s).success).count();
        let rate = successes as f64 / 2_000.0;
        assert!((rate - 0.8).abs() < 0.05, "rate was {}", rate);
    }

    #[test]
    fn test_unmet_dependency_lowers_success_rate() {
        let dependent = ToolCapability::new("post", "network").with_dependency("fetch");
        let s = state();
        let mut sim = ToolSimulator::new(0.8, StdRng::seed_from_u64(11));
        let successes = (0..2_000).filter(|_| sim.execute(&dependent, &s).success).count();
        let rate = successes as f64 / 2_000.0;
        assert!((rate - 0.4).abs() < 0.05, "rate was {}", rate);
    }

    #[test]
    fn test_failures_use_declared_errors() {
        let cap = ToolCapability::new("frob", "").with_error("JAMMED", "Jammed");
        let s = state();
        let mut sim = ToolSimulator::new(0.0, StdRng::seed_from_u64(5));
        // base 0 clamps to 0.1, so most runs fail
        let failures: Vec<_> = (0..50)
            .map(|_| sim.execute(&cap, &s))
            .filter(|r| !r.success)
            .collect();
        assert!(!failures.is_empty());
        assert!(failures.iter().all(|r| r.error().unwrap().code == "JAMMED"));
    }
}
