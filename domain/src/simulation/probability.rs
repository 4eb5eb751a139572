//! Success probability model for simulated tool executions.

use crate::episode::EpisodeState;
use crate::tool::ToolCapability;

/// Lower bound of the success probability.
pub const MIN_SUCCESS_PROBABILITY: f64 = 0.1;
/// Upper bound of the success probability.
pub const MAX_SUCCESS_PROBABILITY: f64 = 0.95;

/// Factor applied per declared dependency that has not succeeded yet.
pub const UNMET_DEPENDENCY_FACTOR: f64 = 0.5;
/// Factor applied when a satisfied dependency's latest run failed.
pub const FLAKY_DEPENDENCY_FACTOR: f64 = 0.7;
/// Factor applied per failure among the recent executions.
pub const RECENT_FAILURE_FACTOR: f64 = 0.9;
/// How many trailing executions count as "recent".
pub const RECENT_WINDOW: usize = 3;

/// Inputs of the probability model, extracted from episode state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbabilityFactors {
    pub unmet_dependencies: usize,
    pub flaky_dependency: bool,
    pub recent_failures: usize,
}

impl ProbabilityFactors {
    pub fn from_state(capability: &ToolCapability, state: &EpisodeState) -> Self {
        let unmet_dependencies = capability
            .dependencies
            .iter()
            .filter(|d| !state.has_succeeded(d))
            .count();
        let flaky_dependency = capability
            .dependencies
            .iter()
            .filter(|d| state.has_succeeded(d))
            .any(|d| state.last_execution_of(d).is_some_and(|r| !r.success));
        Self {
            unmet_dependencies,
            flaky_dependency,
            recent_failures: state.recent_failures(RECENT_WINDOW),
        }
    }
}

/// Adjust `base_rate` by the given factors and clamp the result.
pub fn adjusted_probability(base_rate: f64, factors: ProbabilityFactors) -> f64 {
    let mut p = base_rate;
    p *= UNMET_DEPENDENCY_FACTOR.powi(factors.unmet_dependencies as i32);
    if factors.flaky_dependency {
        p *= FLAKY_DEPENDENCY_FACTOR;
    }
    p *= RECENT_FAILURE_FACTOR.powi(factors.recent_failures as i32);
    p.clamp(MIN_SUCCESS_PROBABILITY, MAX_SUCCESS_PROBABILITY)
}

/// Success probability of running `capability` in the current state.
pub fn success_probability(
    base_rate: f64,
    capability: &ToolCapability,
    state: &EpisodeState,
) -> f64 {
    adjusted_probability(base_rate, ProbabilityFactors::from_state(capability, state))
}
