//! Tool execution simulator.
//!
//! Success probability starts at a base rate and shrinks with unmet
//! dependencies, a flaky dependency, and recent failures (see
//! [`probability`]). Outputs and failures are shaped by the tool's
//! [`ToolCategory`](crate::tool::ToolCategory) (see [`outputs`]).

pub mod outputs;
pub mod probability;
pub mod simulator;

pub use outputs::{GENERIC_ERRORS, synthesize_failure, synthesize_output};
pub use probability::{ProbabilityFactors, adjusted_probability, success_probability};
pub use simulator::{DEFAULT_BASE_SUCCESS_RATE, ToolSimulator};
