//! Tool environment adapters
//!
//! - [`KeywordToolSearch`]: answers `tool_search` actions from the registry
//! - [`SimulatedToolExecutor`]: runs `tool_call` actions through the seeded
//!   domain simulator

mod executor;
mod search;

pub use executor::SimulatedToolExecutor;
pub use search::KeywordToolSearch;
