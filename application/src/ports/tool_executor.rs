//! Tool Executor port
//!
//! Defines the interface for executing a tool the model called. The engine
//! only ever simulates tools, so an executor sees the episode state it
//! runs in (dependencies and recent failures shape the outcome).

use async_trait::async_trait;
use tooltrial_domain::{EpisodeState, ToolCapability, ToolExecutionResult};

/// Port for tool execution
///
/// Implementations (adapters) live in the infrastructure layer. Execution
/// never fails at the port level: a failed tool is a
/// [`ToolExecutionResult`] with `success == false`.
#[async_trait]
pub trait ToolExecutorPort: Send + Sync {
    async fn execute(&self, capability: &ToolCapability, state: &EpisodeState)
    -> ToolExecutionResult;
}
