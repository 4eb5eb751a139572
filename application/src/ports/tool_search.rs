//! Tool search port
//!
//! Answers `tool_search` actions. The index behind it (keyword, semantic,
//! remote) is an adapter concern.

use async_trait::async_trait;
use thiserror::Error;
use tooltrial_domain::ToolSearchHit;

#[derive(Error, Debug)]
#[error("Tool search failed: {0}")]
pub struct ToolSearchError(pub String);

#[async_trait]
pub trait ToolSearchPort: Send + Sync {
    /// Up to `k` tools matching `query`, best first.
    async fn search(&self, query: &str, k: usize) -> Result<Vec<ToolSearchHit>, ToolSearchError>;
}
