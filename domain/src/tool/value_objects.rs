//! Tool domain value objects: immutable execution results
//!
//! Every simulated tool invocation produces exactly one
//! [`ToolExecutionResult`]. It is appended to the episode's execution
//! history and never mutated afterwards.

use super::category::ToolCategory;
use super::entities::ToolCapability;
use serde::{Deserialize, Serialize};

/// Failure reported by a tool: an error code and a description.
///
/// Codes come from the tool's own declared error list whenever it has one,
/// so diagnostics can quote the specific reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolFailure {
    pub code: String,
    pub description: String,
}

impl ToolFailure {
    pub fn new(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
        }
    }

    pub fn is_timeout(&self) -> bool {
        let text = format!("{} {}", self.code, self.description).to_lowercase();
        text.contains("timeout") || text.contains("timed out")
    }
}

impl std::fmt::Display for ToolFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.description)
    }
}

/// One ranked result of a tool search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSearchHit {
    pub tool_name: String,
    pub category: ToolCategory,
    pub score: f64,
    pub descriptor: ToolCapability,
}

impl ToolSearchHit {
    pub fn new(descriptor: ToolCapability, score: f64) -> Self {
        Self {
            tool_name: descriptor.name.clone(),
            category: descriptor.kind(),
            score,
            descriptor,
        }
    }
}

/// Structured metadata about a tool execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionMetadata {
    /// Category the tool was resolved to at registration
    pub category: ToolCategory,
    /// 1-based count of executions of this tool within the episode
    pub attempt: u32,
}

/// Outcome of a single tool invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolExecutionResult {
    pub tool_name: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ToolFailure>,
    /// Simulated duration in milliseconds
    pub duration_ms: u64,
    pub metadata: ExecutionMetadata,
}

impl ToolExecutionResult {
    /// Create a successful result
    pub fn success(
        tool_name: impl Into<String>,
        output: serde_json::Value,
        metadata: ExecutionMetadata,
    ) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: true,
            output: Some(output),
            error: None,
            duration_ms: 0,
            metadata,
        }
    }

    /// Create a failed result
    pub fn failure(
        tool_name: impl Into<String>,
        error: ToolFailure,
        metadata: ExecutionMetadata,
    ) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: false,
            output: None,
            error: Some(error),
            duration_ms: 0,
            metadata,
        }
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn error(&self) -> Option<&ToolFailure> {
        self.error.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta() -> ExecutionMetadata {
        ExecutionMetadata {
            category: ToolCategory::Network,
            attempt: 1,
        }
    }

    #[test]
    fn test_success_result() {
        let result = ToolExecutionResult::success("fetch", serde_json::json!({"ok": true}), meta())
            .with_duration(120);
        assert!(result.is_success());
        assert!(result.error().is_none());
        assert_eq!(result.duration_ms, 120);
    }

    #[test]
    fn test_failure_result() {
        let result = ToolExecutionResult::failure(
            "fetch",
            ToolFailure::new("NETWORK_TIMEOUT", "Request timed out"),
            meta(),
        );
        assert!(!result.is_success());
        assert!(result.output.is_none());
        assert!(result.error().unwrap().is_timeout());
    }

    #[test]
    fn test_failure_display() {
        let failure = ToolFailure::new("INVALID_INPUT", "Missing field");
        assert_eq!(failure.to_string(), "[INVALID_INPUT] Missing field");
        assert!(!failure.is_timeout());
    }

    #[test]
    fn test_serialization_skips_absent_fields() {
        let result = ToolExecutionResult::success("fetch", serde_json::json!(1), meta());
        let value = serde_json::to_value(&result).unwrap();
        assert!(value.get("error").is_none());
        assert_eq!(value["metadata"]["category"], "network");
    }
}
