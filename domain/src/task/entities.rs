//! Task entities

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Kind of workflow a task exercises.
///
/// Unknown type strings are preserved in [`TaskType::Other`] and graded with
/// the default minimum.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskType {
    SimpleTask,
    BasicTask,
    DataPipeline,
    ApiIntegration,
    MultiStagePipeline,
    Other(String),
}

impl TaskType {
    pub fn as_str(&self) -> &str {
        match self {
            TaskType::SimpleTask => "simple_task",
            TaskType::BasicTask => "basic_task",
            TaskType::DataPipeline => "data_pipeline",
            TaskType::ApiIntegration => "api_integration",
            TaskType::MultiStagePipeline => "multi_stage_pipeline",
            TaskType::Other(s) => s.as_str(),
        }
    }

    /// Minimum number of successful executions that counts toward partial
    /// success for this task type.
    pub fn min_successful_executions(&self) -> usize {
        match self {
            TaskType::SimpleTask => 1,
            TaskType::BasicTask | TaskType::DataPipeline | TaskType::ApiIntegration => 2,
            TaskType::MultiStagePipeline => 3,
            TaskType::Other(_) => 2,
        }
    }
}

impl From<String> for TaskType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "simple_task" => TaskType::SimpleTask,
            "basic_task" => TaskType::BasicTask,
            "data_pipeline" => TaskType::DataPipeline,
            "api_integration" => TaskType::ApiIntegration,
            "multi_stage_pipeline" => TaskType::MultiStagePipeline,
            _ => TaskType::Other(s),
        }
    }
}

impl From<TaskType> for String {
    fn from(t: TaskType) -> Self {
        t.as_str().to_string()
    }
}

impl std::fmt::Display for TaskType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A task instance: an identifier, a type, a natural-language request, and
/// the ordered tools that make up the target workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskDefinition {
    pub task_id: String,
    pub task_type: TaskType,
    #[serde(default)]
    pub description: String,
    pub required_tools: Vec<String>,
}

impl TaskDefinition {
    pub fn new(
        task_id: impl Into<String>,
        task_type: TaskType,
        description: impl Into<String>,
        required_tools: Vec<String>,
    ) -> Self {
        Self {
            task_id: task_id.into(),
            task_type,
            description: description.into(),
            required_tools,
        }
    }

    /// Check the task against the tools that can actually be called.
    pub fn validate<'a>(
        &self,
        known_tools: impl IntoIterator<Item = &'a str>,
    ) -> Result<(), DomainError> {
        if self.task_id.trim().is_empty() {
            return Err(DomainError::InvalidTask {
                task_id: self.task_id.clone(),
                reason: "task_id cannot be empty".to_string(),
            });
        }
        let known: Vec<&str> = known_tools.into_iter().collect();
        if let Some(missing) = self
            .required_tools
            .iter()
            .find(|t| !known.contains(&t.as_str()))
        {
            return Err(DomainError::InvalidTask {
                task_id: self.task_id.clone(),
                reason: format!("required tool '{}' is not registered", missing),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_type_minimums() {
        assert_eq!(TaskType::SimpleTask.min_successful_executions(), 1);
        assert_eq!(TaskType::BasicTask.min_successful_executions(), 2);
        assert_eq!(TaskType::DataPipeline.min_successful_executions(), 2);
        assert_eq!(TaskType::ApiIntegration.min_successful_executions(), 2);
        assert_eq!(TaskType::MultiStagePipeline.min_successful_executions(), 3);
        assert_eq!(
            TaskType::Other("custom".to_string()).min_successful_executions(),
            2
        );
    }

    #[test]
    fn test_task_type_serde_roundtrip_keeps_unknown() {
        let parsed: TaskType = serde_json::from_str("\"data_pipeline\"").unwrap();
        assert_eq!(parsed, TaskType::DataPipeline);
        let other: TaskType = serde_json::from_str("\"exotic\"").unwrap();
        assert_eq!(other, TaskType::Other("exotic".to_string()));
        assert_eq!(serde_json::to_string(&other).unwrap(), "\"exotic\"");
    }

    #[test]
    fn test_validate_rejects_unregistered_tool() {
        let task = TaskDefinition::new(
            "t1",
            TaskType::BasicTask,
            "do it",
            vec!["fetch".to_string(), "post".to_string()],
        );
        assert!(task.validate(["fetch", "post"]).is_ok());
        let err = task.validate(["fetch"]).unwrap_err();
        assert!(err.to_string().contains("post"));
    }
}
