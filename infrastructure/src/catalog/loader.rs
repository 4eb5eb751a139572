//! JSON file loaders for tool registries and task lists.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tooltrial_domain::{DomainError, TaskDefinition, ToolCapability, ToolRegistry};
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("Could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("No tasks found in {0}")]
    NoTasks(PathBuf),

    #[error(transparent)]
    Invalid(#[from] DomainError),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TaskFile {
    List(Vec<TaskDefinition>),
    Wrapped { tasks: Vec<TaskDefinition> },
}

fn read(path: &Path) -> Result<String, LoaderError> {
    std::fs::read_to_string(path).map_err(|source| LoaderError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn parse<T: serde::de::DeserializeOwned>(path: &Path, text: &str) -> Result<T, LoaderError> {
    serde_json::from_str(text).map_err(|source| LoaderError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load and validate a tool registry.
///
/// Names must be non-empty and unique, and every dependency must name a
/// tool in the same file. Categories are resolved once here.
pub fn load_registry(path: impl AsRef<Path>) -> Result<ToolRegistry, LoaderError> {
    let path = path.as_ref();
    let tools: Vec<ToolCapability> = parse(path, &read(path)?)?;
    let registry = ToolRegistry::from_capabilities(tools)?;
    debug!("Loaded {} tools from {}", registry.len(), path.display());
    Ok(registry)
}

/// Load a task list.
///
/// Tasks are checked against a registry later, when episodes start, so a
/// task naming an unknown tool fails alone instead of failing the suite.
pub fn load_tasks(path: impl AsRef<Path>) -> Result<Vec<TaskDefinition>, LoaderError> {
    let path = path.as_ref();
    let tasks = match parse::<TaskFile>(path, &read(path)?)? {
        TaskFile::List(tasks) | TaskFile::Wrapped { tasks } => tasks,
    };
    if tasks.is_empty() {
        return Err(LoaderError::NoTasks(path.to_path_buf()));
    }

    let mut seen = std::collections::HashSet::new();
    for task in &tasks {
        if !seen.insert(task.task_id.as_str()) {
            warn!("Duplicate task id '{}' in {}", task.task_id, path.display());
        }
    }
    debug!("Loaded {} tasks from {}", tasks.len(), path.display());
    Ok(tasks)
}
