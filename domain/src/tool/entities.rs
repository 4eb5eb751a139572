//! Tool domain entities

use super::category::ToolCategory;
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Parameter specification for a tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolParameter {
    /// Parameter name
    pub name: String,
    /// Parameter type hint (e.g., "string", "number", "object")
    #[serde(rename = "type", default = "default_param_type")]
    pub param_type: String,
    /// Whether this parameter is required
    #[serde(default)]
    pub required: bool,
    /// Default value used when the parameter is omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
    /// Parameter description
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

fn default_param_type() -> String {
    "string".to_string()
}

impl ToolParameter {
    pub fn new(name: impl Into<String>, param_type: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            param_type: param_type.into(),
            required,
            default: None,
            description: String::new(),
        }
    }

    pub fn with_default(mut self, default: serde_json::Value) -> Self {
        self.default = Some(default);
        self
    }
}

/// A named value produced by a tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolReturn {
    pub name: String,
    #[serde(rename = "type", default = "default_param_type")]
    pub return_type: String,
}

/// An error a tool declares it can raise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolErrorSpec {
    pub code: String,
    pub description: String,
}

impl ToolErrorSpec {
    pub fn new(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
        }
    }
}

/// Capability descriptor of a tool the model may call.
///
/// `category` is the raw string from the descriptor. The resolved
/// [`ToolCategory`] is filled in when the tool is registered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCapability {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub parameters: Vec<ToolParameter>,
    #[serde(default)]
    pub returns: Vec<ToolReturn>,
    #[serde(default)]
    pub errors: Vec<ToolErrorSpec>,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(skip)]
    kind: ToolCategory,
}

impl ToolCapability {
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        let name = name.into();
        let category = category.into();
        let kind = ToolCategory::resolve(&category, &name);
        Self {
            name,
            description: String::new(),
            category,
            parameters: Vec::new(),
            returns: Vec::new(),
            errors: Vec::new(),
            dependencies: Vec::new(),
            kind,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_parameter(mut self, param: ToolParameter) -> Self {
        self.parameters.push(param);
        self
    }

    pub fn with_return(mut self, name: impl Into<String>, return_type: impl Into<String>) -> Self {
        self.returns.push(ToolReturn {
            name: name.into(),
            return_type: return_type.into(),
        });
        self
    }

    pub fn with_error(mut self, code: impl Into<String>, description: impl Into<String>) -> Self {
        self.errors.push(ToolErrorSpec::new(code, description));
        self
    }

    pub fn with_dependency(mut self, dependency: impl Into<String>) -> Self {
        self.dependencies.push(dependency.into());
        self
    }

    /// Category resolved at registration time.
    pub fn kind(&self) -> ToolCategory {
        self.kind
    }
}

/// Registry of tool capabilities, in registration order.
///
/// Order matters: fuzzy name resolution returns the first matching key.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<ToolCapability>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool (builder pattern). A tool with the same name replaces
    /// the earlier one in place.
    pub fn register(mut self, mut tool: ToolCapability) -> Self {
        tool.kind = ToolCategory::resolve(&tool.category, &tool.name);
        match self.index.get(&tool.name) {
            Some(&idx) => self.tools[idx] = tool,
            None => {
                self.index.insert(tool.name.clone(), self.tools.len());
                self.tools.push(tool);
            }
        }
        self
    }

    /// Build a registry from loaded descriptors, validating names and
    /// dependency references.
    pub fn from_capabilities(tools: Vec<ToolCapability>) -> Result<Self, DomainError> {
        if tools.is_empty() {
            return Err(DomainError::EmptyRegistry);
        }
        let mut seen = HashSet::new();
        for tool in &tools {
            if tool.name.trim().is_empty() {
                return Err(DomainError::EmptyToolName);
            }
            if !seen.insert(tool.name.as_str()) {
                return Err(DomainError::DuplicateTool(tool.name.clone()));
            }
        }
        for tool in &tools {
            if let Some(dep) = tool.dependencies.iter().find(|d| !seen.contains(d.as_str())) {
                return Err(DomainError::UnknownDependency {
                    tool: tool.name.clone(),
                    dependency: dep.clone(),
                });
            }
        }
        Ok(tools.into_iter().fold(Self::new(), Self::register))
    }

    pub fn get(&self, name: &str) -> Option<&ToolCapability> {
        self.index.get(name).map(|&idx| &self.tools[idx])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn all(&self) -> impl Iterator<Item = &ToolCapability> {
        self.tools.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.iter().map(|t| t.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Resolve a possibly misspelled tool name to a registered one.
    ///
    /// 1. verbatim match
    /// 2. case-insensitive exact match
    /// 3. case-insensitive substring match in either direction
    pub fn resolve(&self, name: &str) -> Option<&str> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        if let Some(tool) = self.get(name) {
            return Some(tool.name.as_str());
        }
        let lower = name.to_lowercase();
        if let Some(tool) = self.tools.iter().find(|t| t.name.to_lowercase() == lower) {
            return Some(tool.name.as_str());
        }
        self.tools
            .iter()
            .find(|t| {
                let key = t.name.to_lowercase();
                key.contains(&lower) || lower.contains(&key)
            })
            .map(|t| t.name.as_str())
    }

    /// Resolve a name and return its capability.
    pub fn get_resolved(&self, name: &str) -> Option<&ToolCapability> {
        self.resolve(name).and_then(|canonical| self.get(canonical))
    }

    /// Registered names sharing at least one word with `name`, for
    /// "did you mean" hints.
    pub fn suggestions(&self, name: &str, limit: usize) -> Vec<&str> {
        let wanted = crate::core::string::words(name);
        self.tools
            .iter()
            .filter(|t| {
                let have = crate::core::string::words(&t.name);
                wanted.iter().any(|w| have.contains(w))
            })
            .take(limit)
            .map(|t| t.name.as_str())
            .collect()
    }
}
