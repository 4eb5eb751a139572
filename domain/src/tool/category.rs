//! Tool categories used to shape simulated outputs and error context.

use serde::{Deserialize, Serialize};

/// Broad family a tool belongs to.
///
/// Resolved once when a tool is registered, from the descriptor's category
/// string first and the tool name second. Unrecognised tools fall back to
/// [`ToolCategory::Generic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolCategory {
    File,
    Data,
    Network,
    Compute,
    Integration,
    Utility,
    #[default]
    Generic,
}

/// Name fragments per category, checked in this order.
const NAME_KEYWORDS: &[(ToolCategory, &[&str])] = &[
    (
        ToolCategory::File,
        &["file", "reader", "writer", "directory", "folder", "path"],
    ),
    (
        ToolCategory::Integration,
        &["integrat", "sync", "webhook", "queue", "publish", "notify", "database"],
    ),
    (
        ToolCategory::Network,
        &["http", "fetch", "api", "request", "download", "upload", "post", "url"],
    ),
    (
        ToolCategory::Data,
        &[
            "data", "transform", "validat", "pars", "filter", "aggregat", "normaliz", "clean",
            "merge", "sort", "convert",
        ],
    ),
    (
        ToolCategory::Compute,
        &["comput", "calculat", "analy", "predict", "process", "score", "model"],
    ),
    (
        ToolCategory::Utility,
        &["log", "cache", "compress", "encrypt", "hash", "format", "util", "schedul"],
    ),
];

/// Descriptor category strings, matched by fragment.
const CATEGORY_KEYWORDS: &[(ToolCategory, &[&str])] = &[
    (ToolCategory::File, &["file"]),
    (ToolCategory::Integration, &["integrat"]),
    (ToolCategory::Network, &["network", "api", "web"]),
    (ToolCategory::Data, &["data"]),
    (ToolCategory::Compute, &["comput", "analy"]),
    (ToolCategory::Utility, &["util"]),
];

impl ToolCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolCategory::File => "file",
            ToolCategory::Data => "data",
            ToolCategory::Network => "network",
            ToolCategory::Compute => "compute",
            ToolCategory::Integration => "integration",
            ToolCategory::Utility => "utility",
            ToolCategory::Generic => "generic",
        }
    }

    /// Resolve a category from a descriptor category string and tool name.
    pub fn resolve(declared: &str, tool_name: &str) -> Self {
        Self::match_keywords(CATEGORY_KEYWORDS, declared)
            .or_else(|| Self::match_keywords(NAME_KEYWORDS, tool_name))
            .unwrap_or_default()
    }

    /// Resolve a category from the tool name alone.
    pub fn from_tool_name(tool_name: &str) -> Self {
        Self::match_keywords(NAME_KEYWORDS, tool_name).unwrap_or_default()
    }

    fn match_keywords(table: &[(ToolCategory, &[&str])], text: &str) -> Option<Self> {
        let lower = text.to_lowercase();
        if lower.is_empty() {
            return None;
        }
        table
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
            .map(|(category, _)| *category)
    }
}

impl std::fmt::Display for ToolCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_prefers_declared_category() {
        assert_eq!(
            ToolCategory::resolve("file_operations", "fetch_remote"),
            ToolCategory::File
        );
        assert_eq!(
            ToolCategory::resolve("data_processing", "anything"),
            ToolCategory::Data
        );
    }

    #[test]
    fn test_resolve_falls_back_to_name() {
        assert_eq!(ToolCategory::resolve("", "csv_file_reader"), ToolCategory::File);
        assert_eq!(ToolCategory::resolve("misc", "fetch"), ToolCategory::Network);
        assert_eq!(ToolCategory::resolve("", "validate"), ToolCategory::Data);
        assert_eq!(ToolCategory::resolve("", "slack_notify"), ToolCategory::Integration);
        assert_eq!(ToolCategory::resolve("", "gzip_compressor"), ToolCategory::Utility);
        assert_eq!(ToolCategory::resolve("", "risk_score"), ToolCategory::Compute);
    }

    #[test]
    fn test_unknown_is_generic() {
        assert_eq!(ToolCategory::resolve("", "frobnicate"), ToolCategory::Generic);
        assert_eq!(ToolCategory::from_tool_name(""), ToolCategory::Generic);
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&ToolCategory::Integration).unwrap();
        assert_eq!(json, "\"integration\"");
    }
}
