//! Action tag parser.
//!
//! Tags are case-sensitive, matched non-greedily, and may span lines.
//! Every occurrence of every tag kind is extracted in document order; the
//! controller decides which category to act on.

use crate::tool::ToolRegistry;
use regex::Regex;
use std::sync::LazyLock;

static SEARCH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<tool_search>(.*?)</tool_search>").expect("valid regex"));
static CALL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<tool_call>(.*?)</tool_call>").expect("valid regex"));
static INFO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<tool_info>(.*?)</tool_info>").expect("valid regex"));

/// Which kind of action a turn acts on.
///
/// Search wins over info, info wins over execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionCategory {
    Search,
    Info,
    Execute,
}

/// All action tags found in one response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedActions {
    pub searches: Vec<String>,
    pub infos: Vec<String>,
    pub calls: Vec<String>,
}

impl ParsedActions {
    /// No tag of any kind was found.
    pub fn is_empty(&self) -> bool {
        self.searches.is_empty() && self.infos.is_empty() && self.calls.is_empty()
    }

    pub fn has_calls(&self) -> bool {
        !self.calls.is_empty()
    }

    /// The single category this turn should be processed as.
    pub fn category(&self) -> Option<ActionCategory> {
        if !self.searches.is_empty() {
            Some(ActionCategory::Search)
        } else if !self.infos.is_empty() {
            Some(ActionCategory::Info)
        } else if !self.calls.is_empty() {
            Some(ActionCategory::Execute)
        } else {
            None
        }
    }
}

fn extract(re: &Regex, text: &str) -> Vec<String> {
    re.captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Extract every `tool_search`, `tool_info` and `tool_call` tag.
pub fn parse_actions(text: &str) -> ParsedActions {
    ParsedActions {
        searches: extract(&SEARCH_RE, text),
        infos: extract(&INFO_RE, text),
        calls: extract(&CALL_RE, text),
    }
}

/// Tool calls after registry resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedCalls {
    /// Canonical registry names, in call order
    pub resolved: Vec<String>,
    /// Requested names with no registry match
    pub dropped: Vec<String>,
}

/// Resolve requested tool names against the registry, dropping unknown ones.
pub fn resolve_calls(calls: &[String], registry: &ToolRegistry) -> ResolvedCalls {
    let mut out = ResolvedCalls::default();
    for requested in calls {
        match registry.resolve(requested) {
            Some(canonical) => out.resolved.push(canonical.to_string()),
            None => out.dropped.push(requested.clone()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::ToolCapability;

    #[test]
    fn test_parse_each_tag_kind() {
        let text = "I'll look first <tool_search>fetch data</tool_search> \
                    then <tool_info>fetch</tool_info> and <tool_call>fetch</tool_call>";
        let parsed = parse_actions(text);
        assert_eq!(parsed.searches, vec!["fetch data"]);
        assert_eq!(parsed.infos, vec!["fetch"]);
        assert_eq!(parsed.calls, vec!["fetch"]);
    }

    #[test]
    fn test_parse_multiple_calls_in_order() {
        let text = "<tool_call>fetch</tool_call>\n<tool_call>validate</tool_call>\n<tool_call>post</tool_call>";
        assert_eq!(parse_actions(text).calls, vec!["fetch", "validate", "post"]);
    }

    #[test]
    fn test_parse_multiline_and_trims() {
        let text = "<tool_search>\n  read csv\n  files\n</tool_search>";
        assert_eq!(parse_actions(text).searches, vec!["read csv\n  files"]);
    }

    #[test]
    fn test_tags_are_case_sensitive() {
        let parsed = parse_actions("<Tool_Call>fetch</Tool_Call>");
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_non_greedy_matching() {
        let text = "<tool_call>a</tool_call> text <tool_call>b</tool_call>";
        assert_eq!(parse_actions(text).calls, vec!["a", "b"]);
    }

    #[test]
    fn test_empty_tags_ignored() {
        assert!(parse_actions("<tool_call>   </tool_call>").is_empty());
    }

    #[test]
    fn test_category_priority() {
        let both = parse_actions("<tool_search>x</tool_search><tool_call>y</tool_call>");
        assert_eq!(both.category(), Some(ActionCategory::Search));
        let info = parse_actions("<tool_info>x</tool_info><tool_call>y</tool_call>");
        assert_eq!(info.category(), Some(ActionCategory::Info));
        let call = parse_actions("<tool_call>y</tool_call>");
        assert_eq!(call.category(), Some(ActionCategory::Execute));
        assert_eq!(parse_actions("nothing").category(), None);
    }

    #[test]
    fn test_resolve_calls_drops_unknown() {
        let registry = ToolRegistry::new()
            .register(ToolCapability::new("data_fetcher", "network"))
            .register(ToolCapability::new("report_writer", "file"));
        let calls = vec![
            "Data_Fetcher".to_string(),
            "teleport".to_string(),
            "writer".to_string(),
        ];
        let resolved = resolve_calls(&calls, &registry);
        assert_eq!(resolved.resolved, vec!["data_fetcher", "report_writer"]);
        assert_eq!(resolved.dropped, vec!["teleport"]);
    }
}
