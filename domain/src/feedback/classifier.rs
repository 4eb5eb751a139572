//! Malformed-output classifier.
//!
//! Pure heuristics over one model response. The result carries the issue
//! kind, the tool the model most likely meant, and the evidence that led
//! there, so the state machine can stay free of regex details.

use crate::action::{ParsedActions, is_completion_signal};
use crate::tool::ToolRegistry;
use regex::Regex;
use std::sync::LazyLock;

/// Words and phrases that suggest the model wanted to act.
pub const INTENT_VERBS: &[&str] = &[
    "use", "call", "execute", "run", "invoke", "apply", "let me", "i will", "i'll", "next step",
];

/// Broken or near-miss call tags: `<tool-call>x`, `tool_call: x`, `<toolcall=x>`.
static NEAR_MISS_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<?\s*/?\s*tool[_\s-]?call\s*[:=>(\s]\s*`?([A-Za-z][A-Za-z0-9_\-]*)")
        .expect("valid regex")
});

static BACKTICK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([A-Za-z][A-Za-z0-9_\-]*)`").expect("valid regex"));

static VERB_TARGET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:use|call|execute|run|invoke)\s+(?:the\s+)?([A-Za-z][A-Za-z0-9_\-]{3,})")
        .expect("valid regex")
});

/// What went wrong with a turn that produced no usable tool call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatIssue {
    /// First turn, nothing happened yet, short response: just continue.
    SilentContinue,
    /// Substantial text without any action tag.
    NoAction,
    /// The model searched for tools but has not called one.
    SearchedWithoutCall,
    /// Neither searched nor called.
    NoToolCall,
}

impl FormatIssue {
    /// Detailed help names a likely tool and shows a worked example.
    pub fn is_detailed(&self) -> bool {
        matches!(
            self,
            FormatIssue::SearchedWithoutCall | FormatIssue::NoToolCall
        )
    }
}

/// Everything the classifier looks at for one turn.
#[derive(Debug, Clone, Copy)]
pub struct ClassifierInput<'a> {
    pub response: &'a str,
    /// 1-based turn index
    pub turn: usize,
    /// Whether the episode had any history before this response
    pub has_history: bool,
    pub actions: &'a ParsedActions,
    pub registry: &'a ToolRegistry,
    /// Whether any tool search happened so far (including this turn)
    pub has_searched: bool,
    /// Whether any tool was executed so far
    pub has_called: bool,
    /// Tool names from the latest search, best first
    pub recent_search_hits: &'a [String],
    /// Responses up to this length never get quick feedback
    pub min_length: usize,
}

/// Outcome of classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatClassification {
    /// `None` when the turn is not a format problem
    pub issue: Option<FormatIssue>,
    pub intended_tool: Option<String>,
    pub evidence: Vec<String>,
}

impl FormatClassification {
    fn none() -> Self {
        Self {
            issue: None,
            intended_tool: None,
            evidence: Vec::new(),
        }
    }
}

/// Classify a response that may lack a usable tool call.
pub fn classify(input: &ClassifierInput<'_>) -> FormatClassification {
    let actions = input.actions;
    if actions.has_calls() {
        return FormatClassification::none();
    }

    // A search-only turn is acted on, but still counts as not calling.
    if !actions.searches.is_empty() {
        let (intended_tool, mut evidence) = scan_intent(input);
        evidence.insert(
            0,
            format!(
                "{} search tag(s) without a tool_call",
                actions.searches.len()
            ),
        );
        return FormatClassification {
            issue: Some(FormatIssue::SearchedWithoutCall),
            intended_tool,
            evidence,
        };
    }

    if !actions.infos.is_empty() || is_completion_signal(input.response) {
        return FormatClassification::none();
    }

    let length = input.response.trim().chars().count();
    if length > input.min_length {
        return FormatClassification {
            issue: Some(FormatIssue::NoAction),
            intended_tool: None,
            evidence: vec![format!(
                "{} characters without any action tag",
                length
            )],
        };
    }

    if input.turn <= 1 && !input.has_history {
        return FormatClassification {
            issue: Some(FormatIssue::SilentContinue),
            intended_tool: None,
            evidence: Vec::new(),
        };
    }

    let (intended_tool, evidence) = scan_intent(input);
    let issue = if input.has_searched && !input.has_called {
        FormatIssue::SearchedWithoutCall
    } else {
        FormatIssue::NoToolCall
    };
    FormatClassification {
        issue: Some(issue),
        intended_tool,
        evidence,
    }
}

/// Guess the tool the model meant and collect evidence for the guess.
fn scan_intent(input: &ClassifierInput<'_>) -> (Option<String>, Vec<String>) {
    let text = input.response;
    let lower = text.to_lowercase();
    let registry = input.registry;
    let mut evidence = Vec::new();

    for verb in INTENT_VERBS {
        if contains_word(&lower, verb) {
            evidence.push(format!("intent phrase '{}'", verb));
        }
    }

    let mut guess: Option<String> = None;
    let mut consider = |candidate: &str, source: &str, evidence: &mut Vec<String>| {
        if let Some(name) = registry.resolve(candidate) {
            evidence.push(format!("{} '{}' -> {}", source, candidate, name));
            if guess.is_none() {
                guess = Some(name.to_string());
            }
        }
    };

    for caps in NEAR_MISS_TAG_RE.captures_iter(text) {
        if let Some(m) = caps.get(1) {
            consider(m.as_str(), "malformed tag", &mut evidence);
        }
    }

    for name in registry.names() {
        if lower.contains(&name.to_lowercase()) {
            consider(name, "mentions tool", &mut evidence);
        }
    }

    for caps in BACKTICK_RE.captures_iter(text) {
        if let Some(m) = caps.get(1) {
            consider(m.as_str(), "backticked name", &mut evidence);
        }
    }

    for caps in VERB_TARGET_RE.captures_iter(text) {
        if let Some(m) = caps.get(1) {
            consider(m.as_str(), "verb target", &mut evidence);
        }
    }

    if guess.is_none()
        && let Some(hit) = input.recent_search_hits.first()
    {
        evidence.push(format!("top search result '{}'", hit));
        guess = Some(hit.clone());
    }

    (guess, evidence)
}

fn contains_word(haystack: &str, needle: &str) -> bool {
    haystack.match_indices(needle).any(|(idx, _)| {
        let before = haystack[..idx].chars().next_back();
        let after = haystack[idx + needle.len()..].chars().next();
        !before.is_some_and(|c| c.is_alphanumeric()) && !after.is_some_and(|c| c.is_alphanumeric())
    })
}

const TAG_FORMS: &str = "- <tool_search>describe what you need</tool_search>\n\
- <tool_info>tool_name</tool_info>\n\
- <tool_call>tool_name</tool_call>";

/// Render the corrective message for a classification.
///
/// Returns `None` for turns that need no feedback.
pub fn render_feedback(classification: &FormatClassification) -> Option<String> {
    let issue = classification.issue?;
    let example = classification.intended_tool.as_deref().unwrap_or("tool_name");
    let hint = classification
        .intended_tool
        .as_deref()
        .map(|t| format!(" It looks like you intended to use `{}`.", t))
        .unwrap_or_default();

    match issue {
        FormatIssue::SilentContinue => None,
        FormatIssue::NoAction => Some(format!(
            "No action found in your response. Respond with one of:\n{}\n\
             When every step is done, say \"Task completed\".",
            TAG_FORMS
        )),
        FormatIssue::SearchedWithoutCall => Some(format!(
            "Format reminder: you searched for tools but have not called one.{}\n\
             To execute a tool, put its exact name in a call tag, for example:\n\
             <tool_call>{}</tool_call>",
            hint, example
        )),
        FormatIssue::NoToolCall => Some(format!(
            "Format issue: no tool call was found in your response.{}\n\
             Example:\n<tool_call>{}</tool_call>\n\
             If you are unsure which tool fits, search first:\n\
             <tool_search>describe the step</tool_search>",
            hint, example
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::parse_actions;
    use crate::tool::ToolCapability;

    fn registry() -> ToolRegistry {
        ToolRegistry::new()
            .register(ToolCapability::new("data_fetcher", "network"))
            .register(ToolCapability::new("data_validator", "data"))
            .register(ToolCapability::new("api_poster", "network"))
    }

    fn classify_text(text: &str, turn: usize, has_history: bool) -> FormatClassification {
        let reg = registry();
        let actions = parse_actions(text);
        classify(&ClassifierInput {
            response: text,
            turn,
            has_history,
            actions: &actions,
            registry: &reg,
            has_searched: false,
            has_called: false,
            recent_search_hits: &[],
            min_length: 30,
        })
    }

    #[test]
    fn test_tool_call_is_not_an_issue() {
        let c = classify_text("<tool_call>data_fetcher</tool_call>", 3, true);
        assert_eq!(c.issue, None);
    }

    #[test]
    fn test_long_untagged_text_gets_quick_feedback() {
        let c = classify_text(
            "I think the best approach is to look at the data carefully first.",
            1,
            false,
        );
        assert_eq!(c.issue, Some(FormatIssue::NoAction));
        let msg = render_feedback(&c).unwrap();
        assert!(msg.contains("<tool_search>"));
        assert!(msg.contains("<tool_info>"));
        assert!(msg.contains("<tool_call>"));
    }

    #[test]
    fn test_first_turn_short_text_continues_silently() {
        let c = classify_text("Okay.", 1, false);
        assert_eq!(c.issue, Some(FormatIssue::SilentContinue));
        assert!(render_feedback(&c).is_none());
    }

    #[test]
    fn test_later_short_text_gets_detailed_help() {
        let c = classify_text("call api_poster", 2, true);
        assert_eq!(c.issue, Some(FormatIssue::NoToolCall));
        assert_eq!(c.intended_tool.as_deref(), Some("api_poster"));
        let msg = render_feedback(&c).unwrap();
        assert!(msg.contains("<tool_call>api_poster</tool_call>"));
    }

    #[test]
    fn test_malformed_tag_names_tool() {
        let c = classify_text("<tool-call>Data_Validator", 4, true);
        assert_eq!(c.issue, Some(FormatIssue::NoToolCall));
        assert_eq!(c.intended_tool.as_deref(), Some("data_validator"));
        assert!(c.evidence.iter().any(|e| e.contains("malformed tag")));
    }

    #[test]
    fn test_completion_signal_is_not_an_issue() {
        let c = classify_text(
            "Task completed. Everything in the pipeline ran as expected.",
            5,
            true,
        );
        assert_eq!(c.issue, None);
    }

    #[test]
    fn test_search_only_turn_is_searched_without_call() {
        let c = classify_text("<tool_search>fetch data</tool_search>", 1, false);
        assert_eq!(c.issue, Some(FormatIssue::SearchedWithoutCall));
        assert!(c.issue.unwrap().is_detailed());
    }

    #[test]
    fn test_search_and_call_together_is_fine() {
        let c = classify_text(
            "<tool_search>x</tool_search><tool_call>data_fetcher</tool_call>",
            2,
            true,
        );
        assert_eq!(c.issue, None);
    }

    #[test]
    fn test_distinguishes_searched_from_not_searched() {
        let reg = registry();
        let text = "hmm";
        let actions = parse_actions(text);
        let hits = vec!["data_fetcher".to_string()];
        let input = ClassifierInput {
            response: text,
            turn: 3,
            has_history: true,
            actions: &actions,
            registry: &reg,
            has_searched: true,
            has_called: false,
            recent_search_hits: &hits,
            min_length: 30,
        };
        let c = classify(&input);
        assert_eq!(c.issue, Some(FormatIssue::SearchedWithoutCall));
        assert_eq!(c.intended_tool.as_deref(), Some("data_fetcher"));

        let called = ClassifierInput {
            has_called: true,
            ..input
        };
        assert_eq!(classify(&called).issue, Some(FormatIssue::NoToolCall));
    }

    #[test]
    fn test_info_only_turn_is_not_an_issue() {
        let c = classify_text("<tool_info>api_poster</tool_info>", 2, true);
        assert_eq!(c.issue, None);
    }

    #[test]
    fn test_contains_word_boundaries() {
        assert!(contains_word("i will use it", "use"));
        assert!(!contains_word("a user appears", "use"));
        assert!(contains_word("let me try", "let me"));
    }
}
