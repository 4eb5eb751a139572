//! Completion signal detection.

/// Phrases that mark a response as a claim that the workflow is done.
pub const COMPLETION_PHRASES: &[&str] = &[
    "task completed",
    "task complete",
    "task is complete",
    "task has been completed",
    "workflow complete",
    "workflow is complete",
    "workflow has been completed",
    "finished executing",
    "all steps completed",
    "all steps are complete",
    "successfully completed all",
];

/// A response is a completion signal iff its lowercased text contains one
/// of [`COMPLETION_PHRASES`].
pub fn is_completion_signal(text: &str) -> bool {
    let lower = text.to_lowercase();
    COMPLETION_PHRASES.iter().any(|p| lower.contains(p))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_phrases_case_insensitively() {
        assert!(is_completion_signal("All done. TASK COMPLETED."));
        assert!(is_completion_signal("Workflow complete: report written."));
        assert!(is_completion_signal("I have finished executing the pipeline"));
    }

    #[test]
    fn test_ignores_unrelated_text() {
        assert!(!is_completion_signal("Let me call the next tool"));
        assert!(!is_completion_signal(""));
    }
}
