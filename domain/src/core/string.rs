//! String utilities for the domain layer.

/// Truncate a string to a maximum length with ellipsis (UTF-8 safe)
///
/// Uses byte length for max_len but ensures truncation occurs at valid
/// UTF-8 character boundaries.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        let target = max_len.saturating_sub(3);
        let mut end = target.min(s.len());
        while end > 0 && !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &s[..end])
    }
}

/// Split text into lowercase alphanumeric words.
///
/// Underscores and hyphens separate words, so `read_csv_file` yields
/// `["read", "csv", "file"]`.
pub fn words(s: &str) -> Vec<String> {
    s.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_ascii() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 8), "hello...");
    }

    #[test]
    fn test_truncate_multibyte() {
        // "é" is 2 bytes; the cut must not land inside it
        assert_eq!(truncate("ééééé", 7), "éé...");
        assert_eq!(truncate("ééééé", 20), "ééééé");
    }

    #[test]
    fn test_words_splits_identifiers() {
        assert_eq!(words("read_csv-File"), vec!["read", "csv", "file"]);
        assert_eq!(words("  fetch data! "), vec!["fetch", "data"]);
        assert!(words("___").is_empty());
    }
}
