//! Output configuration from TOML (`[output]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// Directory for per-episode JSONL transcripts. Unset disables them.
    pub transcript_dir: Option<PathBuf>,
    /// Enable colored terminal output
    pub color: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            transcript_dir: None,
            color: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_deserialize() {
        let toml_str = r#"
[output]
transcript_dir = "runs/transcripts"
color = false
"#;
        let config: super::super::FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.output.transcript_dir,
            Some(PathBuf::from("runs/transcripts"))
        );
        assert!(!config.output.color);
    }
}
