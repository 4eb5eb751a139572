//! Presentation layer for tooltrial
//!
//! This crate contains CLI definitions, output formatters
//! and progress reporters for suite runs.

pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, Command, OutputFormat, RunArgs};
pub use output::console::ConsoleFormatter;
pub use output::summary::{EpisodeOutcome, SuiteSummary};
pub use progress::reporter::{EpisodeProgressBar, SuiteProgress};
