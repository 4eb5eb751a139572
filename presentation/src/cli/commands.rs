//! CLI command definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for suite results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One line per episode plus a summary table
    Table,
    /// Full episode results and summary as JSON
    Json,
}

/// CLI arguments for tooltrial
#[derive(Parser, Debug)]
#[command(name = "tooltrial")]
#[command(author, version, about = "Interactive tool-calling execution engine")]
#[command(long_about = r#"
tooltrial runs a model through multi-turn tool-calling episodes against a
simulated tool environment and grades each episode.

Every episode gives the model a task and a tool catalog. The model searches,
inspects and calls tools through <tool_search>, <tool_info> and <tool_call>
tags; tool outcomes are simulated; the final state is graded FullSuccess,
PartialSuccess or Failure.

Configuration is loaded from (highest priority first):
1. TOOLTRIAL_* environment variables (e.g. TOOLTRIAL_PROVIDER__MODEL)
2. --config <path>       Explicit config file
3. ./tooltrial.toml      Project-level config
4. ~/.config/tooltrial/config.toml   Global config

Example:
  tooltrial run --tasks tasks.json --tools tools.json
  tooltrial run --tasks tasks.json --tools tools.json -m gpt-4o -c 8 --seed 42
  tooltrial show-config
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Also write diagnostic logs to this file
    #[arg(long, value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one episode per task and grade them
    Run(RunArgs),

    /// Show configuration sources and the merged configuration
    ShowConfig,
}

/// Arguments of `tooltrial run`. Flags override the loaded configuration.
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// JSON file with the task list
    #[arg(long, value_name = "PATH")]
    pub tasks: PathBuf,

    /// JSON file with the tool capability descriptors
    #[arg(long, value_name = "PATH")]
    pub tools: PathBuf,

    /// Logical model to run against
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Episodes run at the same time
    #[arg(short = 'c', long, default_value_t = 4, value_parser = clap::value_parser!(u16).range(1..))]
    pub concurrency: u16,

    /// Seed for reproducible tool outcomes
    #[arg(long)]
    pub seed: Option<u64>,

    /// Base success rate of simulated tools
    #[arg(long, value_name = "RATE")]
    pub base_success_rate: Option<f64>,

    /// Maximum turns per episode
    #[arg(long, value_name = "N")]
    pub max_turns: Option<usize>,

    /// Requests per minute per model
    #[arg(long, value_name = "RPM")]
    pub requests_per_minute: Option<u32>,

    /// Write one JSONL transcript per episode into this directory
    #[arg(long, value_name = "DIR")]
    pub transcripts: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: OutputFormat,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,
}
