//! Configuration file loading for tooltrial
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `TOOLTRIAL_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./tooltrial.toml` or `./.tooltrial.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/tooltrial/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileDeploymentsConfig, FileEpisodeConfig,
    FileOutputConfig, FileProviderConfig, FileRateLimitConfig, FileRetryConfig,
    FileSimulatorConfig,
};
pub use loader::ConfigLoader;
