//! Infrastructure layer for tooltrial
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, plus configuration and catalog loading.

pub mod catalog;
pub mod config;
pub mod logging;
pub mod providers;
pub mod tools;

// Re-export commonly used types
pub use catalog::{LoaderError, load_registry, load_tasks};
pub use config::{ConfigLoader, ConfigValidationError, FileConfig};
pub use logging::JsonlConversationLogger;
pub use providers::{IntervalRateGate, OpenAiCompatibleClient, RotatingDeploymentManager};
pub use tools::{KeywordToolSearch, SimulatedToolExecutor};
