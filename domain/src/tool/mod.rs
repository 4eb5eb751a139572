//! Tool domain module
//!
//! Tools are never really executed. The model names them with action tags,
//! the registry resolves the names, and a simulator decides the outcome.
//!
//! ```text
//! ┌────────────────┐    ┌───────────────┐    ┌─────────────────────┐
//! │ ToolCapability │───▶│ ToolRegistry  │───▶│ ToolExecutionResult │
//! │ (descriptor)   │    │ (fuzzy names) │    │ (success / failure) │
//! └────────────────┘    └───────────────┘    └─────────────────────┘
//! ```
//!
//! # Name resolution
//!
//! Models misspell tool names (`Data_Validator`, `validator`,
//! `api_poster_v2`). [`ToolRegistry::resolve`] corrects these without another
//! model round-trip: verbatim, then case-insensitive, then substring in either
//! direction, first registered match wins.
//!
//! # Categories
//!
//! Each capability is tagged with a [`ToolCategory`] when registered. The
//! simulator dispatches on it to synthesize outputs and decorate errors.

pub mod category;
pub mod entities;
pub mod value_objects;

pub use category::ToolCategory;
pub use entities::{ToolCapability, ToolErrorSpec, ToolParameter, ToolRegistry, ToolReturn};
pub use value_objects::{ExecutionMetadata, ToolExecutionResult, ToolFailure, ToolSearchHit};
