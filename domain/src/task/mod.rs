//! Task definitions: what an episode is asked to accomplish.

pub mod entities;

pub use entities::{TaskDefinition, TaskType};
