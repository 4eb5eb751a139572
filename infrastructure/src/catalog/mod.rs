//! Task and tool catalog loading
//!
//! Reads the JSON inputs of a suite run: the tool registry (an array of
//! capability descriptors) and the task list (an array of task
//! definitions, or an object with a `tasks` array).

mod loader;

pub use loader::{LoaderError, load_registry, load_tasks};
