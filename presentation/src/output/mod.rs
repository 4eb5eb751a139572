//! Output formatting for suite results

pub mod console;
pub mod summary;
