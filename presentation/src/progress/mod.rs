//! Progress reporting while episodes run

pub mod reporter;
