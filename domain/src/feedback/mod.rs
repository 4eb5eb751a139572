//! Corrective feedback for responses that carry no usable action.

pub mod classifier;

pub use classifier::{
    ClassifierInput, FormatClassification, FormatIssue, INTENT_VERBS, classify, render_feedback,
};
