//! Episode grading: verdict, measurements and diagnostic message.

mod diagnostic;
mod evaluator;
mod verdict;

pub use diagnostic::{FailureClass, diagnostic_message, most_informative_failure};
pub use evaluator::{
    DEFAULT_PARTIAL_THRESHOLD, OUTPUT_KEYWORDS, PARTIAL_COVERAGE, SuccessEvaluator,
    is_output_tool,
};
pub use verdict::{Verdict, VerdictKind};
