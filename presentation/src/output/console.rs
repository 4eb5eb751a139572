//! Console output formatter for suite results

use super::summary::{EpisodeOutcome, SuiteSummary};
use colored::Colorize;
use serde_json::json;
use tooltrial_domain::{EpisodeResult, VerdictKind};

/// Formats suite results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format every outcome followed by the summary table
    pub fn format(outcomes: &[EpisodeOutcome], model: &str) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("tooltrial Results"));
        output.push('\n');
        output.push_str(&format!("{} {}\n", "Model:".cyan().bold(), model));
        output.push_str(&format!("{} {}\n", "Tasks:".cyan().bold(), outcomes.len()));

        output.push_str(&Self::section_header("Episodes"));
        for outcome in outcomes {
            output.push_str(&Self::outcome_line(outcome));
            output.push('\n');
        }

        output.push_str(&Self::section_header("Summary"));
        output.push_str(&Self::summary_table(&SuiteSummary::from_outcomes(outcomes)));
        output.push_str(&Self::footer());
        output
    }

    /// Format as JSON: every outcome plus the summary
    pub fn format_json(outcomes: &[EpisodeOutcome], model: &str) -> String {
        let value = json!({
            "model": model,
            "summary": SuiteSummary::from_outcomes(outcomes),
            "episodes": outcomes,
        });
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
    }

    /// One status line for an outcome
    pub fn outcome_line(outcome: &EpisodeOutcome) -> String {
        match outcome {
            EpisodeOutcome::Finished(result) => Self::result_line(result),
            EpisodeOutcome::NotRun { task_id, reason } => {
                format!("{} {} {}", "-".dimmed(), task_id.bold(), reason.dimmed())
            }
        }
    }

    fn result_line(result: &EpisodeResult) -> String {
        let badge = match result.verdict.kind {
            VerdictKind::FullSuccess => "FULL   ".green().bold(),
            VerdictKind::PartialSuccess => "PARTIAL".yellow().bold(),
            VerdictKind::Failure if !result.verdict.workflow_attributable => {
                "PROVIDER".magenta().bold()
            }
            VerdictKind::Failure => "FAIL   ".red().bold(),
        };
        let mut line = format!(
            "{} {} ({} turns, coverage {:.0}%",
            badge,
            result.task_id.bold(),
            result.turns_used,
            result.verdict.coverage * 100.0
        );
        if result.format_error_count > 0 {
            line.push_str(&format!(", {} format errors", result.format_error_count));
        }
        line.push(')');
        if !result.verdict.is_full_success() {
            line.push_str(&format!("\n{}", Self::indent(&result.diagnostic_message, "    ")));
        }
        line
    }

    /// Summary counts as an aligned table
    pub fn summary_table(summary: &SuiteSummary) -> String {
        let rate = summary
            .full_success_rate()
            .map(|r| format!("{:.1}%", r * 100.0))
            .unwrap_or_else(|| "n/a".to_string());
        let rows = [
            ("Full success", summary.full_success.to_string().green()),
            ("Partial success", summary.partial_success.to_string().yellow()),
            ("Failure", summary.failure.to_string().red()),
            ("  provider failures", summary.provider_failures.to_string().magenta()),
            ("  loop terminations", summary.loop_terminations.to_string().normal()),
            ("Not run", summary.not_run.to_string().dimmed()),
            ("Format errors", summary.format_errors.to_string().normal()),
            ("Mean coverage", format!("{:.1}%", summary.mean_coverage * 100.0).normal()),
            ("Mean turns", format!("{:.1}", summary.mean_turns).normal()),
            ("Full success rate", rate.bold()),
        ];
        rows.iter()
            .map(|(label, value)| format!("  {:<20} {}\n", label, value))
            .collect()
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
