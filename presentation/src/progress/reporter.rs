//! Progress reporting for suite runs

use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicUsize, Ordering};
use tooltrial_application::EpisodeProgressNotifier;
use tooltrial_domain::{ApiIssue, EpisodeResult, ToolExecutionResult, TurnState, VerdictKind};

/// Suite-wide progress: an overall bar plus one spinner per running episode
pub struct SuiteProgress {
    multi: MultiProgress,
    overall: ProgressBar,
}

impl SuiteProgress {
    pub fn new(total_tasks: usize) -> Self {
        let multi = MultiProgress::new();
        let overall = multi.add(ProgressBar::new(total_tasks as u64));
        overall.set_style(Self::suite_style());
        overall.set_prefix("Episodes");
        Self { multi, overall }
    }

    fn suite_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn episode_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    /// Spinner for one episode, removed when the episode ends
    pub fn episode(&self, task_id: &str) -> EpisodeProgressBar {
        let bar = self.multi.add(ProgressBar::new_spinner());
        bar.set_style(Self::episode_style());
        bar.set_prefix(task_id.to_string());
        bar.set_message("starting");
        EpisodeProgressBar {
            bar,
            overall: self.overall.clone(),
            max_turns: AtomicUsize::new(0),
        }
    }

    pub fn finish(&self) {
        self.overall.finish_with_message(format!("{}", "done".green()));
    }
}

/// Progress of one running episode
pub struct EpisodeProgressBar {
    bar: ProgressBar,
    overall: ProgressBar,
    max_turns: AtomicUsize,
}

impl EpisodeProgressBar {
    fn turns(&self) -> usize {
        self.max_turns.load(Ordering::Relaxed)
    }

    /// Clear the spinner of a task that produced no result
    pub fn skip(&self) {
        self.bar.finish_and_clear();
        self.overall
            .set_message(format!("{} {}", "-".dimmed(), self.bar.prefix()));
        self.overall.inc(1);
    }
}

impl EpisodeProgressNotifier for EpisodeProgressBar {
    fn on_episode_start(&self, _task_id: &str, max_turns: usize) {
        self.max_turns.store(max_turns, Ordering::Relaxed);
    }

    fn on_turn_start(&self, turn: usize) {
        self.bar.set_message(format!("turn {}/{}", turn, self.turns()));
        self.bar.tick();
    }

    fn on_turn_state(&self, turn: usize, state: TurnState) {
        self.bar.set_message(format!("turn {}/{} {}", turn, self.turns(), state));
    }

    fn on_tool_result(&self, result: &ToolExecutionResult) {
        let mark = if result.success { "v".green() } else { "x".red() };
        self.bar.set_message(format!("{} {}", mark, result.tool_name));
    }

    fn on_api_issue(&self, issue: &ApiIssue) {
        self.bar.set_message(format!("{} {}", "!".yellow(), issue.detail));
    }

    fn on_episode_end(&self, result: &EpisodeResult) {
        self.bar.finish_and_clear();
        let mark = match result.verdict.kind {
            VerdictKind::FullSuccess => "v".green(),
            VerdictKind::PartialSuccess => "~".yellow(),
            VerdictKind::Failure => "x".red(),
        };
        self.overall.set_message(format!("{} {}", mark, result.task_id));
        self.overall.inc(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tooltrial_domain::{
        EpisodeState, SuccessEvaluator, TaskDefinition, TaskType, TerminationReason,
    };

    #[test]
    fn test_episode_end_advances_overall_bar() {
        let suite = SuiteProgress::new(2);
        suite.multi.set_draw_target(indicatif::ProgressDrawTarget::hidden());

        let episode = suite.episode("t1");
        episode.on_episode_start("t1", 20);
        episode.on_turn_start(3);
        assert_eq!(episode.bar.message(), "turn 3/20");

        let state = EpisodeState::new(&TaskDefinition::new(
            "t1",
            TaskType::SimpleTask,
            "",
            vec!["fetch".to_string()],
        ));
        let verdict = SuccessEvaluator::new().evaluate(&state);
        let result = EpisodeResult::from_state(
            state,
            verdict,
            String::new(),
            3,
            TerminationReason::MaxTurnsReached,
            None,
        );
        episode.on_episode_end(&result);
        suite.episode("t2").skip();

        assert_eq!(suite.overall.position(), 2);
        assert!(episode.bar.is_finished());
    }
}
