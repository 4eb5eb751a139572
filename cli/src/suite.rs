//! Concurrent suite runner
//!
//! Runs one episode per task, at most `concurrency` at a time. Episodes
//! share the provider caller (and with it the rate gate and deployment
//! rotation), the registry and the search index; each gets its own seeded
//! executor and transcript.

use futures::StreamExt;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tooltrial_application::{
    EpisodeParams, ProviderCaller, ProviderClient, RunEpisodeInput, RunEpisodeUseCase,
};
use tooltrial_domain::{TaskDefinition, ToolRegistry};
use tooltrial_infrastructure::{JsonlConversationLogger, KeywordToolSearch, SimulatedToolExecutor};
use tooltrial_presentation::{EpisodeOutcome, SuiteProgress};
use tracing::warn;

pub struct SuiteSettings {
    pub model: String,
    pub concurrency: usize,
    pub params: EpisodeParams,
    pub base_success_rate: f64,
    /// Episode `i` is seeded with `seed + i`
    pub seed: Option<u64>,
    pub transcript_dir: Option<PathBuf>,
}

impl SuiteSettings {
    fn executor(&self, index: usize) -> SimulatedToolExecutor {
        match self.seed {
            Some(seed) => {
                SimulatedToolExecutor::seeded(self.base_success_rate, seed.wrapping_add(index as u64))
            }
            None => SimulatedToolExecutor::from_entropy(self.base_success_rate),
        }
    }
}

/// Run every task; outcomes come back in task order.
pub async fn run_suite<P: ProviderClient + 'static>(
    caller: ProviderCaller<P>,
    registry: Arc<ToolRegistry>,
    tasks: Vec<TaskDefinition>,
    settings: &SuiteSettings,
    token: CancellationToken,
    progress: Option<&SuiteProgress>,
) -> Vec<EpisodeOutcome> {
    let search = Arc::new(KeywordToolSearch::new(Arc::clone(&registry)));

    let mut outcomes = futures::stream::iter(tasks.into_iter().enumerate())
        .map(|(index, task)| {
            let caller = caller.clone();
            let registry = Arc::clone(&registry);
            let search = Arc::clone(&search);
            let token = token.clone();
            async move {
                let task_id = task.task_id.clone();
                let mut use_case =
                    RunEpisodeUseCase::new(caller, Arc::new(settings.executor(index)), search)
                        .with_params(settings.params.clone())
                        .with_cancellation(token);
                if let Some(dir) = &settings.transcript_dir
                    && let Some(logger) = JsonlConversationLogger::for_task(dir, &task_id)
                {
                    use_case = use_case.with_conversation_logger(Arc::new(logger));
                }

                let input = RunEpisodeInput::new(task, registry, settings.model.clone());
                let bar = progress.map(|p| p.episode(&task_id));
                let result = match &bar {
                    Some(bar) => use_case.execute_with_progress(input, bar).await,
                    None => use_case.execute(input).await,
                };

                let outcome = match result {
                    Ok(result) => EpisodeOutcome::Finished(result),
                    Err(e) => {
                        if !e.is_cancelled() {
                            warn!(task_id = %task_id, error = %e, "Episode not run");
                        }
                        if let Some(bar) = &bar {
                            bar.skip();
                        }
                        EpisodeOutcome::NotRun {
                            task_id,
                            reason: e.to_string(),
                        }
                    }
                };
                (index, outcome)
            }
        })
        .buffer_unordered(settings.concurrency.max(1))
        .collect::<Vec<(usize, EpisodeOutcome)>>()
        .await;

    outcomes.sort_by_key(|(index, _)| *index);
    outcomes.into_iter().map(|(_, outcome)| outcome).collect()
}
