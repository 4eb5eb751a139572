//! Run Episode use case
//!
//! Drives one bounded exchange between a model and the simulated tool
//! environment. Each turn starts in `AwaitingResponse` and moves to one
//! state depending on what the response contains:
//!
//! | Response                                   | State            |
//! |--------------------------------------------|------------------|
//! | provider failure                           | `Terminated`     |
//! | `tool_search` tags                         | `Searching`      |
//! | `tool_info` tags                           | `InfoQuery`      |
//! | no tags, long text, no completion phrase   | `NoActionHelp`   |
//! | no usable call otherwise                   | `FormatHelp`     |
//! | completion phrase, all required tools done | `Completed`      |
//! | `tool_call` tags                           | `ExecutingTools` |
//!
//! After every turn the termination policy runs (step cap, failure streak,
//! repeated tool). Reaching `max_turns` ends the loop without error. The
//! final state is then graded by the domain evaluator.

mod termination;
mod types;

pub use termination::check_termination;
pub use types::{RunEpisodeError, RunEpisodeInput};

use crate::config::EpisodeParams;
use crate::ports::conversation_logger::{
    API_ISSUE, ConversationEvent, ConversationLogger, EPISODE_END, FORMAT_FEEDBACK, LLM_RESPONSE,
    NoConversationLogger, TOOL_RESULT,
};
use crate::ports::episode_progress::{EpisodeProgressNotifier, NoEpisodeProgress};
use crate::ports::provider_client::ProviderClient;
use crate::ports::tool_executor::ToolExecutorPort;
use crate::ports::tool_search::ToolSearchPort;
use crate::use_cases::provider_call::ProviderCaller;
use crate::use_cases::shared::check_cancelled;
use serde_json::json;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tooltrial_domain::core::string::truncate;
use tooltrial_domain::{
    ActionCategory, ApiIssue, ClassifierInput, DomainError, EpisodePromptTemplate, EpisodeResult,
    EpisodeState, FormatIssue, ParsedActions, Role, SearchLogEntry, SuccessEvaluator,
    TerminationReason, ToolRegistry, TurnRecord, TurnState, TurnTag, classify,
    diagnostic_message, is_completion_signal, parse_actions, render_feedback, resolve_calls,
};
use tracing::{debug, info, warn};

/// Use case for running a single episode
pub struct RunEpisodeUseCase<
    P: ProviderClient + 'static,
    T: ToolExecutorPort + 'static,
    S: ToolSearchPort + 'static,
> {
    caller: ProviderCaller<P>,
    executor: Arc<T>,
    search: Arc<S>,
    params: EpisodeParams,
    logger: Arc<dyn ConversationLogger>,
    cancellation_token: Option<CancellationToken>,
}

impl<P, T, S> RunEpisodeUseCase<P, T, S>
where
    P: ProviderClient + 'static,
    T: ToolExecutorPort + 'static,
    S: ToolSearchPort + 'static,
{
    pub fn new(caller: ProviderCaller<P>, executor: Arc<T>, search: Arc<S>) -> Self {
        Self {
            caller,
            executor,
            search,
            params: EpisodeParams::default(),
            logger: Arc::new(NoConversationLogger),
            cancellation_token: None,
        }
    }

    /// Set the turn limits. The request timeout is applied to the caller.
    pub fn with_params(mut self, params: EpisodeParams) -> Self {
        self.caller = self.caller.with_timeout(params.request_timeout);
        self.params = params;
        self
    }

    /// Record the episode transcript through `logger`
    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Set a cancellation token for graceful interruption
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    pub async fn execute(&self, input: RunEpisodeInput) -> Result<EpisodeResult, RunEpisodeError> {
        self.execute_with_progress(input, &NoEpisodeProgress).await
    }

    pub async fn execute_with_progress(
        &self,
        input: RunEpisodeInput,
        progress: &dyn EpisodeProgressNotifier,
    ) -> Result<EpisodeResult, RunEpisodeError> {
        let RunEpisodeInput {
            task,
            registry,
            model,
        } = input;
        if registry.is_empty() {
            return Err(DomainError::EmptyRegistry.into());
        }
        task.validate(registry.names())?;

        let task_id = task.task_id.clone();
        info!(task_id = %task_id, model = %model, "Starting episode");
        progress.on_episode_start(&task_id, self.params.max_turns);

        let system_prompt = EpisodePromptTemplate::system(&task, &registry);
        let mut state = EpisodeState::new(&task);
        state.push_turn(
            TurnRecord::new(Role::User, EpisodePromptTemplate::task_prompt(&task), 0)
                .with_tag(TurnTag::TaskPrompt),
        );

        let mut last_hits: Vec<String> = Vec::new();
        let mut turns_used = 0;
        let mut termination = TerminationReason::MaxTurnsReached;
        let mut error_kind = None;

        for turn in 1..=self.params.max_turns {
            check_cancelled(&self.cancellation_token)?;
            turns_used = turn;
            progress.on_turn_start(turn);

            let conversation = state.to_conversation(&system_prompt);
            let call = self.caller.call(&conversation, &model, turn).await;
            for issue in call.issues {
                self.log_api_issue(&task_id, &issue);
                progress.on_api_issue(&issue);
                state.record_api_issue(issue);
            }

            let response = match call.outcome {
                Ok(text) => text,
                Err(e) => {
                    warn!(task_id = %task_id, turn, error = %e, "Provider failure ended the episode");
                    error_kind = Some(e.error_kind());
                    termination = TerminationReason::ProviderFailure;
                    progress.on_turn_state(turn, TurnState::Terminated);
                    break;
                }
            };

            let turn_state = self
                .handle_response(turn, &response, &registry, &mut state, &mut last_hits, progress)
                .await;
            debug!(task_id = %task_id, turn, state = %turn_state, "Turn processed");
            progress.on_turn_state(turn, turn_state);

            if turn_state == TurnState::Completed {
                termination = TerminationReason::Completed;
                break;
            }
            if let Some(reason) = check_termination(&state, &self.params) {
                warn!(task_id = %task_id, turn, reason = ?reason, "Episode terminated");
                termination = reason;
                progress.on_turn_state(turn, TurnState::Terminated);
                break;
            }
        }

        let evaluator =
            SuccessEvaluator::new().with_partial_threshold(self.params.partial_success_threshold);
        let verdict = match error_kind {
            Some(kind) => evaluator.evaluate_provider_failure(&state, kind),
            None => evaluator.evaluate(&state),
        };
        let diagnostic = diagnostic_message(&state, &verdict, error_kind);

        info!(
            task_id = %task_id,
            verdict = %verdict.kind,
            coverage = verdict.coverage,
            turns_used,
            termination = ?termination,
            "Episode finished"
        );
        self.logger.log(ConversationEvent::new(
            EPISODE_END,
            json!({
                "task_id": task_id,
                "verdict": verdict.kind,
                "coverage": verdict.coverage,
                "sequence_correct": verdict.sequence_correct,
                "workflow_attributable": verdict.workflow_attributable,
                "termination": termination,
                "error_kind": error_kind,
                "turns_used": turns_used,
                "format_error_count": state.format_error_count(),
                "diagnostic": diagnostic,
            }),
        ));

        let result = EpisodeResult::from_state(
            state,
            verdict,
            diagnostic,
            turns_used,
            termination,
            error_kind,
        );
        progress.on_episode_end(&result);
        Ok(result)
    }

    /// Route one model response and return the state the turn moved to.
    async fn handle_response(
        &self,
        turn: usize,
        response: &str,
        registry: &ToolRegistry,
        state: &mut EpisodeState,
        last_hits: &mut Vec<String>,
        progress: &dyn EpisodeProgressNotifier,
    ) -> TurnState {
        let has_history = state.has_history();
        state.push_turn(
            TurnRecord::new(Role::Assistant, response, turn).with_tag(TurnTag::ModelResponse),
        );
        self.logger.log(ConversationEvent::new(
            LLM_RESPONSE,
            json!({
                "task_id": state.task_id(),
                "turn": turn,
                "text": response,
            }),
        ));

        let actions = parse_actions(response);
        match actions.category() {
            Some(ActionCategory::Search) => {
                self.run_searches(turn, &actions.searches, state, last_hits).await;
                // Searching alone still does not call a tool.
                self.give_feedback(turn, response, has_history, &actions, registry, state, last_hits);
                TurnState::Searching
            }
            Some(ActionCategory::Info) => {
                let text = EpisodePromptTemplate::tool_info(&actions.infos, registry);
                state.push_turn(TurnRecord::new(Role::User, text, turn).with_tag(TurnTag::ToolInfo));
                TurnState::InfoQuery
            }
            Some(ActionCategory::Execute) | None => {
                if let Some(issue) =
                    self.give_feedback(turn, response, has_history, &actions, registry, state, last_hits)
                {
                    return match issue {
                        FormatIssue::SilentContinue => {
                            self.nudge(turn, EpisodePromptTemplate::continuation(), state);
                            TurnState::AwaitingResponse
                        }
                        FormatIssue::NoAction => TurnState::NoActionHelp,
                        FormatIssue::SearchedWithoutCall | FormatIssue::NoToolCall => {
                            TurnState::FormatHelp
                        }
                    };
                }

                let signaled = is_completion_signal(response);
                if signaled && state.all_required_succeeded() {
                    state.mark_completed();
                    return TurnState::Completed;
                }

                if !actions.has_calls() {
                    let pending = state.pending_required_count();
                    debug!(turn, pending, "Completion claimed with required tools missing");
                    self.nudge(turn, &EpisodePromptTemplate::premature_completion(pending), state);
                    return TurnState::AwaitingResponse;
                }

                self.execute_calls(turn, &actions, registry, state, progress).await;
                if signaled && state.all_required_succeeded() {
                    state.mark_completed();
                    return TurnState::Completed;
                }
                TurnState::ExecutingTools
            }
        }
    }

    async fn run_searches(
        &self,
        turn: usize,
        queries: &[String],
        state: &mut EpisodeState,
        last_hits: &mut Vec<String>,
    ) {
        let mut blocks = Vec::with_capacity(queries.len());
        for query in queries {
            let hits = match self.search.search(query, self.params.search_top_k).await {
                Ok(hits) => hits,
                Err(e) => {
                    warn!(query = %query, error = %e, "Tool search failed");
                    Vec::new()
                }
            };
            let names: Vec<String> = hits.iter().map(|h| h.tool_name.clone()).collect();
            debug!(turn, query = %query, results = ?names, "Tool search");
            state.record_search(SearchLogEntry {
                turn,
                query: query.clone(),
                results: names.clone(),
            });
            *last_hits = names;
            blocks.push((query.clone(), hits));
        }
        let text = EpisodePromptTemplate::search_results(&blocks);
        state.push_turn(TurnRecord::new(Role::User, text, turn).with_tag(TurnTag::SearchResults));
    }

    /// Classify the response and append corrective feedback if it needs any.
    #[allow(clippy::too_many_arguments)]
    fn give_feedback(
        &self,
        turn: usize,
        response: &str,
        has_history: bool,
        actions: &ParsedActions,
        registry: &ToolRegistry,
        state: &mut EpisodeState,
        last_hits: &[String],
    ) -> Option<FormatIssue> {
        let classification = classify(&ClassifierInput {
            response,
            turn,
            has_history,
            actions,
            registry,
            has_searched: !state.search_log().is_empty(),
            has_called: !state.execution_history().is_empty(),
            recent_search_hits: last_hits,
            min_length: self.params.no_action_min_length,
        });
        let issue = classification.issue?;

        if let Some(text) = render_feedback(&classification) {
            debug!(
                turn,
                issue = ?issue,
                intended = ?classification.intended_tool,
                evidence = ?classification.evidence,
                "Format feedback"
            );
            self.logger.log(ConversationEvent::new(
                FORMAT_FEEDBACK,
                json!({
                    "task_id": state.task_id(),
                    "turn": turn,
                    "issue": format!("{:?}", issue),
                    "intended_tool": classification.intended_tool,
                    "evidence": classification.evidence,
                    "response_preview": truncate(response, 200),
                }),
            ));
            state.record_format_feedback(text, turn);
        }
        Some(issue)
    }

    async fn execute_calls(
        &self,
        turn: usize,
        actions: &ParsedActions,
        registry: &ToolRegistry,
        state: &mut EpisodeState,
        progress: &dyn EpisodeProgressNotifier,
    ) {
        let calls = resolve_calls(&actions.calls, registry);
        for name in &calls.dropped {
            warn!(turn, tool = %name, "Dropping call to unknown tool");
        }

        let mut results = Vec::with_capacity(calls.resolved.len());
        for name in &calls.resolved {
            let Some(capability) = registry.get(name) else {
                continue;
            };
            let result = self.executor.execute(capability, state).await;
            info!(
                turn,
                tool = %result.tool_name,
                success = result.success,
                attempt = result.metadata.attempt,
                "Tool executed"
            );
            self.logger.log(ConversationEvent::new(
                TOOL_RESULT,
                json!({
                    "task_id": state.task_id(),
                    "turn": turn,
                    "result": result,
                }),
            ));
            progress.on_tool_result(&result);
            state.record_execution(result.clone());
            results.push(result);

            if state.current_step() > self.params.max_steps {
                warn!(
                    turn,
                    skipped = calls.resolved.len() - results.len(),
                    "Step limit exceeded, rest of the batch not executed"
                );
                break;
            }
        }

        let text = EpisodePromptTemplate::tool_results(
            &results,
            &calls.dropped,
            state.pending_required_count(),
        );
        state.push_turn(TurnRecord::new(Role::User, text, turn).with_tag(TurnTag::ToolResults));
    }

    /// Append an uncounted user message so the model keeps going.
    fn nudge(&self, turn: usize, text: &str, state: &mut EpisodeState) {
        state.push_turn(TurnRecord::new(Role::User, text, turn).with_tag(TurnTag::Continuation));
    }

    fn log_api_issue(&self, task_id: &str, issue: &ApiIssue) {
        self.logger.log(ConversationEvent::new(
            API_ISSUE,
            json!({
                "task_id": task_id,
                "turn": issue.turn,
                "kind": issue.kind,
                "detail": issue.detail,
            }),
        ));
    }
}
