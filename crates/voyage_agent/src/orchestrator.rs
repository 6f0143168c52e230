//! The tool-calling orchestration loop.
//!
//! ```text
//!            ┌───────────────┐  tool requests   ┌────────────────┐
//!  start ──▶ │ AwaitingModel │ ───────────────▶ │ ExecutingTools │
//!            └───────┬───────┘ ◀─────────────── └────────────────┘
//!                    │          all results in
//!      final answer, │
//!   provider failure │
//!   or bound reached ▼
//!               ┌────────┐
//!               │  Done  │
//!               └────────┘
//! ```
//!
//! Tool failures never end a run: they come back as error tool results and
//! the model is asked again. Provider failures and the iteration bound end
//! the run with a synthesized assistant turn and a [`RunError`].

use crate::conversation::{Conversation, ConversationError};
use crate::provider::{AssistantReply, DecisionProvider, ProviderError};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use voyage_models::llm::{ToolDefinition, ToolResult, Turn};
use voyage_tools::ToolExecutor;

/// Default bound on provider calls per run.
pub const DEFAULT_MAX_ITERATIONS: usize = 10;

/// Default time allowed for one provider call.
pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(60);

/// Appended when the iteration bound is reached.
pub const UNABLE_TO_COMPLETE: &str = "I wasn't able to finish this request within the allowed number of steps. \
     Please try rephrasing or narrowing it down.";

/// Appended when the model provider fails.
pub const PROVIDER_APOLOGY: &str = "Sorry, I couldn't reach the assistant service just now. Please try again in a moment.";

/// Position of a run in the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Waiting for the provider's next decision.
    AwaitingModel,
    /// Executing the requests of the latest assistant turn.
    ExecutingTools,
    /// Terminal.
    Done,
}

/// Why a run ended without a model-authored final answer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunError {
    /// The provider failed.
    #[error("model provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// The provider did not answer in time.
    #[error("model provider timed out after {0:?}")]
    ProviderTimeout(Duration),

    /// The model kept requesting tools past the iteration bound.
    #[error("exceeded {max} model iterations")]
    MaxIterationsExceeded {
        /// The configured bound.
        max: usize,
    },

    /// The run was cancelled by the caller.
    #[error("run cancelled")]
    Cancelled,

    /// The conversation handed to the run was not in a runnable state.
    #[error(transparent)]
    Conversation(#[from] ConversationError),
}

impl From<ProviderError> for RunError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Unavailable(message) => Self::ProviderUnavailable(message),
            ProviderError::Timeout(after) => Self::ProviderTimeout(after),
        }
    }
}

/// Loop tuning.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Maximum provider calls per run.
    pub max_iterations: usize,
    /// Time allowed for one provider call.
    pub provider_timeout: Duration,
    /// Text of the turn appended when the bound is reached.
    pub unable_to_complete: String,
    /// Text of the turn appended when the provider fails.
    pub apology: String,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            provider_timeout: DEFAULT_PROVIDER_TIMEOUT,
            unable_to_complete: UNABLE_TO_COMPLETE.to_string(),
            apology: PROVIDER_APOLOGY.to_string(),
        }
    }
}

/// What a run produced.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// The conversation, including every turn appended by the run.
    pub conversation: Conversation,
    /// Number of provider calls made.
    pub iterations: usize,
    /// Set when the run ended on a failure.
    pub failure: Option<RunError>,
}

impl RunOutcome {
    /// Returns the final assistant text, if the run produced one.
    #[must_use]
    pub fn final_text(&self) -> Option<&str> {
        match self.conversation.last() {
            Some(Turn::Assistant {
                content,
                tool_calls,
            }) if tool_calls.is_empty() => Some(content.as_deref().unwrap_or_default()),
            _ => None,
        }
    }

    /// Returns whether the model produced the final answer itself.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }
}

/// Drives the conversation between a [`DecisionProvider`] and a [`ToolExecutor`].
#[derive(Clone)]
pub struct Orchestrator {
    provider: Arc<dyn DecisionProvider>,
    executor: ToolExecutor,
    config: OrchestratorConfig,
}

impl core::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("executor", &self.executor)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Orchestrator {
    /// Creates an orchestrator with the default configuration.
    pub fn new(provider: Arc<dyn DecisionProvider>, executor: ToolExecutor) -> Self {
        Self {
            provider,
            executor,
            config: OrchestratorConfig::default(),
        }
    }

    /// Replaces the configuration.
    #[must_use]
    pub fn with_config(mut self, config: OrchestratorConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the bound on provider calls.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.config.max_iterations = max_iterations;
        self
    }

    /// Sets the per-call provider timeout.
    #[must_use]
    pub fn with_provider_timeout(mut self, timeout: Duration) -> Self {
        self.config.provider_timeout = timeout;
        self
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Starts a fresh conversation and runs it to completion.
    pub async fn ask(
        &self,
        system: impl Into<String>,
        text: impl Into<String>,
        cancel: &CancellationToken,
    ) -> RunOutcome {
        self.run(Conversation::seeded(system, text), cancel).await
    }

    /// Runs the loop until the model stops requesting tools, the provider
    /// fails, the iteration bound is reached or `cancel` fires.
    ///
    /// A conversation with outstanding tool requests resumes by executing
    /// them. A conversation with nothing to answer is returned unchanged
    /// with [`ConversationError::NothingToAnswer`].
    ///
    /// Cancellation is honored before each model call. Tool requests the
    /// model already made are executed first, so a cancelled run never
    /// leaves unanswered requests behind.
    pub async fn run(&self, mut conversation: Conversation, cancel: &CancellationToken) -> RunOutcome {
        let mut state = if !conversation.pending_calls().is_empty() {
            LoopState::ExecutingTools
        } else if conversation.awaits_reply() {
            LoopState::AwaitingModel
        } else {
            return RunOutcome {
                conversation,
                iterations: 0,
                failure: Some(ConversationError::NothingToAnswer.into()),
            };
        };

        let tools = self.executor.definitions();
        let mut iterations = 0;
        let mut failure = None;

        while state != LoopState::Done {
            state = match state {
                LoopState::AwaitingModel => {
                    // Only checked here: a batch already in the log always runs.
                    if cancel.is_cancelled() {
                        tracing::info!(iterations, "run cancelled");
                        failure = Some(RunError::Cancelled);
                        break;
                    }
                    if iterations >= self.config.max_iterations {
                        let err = RunError::MaxIterationsExceeded {
                            max: self.config.max_iterations,
                        };
                        tracing::error!(error = %err, "ending run");
                        conclude(&mut conversation, &self.config.unable_to_complete);
                        failure = Some(err);
                        break;
                    }
                    iterations += 1;
                    tracing::debug!(iteration = iterations, turns = conversation.len(), "awaiting model");

                    let decision = tokio::select! {
                        biased;
                        () = cancel.cancelled() => None,
                        decision = self.decide(&conversation, &tools) => Some(decision),
                    };
                    let Some(decision) = decision else {
                        tracing::info!(iterations, "run cancelled during model call");
                        failure = Some(RunError::Cancelled);
                        break;
                    };

                    match decision {
                        Err(err) => {
                            let err = RunError::from(err);
                            tracing::error!(error = %err, "ending run");
                            conclude(&mut conversation, &self.config.apology);
                            failure = Some(err);
                            LoopState::Done
                        }
                        Ok(reply) if reply.has_tool_calls() => {
                            tracing::debug!(requests = reply.tool_calls.len(), "model requested tools");
                            if let Err(err) = conversation.push(reply.into_turn()) {
                                failure = Some(err.into());
                                break;
                            }
                            LoopState::ExecutingTools
                        }
                        Ok(reply) => {
                            if reply.content.as_deref().is_none_or(|text| text.trim().is_empty()) {
                                tracing::warn!(iteration = iterations, "model returned an empty final answer");
                            }
                            if let Err(err) = conversation.push(reply.into_turn()) {
                                failure = Some(err.into());
                                break;
                            }
                            LoopState::Done
                        }
                    }
                }
                LoopState::ExecutingTools => {
                    if let Err(err) = self.execute_pending(&mut conversation).await {
                        failure = Some(err.into());
                        break;
                    }
                    LoopState::AwaitingModel
                }
                LoopState::Done => LoopState::Done,
            };
        }

        tracing::debug!(iterations, turns = conversation.len(), failed = failure.is_some(), "run finished");
        RunOutcome {
            conversation,
            iterations,
            failure,
        }
    }

    async fn decide(
        &self,
        conversation: &Conversation,
        tools: &[ToolDefinition],
    ) -> Result<AssistantReply, ProviderError> {
        let timeout = self.config.provider_timeout;
        match tokio::time::timeout(timeout, self.provider.decide(conversation.turns(), tools)).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout(timeout)),
        }
    }

    /// Executes every outstanding request in order without consulting the
    /// model. The batch is never interrupted, so the log always ends with a
    /// complete set of results.
    ///
    /// # Errors
    ///
    /// Fails only if a result cannot be appended to `conversation`.
    pub async fn execute_pending(&self, conversation: &mut Conversation) -> Result<(), ConversationError> {
        let calls = conversation.pending_calls().to_vec();
        for call in &calls {
            tracing::debug!(tool = %call.name(), call_id = %call.id, "executing tool");
            let outcome = self.executor.execute(call).await;
            conversation.push_tool_result(ToolResult::from(outcome))?;
        }
        Ok(())
    }
}

fn conclude(conversation: &mut Conversation, text: &str) {
    if let Err(err) = conversation.push(Turn::assistant(text)) {
        tracing::error!(error = %err, "could not append closing turn");
    }
}
