//! Assistant assembly and multi-turn sessions.

use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use voyage_agent::{Conversation, ConversationError, DecisionProvider, Orchestrator, RunOutcome};
use voyage_core::VoyageConfig;
use voyage_model_providers::ollama;
use voyage_models::ModelRegistry;
use voyage_models::error::CreateModelError;
use voyage_tools::{RegistryError, ToolExecutor};
use voyage_travel::{
    CityDirectory, FlightSearch, HotelSearch, InMemoryBookingStore, SYSTEM_PROMPT, SearchError,
    SerpApiClient, TravelServices, UnconfiguredSearch, default_adapters, human_prompt,
    travel_registry,
};

/// Failures assembling the assistant.
#[derive(Debug, Error)]
pub enum AppError {
    /// The configured model cannot be resolved.
    #[error(transparent)]
    Model(#[from] CreateModelError),

    /// The tool registry could not be built.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// The search client could not be built.
    #[error(transparent)]
    Search(#[from] SearchError),
}

/// A configured assistant: the orchestrator plus the session's user id.
#[derive(Debug, Clone)]
pub struct App {
    orchestrator: Orchestrator,
    user_id: String,
}

impl App {
    /// Wraps an existing orchestrator.
    pub fn new(orchestrator: Orchestrator, user_id: impl Into<String>) -> Self {
        Self {
            orchestrator,
            user_id: user_id.into(),
        }
    }

    /// Builds the assistant described by `config`: the Ollama-backed model,
    /// SerpAPI search (or a search that reports it is not configured), an
    /// in-memory booking store and the travel tools.
    ///
    /// # Errors
    ///
    /// See [`AppError`].
    pub fn from_config(config: &VoyageConfig) -> Result<Self, AppError> {
        let mut models = ModelRegistry::new();
        ollama::register(&mut models, config.ollama_url.as_str());
        let llm = models.llm(&config.model_id)?;

        let (flights, hotels): (Arc<dyn FlightSearch>, Arc<dyn HotelSearch>) =
            match &config.serpapi_key {
                Some(key) => {
                    let client = Arc::new(SerpApiClient::new(
                        key.as_str(),
                        config.serpapi_endpoint.as_str(),
                    )?);
                    (client.clone(), client)
                }
                None => {
                    tracing::warn!("SERPAPI_KEY is not set; flight and hotel search are disabled");
                    (Arc::new(UnconfiguredSearch), Arc::new(UnconfiguredSearch))
                }
            };
        let cities = match &config.cities_path {
            Some(path) => CityDirectory::from_path(path),
            None => CityDirectory::builtin(),
        };

        let services = TravelServices::new(flights, hotels, Arc::new(InMemoryBookingStore::default()))
            .with_cities(Arc::new(cities));
        let executor = ToolExecutor::new(Arc::new(travel_registry(&services)?))
            .with_adapters(default_adapters(&config.user_id))
            .with_timeout(config.tool_timeout);

        let provider: Arc<dyn DecisionProvider> = Arc::new(llm);
        let orchestrator = Orchestrator::new(provider, executor)
            .with_max_iterations(config.max_iterations)
            .with_provider_timeout(config.provider_timeout);

        tracing::info!(
            model = %config.model_id,
            user_id = %config.user_id,
            search = config.serpapi_key.is_some(),
            "assistant ready"
        );
        Ok(Self::new(orchestrator, config.user_id.clone()))
    }

    /// Returns the session user id.
    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Starts a conversation seeded with the system prompt.
    #[must_use]
    pub fn session(&self) -> Session<'_> {
        Session {
            app: self,
            conversation: Conversation::new(SYSTEM_PROMPT),
        }
    }
}

/// A conversation kept across user messages.
#[derive(Debug)]
pub struct Session<'a> {
    app: &'a App,
    conversation: Conversation,
}

impl Session<'_> {
    /// Sends one user message and runs the loop to completion.
    ///
    /// The message is tagged with the user id. The session keeps every turn
    /// the run appended, including after a failure or cancellation. Tool
    /// requests left unanswered in the history are executed before the
    /// message is added.
    ///
    /// # Errors
    ///
    /// Fails only if a turn cannot be appended to the conversation.
    pub async fn send(
        &mut self,
        text: &str,
        cancel: &CancellationToken,
    ) -> Result<RunOutcome, ConversationError> {
        if !self.conversation.pending_calls().is_empty() {
            tracing::warn!(
                pending = self.conversation.pending_calls().len(),
                "answering leftover tool requests"
            );
            self.app
                .orchestrator
                .execute_pending(&mut self.conversation)
                .await?;
        }
        self.conversation
            .push_human(human_prompt(&self.app.user_id, text))?;
        let conversation = std::mem::replace(&mut self.conversation, Conversation::new(SYSTEM_PROMPT));
        let outcome = self.app.orchestrator.run(conversation, cancel).await;
        self.conversation = outcome.conversation.clone();
        Ok(outcome)
    }

    /// Returns the conversation so far.
    #[must_use]
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }
}
