//! # Voyage Internal Library
//!
//! Re-exports the core Voyage crates for convenience.

/// Conversation turns, the provider interface and the model registry.
pub use voyage_models;

/// Tool definitions, registry and executor.
pub use voyage_tools;

/// Conversation state and the orchestration loop.
pub use voyage_agent;

/// Model provider backends.
pub use voyage_model_providers;

/// Travel tools and their collaborators.
pub use voyage_travel;

/// Configuration and tracing setup.
pub use voyage_core;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use voyage_agent::{
        AssistantReply, Conversation, DecisionProvider, Orchestrator, OrchestratorConfig,
        ProviderError, RunError, RunOutcome,
    };
    pub use voyage_core::{TracingFormat, TracingSetup, VoyageConfig};
    pub use voyage_models::ModelRegistry;
    pub use voyage_models::llm::{Llm, Role, ToolCall, ToolDefinition, ToolResult, Turn};
    pub use voyage_tools::{
        AdapterSet, FunctionCall, FunctionMetadata, ParameterInfo, Tool, ToolError,
        ToolExecutor, ToolFailure, ToolRegistry,
    };
    pub use voyage_travel::{TravelServices, default_adapters, human_prompt, travel_registry};
}
