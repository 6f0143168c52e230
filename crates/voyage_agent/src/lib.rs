//! Conversation state and the tool-calling orchestration loop.
//!
//! An [`Orchestrator`] alternates between asking a [`DecisionProvider`] for
//! the next assistant turn and executing the tools that turn requests,
//! feeding every result back into the [`Conversation`], until the model
//! answers without requesting tools.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//! use voyage_agent::Orchestrator;
//! use voyage_tools::{ToolExecutor, ToolRegistry};
//!
//! let llm = registry.llm("ollama/gemma3:4b")?;
//! let executor = ToolExecutor::new(Arc::new(tools));
//! let orchestrator = Orchestrator::new(Arc::new(llm), executor).with_max_iterations(8);
//!
//! let outcome = orchestrator
//!     .ask("You are a travel assistant.", "Flights from Pune to Goa tomorrow?", &CancellationToken::new())
//!     .await;
//! println!("{}", outcome.final_text().unwrap_or_default());
//! ```

pub mod conversation;
pub mod orchestrator;
pub mod provider;

pub use conversation::{Conversation, ConversationError};
pub use orchestrator::{LoopState, Orchestrator, OrchestratorConfig, RunError, RunOutcome};
pub use provider::{AssistantReply, DecisionProvider, ProviderError};
