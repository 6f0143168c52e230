//! A tool-calling travel assistant.
//!
//! Voyage drives a conversation between a language model and a set of
//! travel tools: the model decides, the tools act, and the loop repeats
//! until the model answers or a bound is reached.
//!
//! ```no_run
//! use std::sync::Arc;
//! use voyage::prelude::*;
//! use voyage::voyage_travel::{InMemoryBookingStore, UnconfiguredSearch, SYSTEM_PROMPT};
//! use voyage::voyage_model_providers::ollama;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let mut models = ModelRegistry::new();
//! ollama::register(&mut models, ollama::DEFAULT_BASE_URL);
//! let llm = models.llm("ollama/gemma3:4b")?;
//!
//! let services = TravelServices::new(
//!     Arc::new(UnconfiguredSearch),
//!     Arc::new(UnconfiguredSearch),
//!     Arc::new(InMemoryBookingStore::default()),
//! );
//! let executor = ToolExecutor::new(Arc::new(travel_registry(&services)?))
//!     .with_adapters(default_adapters("u1"));
//! let orchestrator = Orchestrator::new(Arc::new(llm), executor);
//!
//! let outcome = orchestrator
//!     .ask(SYSTEM_PROMPT, human_prompt("u1", "Airport code for Pune?"), &CancellationToken::new())
//!     .await;
//! println!("{}", outcome.final_text().unwrap_or_default());
//! # Ok(())
//! # }
//! ```

pub use voyage_internal::*;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use voyage_internal::prelude::*;
}
