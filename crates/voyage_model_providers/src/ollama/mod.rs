//! Ollama provider backend.
//!
//! Uses the `/api/chat` endpoint of a local or remote Ollama server, with
//! native tool definitions.
//!
//! ```no_run
//! use voyage_model_providers::ollama;
//! use voyage_models::ModelRegistry;
//!
//! let mut registry = ModelRegistry::new();
//! ollama::register(&mut registry, "http://localhost:11434");
//! let llm = registry.llm("ollama/gemma3:4b").unwrap();
//! ```

mod client;
mod provider;
mod types;

pub use client::{DEFAULT_BASE_URL, OllamaClient};
pub use provider::{DEFAULT_TEMPERATURE, OllamaProvider};

use std::sync::Arc;
use voyage_models::ModelRegistry;

/// Name the provider is registered under, as in `ollama/<model>`.
pub const PROVIDER_NAME: &str = "ollama";

/// Registers an [`OllamaProvider`] for the server at `base_url`.
///
/// # Panics
///
/// Panics if a provider named `ollama` is already registered.
pub fn register(registry: &mut ModelRegistry, base_url: impl Into<String>) {
    registry.register_llm_provider(PROVIDER_NAME, Arc::new(OllamaProvider::new(base_url)));
}
