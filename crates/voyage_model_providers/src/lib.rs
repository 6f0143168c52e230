//! Model provider backends for Voyage.
//!
//! Each provider implements [`LlmProvider`](voyage_models::llm::LlmProvider)
//! and registers itself with the [`ModelRegistry`](voyage_models::ModelRegistry)
//! under a provider name, so a model is chosen by identifier
//! (`"ollama/gemma3:4b"`).
//!
//! # Supported Providers
//!
//! | Provider | Name | Description |
//! |----------|------|-------------|
//! | Ollama | `ollama` | Ollama chat API, native tools plus inline JSON recovery |

pub mod ollama;

pub use ollama::OllamaProvider;
