//! Conversation types and model provider interface for Voyage.
//!
//! Provides a unified interface for language model access, decoupling the
//! orchestration loop from provider implementations.
//!
//! # Overview
//!
//! - Provider-agnostic: the agent depends only on this crate, never on a
//!   specific provider crate. Provider output is adapted into [`llm::Turn`]s.
//!
//! - Runtime registration: provider crates register themselves with the
//!   [`ModelRegistry`], so the model can be swapped through configuration
//!   (e.g. `"ollama/gemma3:4b"`).
//!
//! # Example
//!
//! ```ignore
//! use voyage_models::ModelRegistry;
//! use voyage_models::llm::GenerationRequest;
//!
//! let llm = registry.llm("ollama/gemma3:4b")?;
//!
//! let request = GenerationRequest::with_system("You are a travel assistant", "Hello!");
//! let response = llm.generate(request).await?;
//! println!("{}", response.text());
//! ```

pub mod error;
pub mod llm;
mod registry;

pub use registry::ModelRegistry;
