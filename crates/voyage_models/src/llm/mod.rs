//! LLM (Large Language Model) generation capabilities.
//!
//! This module provides the core traits and types for text generation
//! with tool calling:
//!
//! - [`Turn`], the conversation log entry shared by the loop and providers
//! - [`ToolCall`] / [`ToolResult`], the tool-calling wire types
//! - [`LlmProvider`] and the [`Llm`] handle

mod error;
mod model;
mod provider;
mod types;

pub use error::GenerationError;
pub use model::Llm;
pub use provider::LlmProvider;
pub use types::{
    AssistantBlock, GenerationRequest, GenerationResponse, Role, ToolCall, ToolChoice,
    ToolDefinition, ToolFunction, ToolResult, ToolResultStatus, Turn, Usage,
};
