//! The model decision boundary.
//!
//! The orchestrator asks a [`DecisionProvider`] what to do next given the
//! conversation so far and the advertised tools. Any [`Llm`] handle is a
//! provider; tests substitute scripted ones.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use voyage_models::llm::{GenerationError, GenerationRequest, Llm, ToolCall, ToolDefinition, Turn};

/// Sampling temperature used for tool-calling decisions.
pub const DECISION_TEMPERATURE: f32 = 0.2;

/// The model's next move: optional text plus zero or more tool requests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssistantReply {
    /// Free text, if any.
    pub content: Option<String>,
    /// Requested tool calls, in order.
    pub tool_calls: Vec<ToolCall>,
}

impl AssistantReply {
    /// A final text answer.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            tool_calls: Vec::new(),
        }
    }

    /// A turn requesting tools.
    #[must_use]
    pub fn tools(tool_calls: Vec<ToolCall>) -> Self {
        Self {
            content: None,
            tool_calls,
        }
    }

    /// Returns whether the reply requests any tool.
    #[must_use]
    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }

    /// Converts the reply into an assistant turn.
    #[must_use]
    pub fn into_turn(self) -> Turn {
        Turn::Assistant {
            content: self.content,
            tool_calls: self.tool_calls,
        }
    }
}

impl From<Turn> for AssistantReply {
    fn from(turn: Turn) -> Self {
        match turn {
            Turn::Assistant {
                content,
                tool_calls,
            } => Self {
                content,
                tool_calls,
            },
            other => Self {
                content: other.text().map(str::to_string),
                tool_calls: Vec::new(),
            },
        }
    }
}

/// Why the provider could not produce a decision.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// Transport, authentication or response errors.
    #[error("model provider unavailable: {0}")]
    Unavailable(String),

    /// The provider did not answer within the allowed time.
    #[error("model provider timed out after {0:?}")]
    Timeout(Duration),
}

impl From<GenerationError> for ProviderError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::Timeout(after) => Self::Timeout(after),
            other => Self::Unavailable(other.to_string()),
        }
    }
}

/// Produces the next assistant turn for a conversation.
#[async_trait]
pub trait DecisionProvider: Send + Sync + 'static {
    /// Decides the next move given the full conversation and the available tools.
    async fn decide(
        &self,
        turns: &[Turn],
        tools: &[ToolDefinition],
    ) -> Result<AssistantReply, ProviderError>;
}

#[async_trait]
impl DecisionProvider for Llm {
    async fn decide(
        &self,
        turns: &[Turn],
        tools: &[ToolDefinition],
    ) -> Result<AssistantReply, ProviderError> {
        let request = GenerationRequest::from_turns(turns.to_vec())
            .tools(tools.to_vec())
            .auto_tool()
            .temperature(DECISION_TEMPERATURE);
        let response = self.generate(request).await?;
        Ok(response.into_turn().into())
    }
}
