//! Core types for LLM generation requests and responses.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ─────────────────────
// Request / Response
// ─────────────────────

/// A generation request to a model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// The conversation so far, oldest first. System turns are included here.
    pub turns: Vec<Turn>,
    /// Available tools the model can call.
    pub tools: Option<Vec<ToolDefinition>>,
    /// How the model should choose tools.
    pub tool_choice: Option<ToolChoice>,
    /// Sampling temperature override.
    pub temperature: Option<f32>,
}

impl GenerationRequest {
    /// Creates a new generation request with a human turn.
    ///
    /// # Example
    ///
    /// ```rust
    /// use voyage_models::llm::GenerationRequest;
    ///
    /// let request = GenerationRequest::new("Find me a hotel in Goa");
    /// assert_eq!(request.turns.len(), 1);
    /// ```
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self::from_turns(vec![Turn::human(message)])
    }

    /// Creates a new generation request with a system prompt and human turn.
    #[must_use]
    pub fn with_system(system: impl Into<String>, message: impl Into<String>) -> Self {
        Self::from_turns(vec![Turn::system(system), Turn::human(message)])
    }

    /// Creates a request carrying a full conversation.
    #[must_use]
    pub fn from_turns(turns: Vec<Turn>) -> Self {
        Self {
            turns,
            tools: None,
            tool_choice: None,
            temperature: None,
        }
    }

    /// Adds conversation history before the current turns.
    ///
    /// The turns provided will be prepended to the existing turns.
    #[must_use]
    pub fn history(mut self, mut turns: Vec<Turn>) -> Self {
        turns.append(&mut self.turns);
        self.turns = turns;
        self
    }

    /// Adds a single tool to the request.
    ///
    /// This can be called multiple times to add multiple tools.
    #[must_use]
    pub fn tool(mut self, tool: ToolDefinition) -> Self {
        self.tools.get_or_insert_with(Vec::new).push(tool);
        self
    }

    /// Sets all available tools, replacing any previously added tools.
    ///
    /// An empty list clears the tools entirely.
    #[must_use]
    pub fn tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = if tools.is_empty() { None } else { Some(tools) };
        self
    }

    /// Sets how the model should choose tools.
    #[must_use]
    pub fn tool_choice(mut self, choice: ToolChoice) -> Self {
        self.tool_choice = Some(choice);
        self
    }

    /// Allows the model to decide whether to call tools.
    ///
    /// Shorthand for `.tool_choice(ToolChoice::Auto)`.
    #[must_use]
    pub fn auto_tool(mut self) -> Self {
        self.tool_choice = Some(ToolChoice::Auto);
        self
    }

    /// Prevents the model from calling any tools.
    ///
    /// Shorthand for `.tool_choice(ToolChoice::None)`.
    #[must_use]
    pub fn no_tool(mut self) -> Self {
        self.tool_choice = Some(ToolChoice::None);
        self
    }

    /// Sets the sampling temperature.
    #[must_use]
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// A generation response from a model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResponse {
    /// The generated content blocks.
    pub content: Vec<AssistantBlock>,
    /// Token usage information.
    pub usage: Usage,
}

impl GenerationResponse {
    /// Creates a text-only response.
    #[must_use]
    pub fn from_text(text: impl Into<String>, usage: Usage) -> Self {
        Self {
            content: vec![AssistantBlock::Text(text.into())],
            usage,
        }
    }

    /// Returns all text content blocks concatenated into a single string.
    ///
    /// Returns an empty string if no text content is found.
    #[must_use]
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|block| match block {
                AssistantBlock::Text(text) => Some(text.as_str()),
                AssistantBlock::ToolCall(_) => None,
            })
            .collect::<Vec<_>>()
            .join("")
    }

    /// Returns the tool calls in the order the model emitted them.
    #[must_use]
    pub fn tool_calls(&self) -> Vec<&ToolCall> {
        self.content
            .iter()
            .filter_map(|block| match block {
                AssistantBlock::ToolCall(call) => Some(call),
                AssistantBlock::Text(_) => None,
            })
            .collect()
    }

    /// Converts the response into an assistant [`Turn`].
    ///
    /// Text blocks are joined; whitespace-only text becomes `None`.
    #[must_use]
    pub fn into_turn(self) -> Turn {
        let mut text = String::new();
        let mut tool_calls = Vec::new();
        for block in self.content {
            match block {
                AssistantBlock::Text(chunk) => text.push_str(&chunk),
                AssistantBlock::ToolCall(call) => tool_calls.push(call),
            }
        }
        let content = if text.trim().is_empty() {
            None
        } else {
            Some(text)
        };
        Turn::Assistant {
            content,
            tool_calls,
        }
    }
}

/// Token usage information.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Usage {
    /// Number of tokens in the input.
    pub input_tokens: Option<u64>,
    /// Number of tokens in the output.
    pub output_tokens: Option<u64>,
    /// Total tokens (input + output).
    pub total_tokens: Option<u64>,
}

// ─────────────────────
// Turns
// ─────────────────────

/// Speaker of a [`Turn`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// System prompt.
    System,
    /// End user.
    Human,
    /// The model.
    Assistant,
    /// Output of an executed tool.
    Tool,
}

/// One entry in a conversation log.
///
/// An assistant turn may carry tool calls; each of them is answered by
/// exactly one [`Turn::ToolResult`] before the next assistant turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Turn {
    /// Instructions for the model.
    System {
        /// The system prompt.
        content: String,
    },
    /// A message from the user.
    Human {
        /// The user's text.
        content: String,
    },
    /// A message from the model.
    Assistant {
        /// Free-text content, if any.
        content: Option<String>,
        /// Tool invocations requested by the model, in order.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        tool_calls: Vec<ToolCall>,
    },
    /// The result of one tool invocation.
    ToolResult(ToolResult),
}

impl Turn {
    /// Creates a system turn.
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self::System {
            content: content.into(),
        }
    }

    /// Creates a human turn.
    #[must_use]
    pub fn human(content: impl Into<String>) -> Self {
        Self::Human {
            content: content.into(),
        }
    }

    /// Creates an assistant turn with text content and no tool calls.
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::Assistant {
            content: Some(content.into()),
            tool_calls: Vec::new(),
        }
    }

    /// Creates an assistant turn requesting tool calls.
    #[must_use]
    pub fn tool_request(tool_calls: Vec<ToolCall>) -> Self {
        Self::Assistant {
            content: None,
            tool_calls,
        }
    }

    /// Returns the role of this turn.
    #[must_use]
    pub fn role(&self) -> Role {
        match self {
            Self::System { .. } => Role::System,
            Self::Human { .. } => Role::Human,
            Self::Assistant { .. } => Role::Assistant,
            Self::ToolResult(_) => Role::Tool,
        }
    }

    /// Returns the text content of a system, human or assistant turn.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::System { content } | Self::Human { content } => Some(content),
            Self::Assistant { content, .. } => content.as_deref(),
            Self::ToolResult(_) => None,
        }
    }

    /// Returns the tool calls of an assistant turn (empty for other turns).
    #[must_use]
    pub fn tool_calls(&self) -> &[ToolCall] {
        match self {
            Self::Assistant { tool_calls, .. } => tool_calls,
            _ => &[],
        }
    }

    /// Returns the tool result carried by this turn, if any.
    #[must_use]
    pub fn as_tool_result(&self) -> Option<&ToolResult> {
        match self {
            Self::ToolResult(result) => Some(result),
            _ => None,
        }
    }
}

// ─────────────────────
// Content Blocks
// ─────────────────────

/// Content that can appear in a model response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AssistantBlock {
    /// Plain text content.
    Text(String),
    /// A tool call request from the model.
    ToolCall(ToolCall),
}

impl AssistantBlock {
    /// Creates a text content block.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Creates a tool call content block.
    #[must_use]
    pub fn tool_call(call: ToolCall) -> Self {
        Self::ToolCall(call)
    }
}

// ─────────────────────
// Tool Calling
// ─────────────────────

/// Definition of a tool that can be called by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Name of the tool (e.g., `city_code`, `flights_finder`).
    pub name: String,
    /// Human-readable description of what the tool does.
    pub description: String,
    /// JSON Schema defining the tool's parameters.
    ///
    /// This is an object schema with properties defining each parameter.
    /// Example:
    /// ```json
    /// {
    ///   "type": "object",
    ///   "properties": {
    ///     "city_name": {"type": "string", "description": "City to look up"}
    ///   },
    ///   "required": ["city_name"]
    /// }
    /// ```
    pub parameters: Value,
}

/// Controls how the model should select tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolChoice {
    /// Model decides whether to call tools or respond with text.
    Auto,
    /// Model must call at least one tool.
    Required,
    /// Model must call this specific tool.
    Specific(String),
    /// Model must not call any tools.
    None,
}

/// A tool call request from the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Identifier of this call, unique within one assistant turn.
    pub id: String,
    /// The function to call.
    pub function: ToolFunction,
}

impl ToolCall {
    /// Creates a tool call.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: Value) -> Self {
        Self {
            id: id.into(),
            function: ToolFunction {
                name: name.into(),
                arguments,
            },
        }
    }

    /// Returns the requested tool name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.function.name
    }
}

/// A tool function to be called.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolFunction {
    /// The name of the function to call.
    pub name: String,
    /// The raw arguments proposed by the model.
    pub arguments: Value,
}

/// Status of a tool result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolResultStatus {
    /// The tool executed successfully.
    #[default]
    Success,
    /// The tool call failed; `content` describes the failure.
    Error,
}

/// Result of a tool call execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    /// Identifier of the [`ToolCall`] this result answers.
    pub call_id: String,
    /// Name of the tool that was requested.
    pub name: String,
    /// The success value or a structured error description.
    pub content: Value,
    /// Whether this result represents a success or error.
    #[serde(default)]
    pub status: ToolResultStatus,
}

impl ToolResult {
    /// Creates a successful result.
    #[must_use]
    pub fn success(call_id: impl Into<String>, name: impl Into<String>, content: Value) -> Self {
        Self {
            call_id: call_id.into(),
            name: name.into(),
            content,
            status: ToolResultStatus::Success,
        }
    }

    /// Creates an error result.
    #[must_use]
    pub fn error(call_id: impl Into<String>, name: impl Into<String>, content: Value) -> Self {
        Self {
            call_id: call_id.into(),
            name: name.into(),
            content,
            status: ToolResultStatus::Error,
        }
    }

    /// Returns `true` if the result describes a failure.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.status == ToolResultStatus::Error
    }

    /// Renders the content the way it is shown to a model: strings verbatim,
    /// everything else as compact JSON.
    #[must_use]
    pub fn content_text(&self) -> String {
        match &self.content {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn response_into_turn_keeps_call_order() {
        let response = GenerationResponse {
            content: vec![
                AssistantBlock::text("Looking up codes."),
                AssistantBlock::tool_call(ToolCall::new("a", "city_code", json!({"city_name": "Pune"}))),
                AssistantBlock::tool_call(ToolCall::new("b", "city_code", json!({"city_name": "Goa"}))),
            ],
            usage: Usage::default(),
        };

        let turn = response.into_turn();
        assert_eq!(turn.text(), Some("Looking up codes."));
        let ids: Vec<_> = turn.tool_calls().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
    }

    #[test]
    fn blank_text_becomes_none() {
        let response = GenerationResponse::from_text("  \n", Usage::default());
        let turn = response.into_turn();
        assert_eq!(turn.text(), None);
        assert!(turn.tool_calls().is_empty());
    }

    #[test]
    fn turn_serializes_with_role_tag() {
        let turn = Turn::ToolResult(ToolResult::success("c1", "city_code", json!("BLR")));
        let value = serde_json::to_value(&turn).unwrap();
        assert_eq!(value["role"], "tool_result");
        assert_eq!(value["call_id"], "c1");
        assert_eq!(value["status"], "success");

        let back: Turn = serde_json::from_value(value).unwrap();
        assert_eq!(back, turn);
    }

    #[test]
    fn empty_tool_list_clears_tools() {
        let request = GenerationRequest::new("hi").tools(Vec::new());
        assert!(request.tools.is_none());
    }

    #[test]
    fn content_text_passes_strings_through() {
        let text = ToolResult::success("1", "city_code", json!("BOM"));
        assert_eq!(text.content_text(), "BOM");

        let object = ToolResult::error("2", "x", json!({"error": "unknown_tool"}));
        assert_eq!(object.content_text(), r#"{"error":"unknown_tool"}"#);
        assert!(object.is_error());
    }
}
