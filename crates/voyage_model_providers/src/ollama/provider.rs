//! Ollama [`LlmProvider`] implementation.

use super::client::OllamaClient;
use super::types::{
    ChatMessage, ChatOptions, ChatRequest, ChatResponse, FunctionCallParam, FunctionDef, Role,
    ToolCallParam, ToolDef,
};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use voyage_models::llm::{
    AssistantBlock, GenerationError, GenerationRequest, GenerationResponse, LlmProvider, ToolCall,
    ToolChoice, ToolDefinition, Turn, Usage,
};

/// Temperature used when the request does not set one.
pub const DEFAULT_TEMPERATURE: f32 = 0.2;

/// Ollama [`LlmProvider`] implementation.
///
/// Ollama does not assign tool call ids, so the provider numbers calls
/// `call_1`, `call_2`, ... over its lifetime.
#[derive(Debug)]
pub struct OllamaProvider {
    client: OllamaClient,
    next_call: AtomicU64,
}

impl OllamaProvider {
    /// Creates a provider for the server at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: OllamaClient::new(base_url),
            next_call: AtomicU64::new(1),
        }
    }

    fn next_call_id(&self) -> String {
        format!("call_{}", self.next_call.fetch_add(1, Ordering::Relaxed))
    }

    fn convert_response(
        &self,
        response: ChatResponse,
        tools: &[ToolDefinition],
    ) -> GenerationResponse {
        let ChatResponse {
            message,
            prompt_eval_count,
            eval_count,
        } = response;

        let mut content = Vec::new();
        if message.tool_calls.is_empty() {
            match recover_inline_call(&message.content, tools) {
                Some((name, arguments)) => {
                    tracing::debug!(tool = %name, "recovered inline tool call from text");
                    content.push(AssistantBlock::ToolCall(ToolCall::new(
                        self.next_call_id(),
                        name,
                        arguments,
                    )));
                }
                None if !message.content.is_empty() => {
                    content.push(AssistantBlock::Text(message.content));
                }
                None => {}
            }
        } else {
            if !message.content.trim().is_empty() {
                content.push(AssistantBlock::Text(message.content));
            }
            for call in message.tool_calls {
                let id = call
                    .id
                    .filter(|id| !id.is_empty())
                    .unwrap_or_else(|| self.next_call_id());
                content.push(AssistantBlock::ToolCall(ToolCall::new(
                    id,
                    call.function.name,
                    call.function.arguments,
                )));
            }
        }

        GenerationResponse {
            content,
            usage: Usage {
                input_tokens: prompt_eval_count,
                output_tokens: eval_count,
                total_tokens: prompt_eval_count.zip(eval_count).map(|(i, o)| i + o),
            },
        }
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    async fn generate(
        &self,
        model: &str,
        request: GenerationRequest,
    ) -> Result<GenerationResponse, GenerationError> {
        let chat_request = convert_request(model, &request);
        tracing::debug!(
            model,
            messages = chat_request.messages.len(),
            tools = chat_request.tools.len(),
            "sending ollama chat request"
        );

        let response = self.client.chat(&chat_request).await?;

        let tools = request.tools.as_deref().unwrap_or_default();
        Ok(self.convert_response(response, tools))
    }
}

fn convert_request(model: &str, request: &GenerationRequest) -> ChatRequest {
    let tools = match (&request.tools, &request.tool_choice) {
        (_, Some(ToolChoice::None)) | (None, _) => Vec::new(),
        (Some(tools), Some(ToolChoice::Specific(name))) => tools
            .iter()
            .filter(|tool| &tool.name == name)
            .map(convert_tool)
            .collect(),
        (Some(tools), _) => tools.iter().map(convert_tool).collect(),
    };

    ChatRequest {
        model: model.to_string(),
        messages: request.turns.iter().map(convert_turn).collect(),
        tools,
        stream: false,
        options: ChatOptions {
            temperature: request.temperature.unwrap_or(DEFAULT_TEMPERATURE),
        },
    }
}

fn convert_tool(tool: &ToolDefinition) -> ToolDef {
    ToolDef {
        kind: "function",
        function: FunctionDef {
            name: tool.name.clone(),
            description: tool.description.clone(),
            parameters: tool.parameters.clone(),
        },
    }
}

fn convert_turn(turn: &Turn) -> ChatMessage {
    match turn {
        Turn::System { content } => ChatMessage::text(Role::System, content.clone()),
        Turn::Human { content } => ChatMessage::text(Role::User, content.clone()),
        Turn::Assistant {
            content,
            tool_calls,
        } => ChatMessage {
            role: Role::Assistant,
            content: content.clone().unwrap_or_default(),
            tool_calls: tool_calls
                .iter()
                .map(|call| ToolCallParam {
                    id: Some(call.id.clone()),
                    function: FunctionCallParam {
                        name: call.function.name.clone(),
                        arguments: call.function.arguments.clone(),
                    },
                })
                .collect(),
            tool_name: None,
        },
        Turn::ToolResult(result) => ChatMessage {
            role: Role::Tool,
            content: result.content_text(),
            tool_calls: Vec::new(),
            tool_name: Some(result.name.clone()),
        },
    }
}

/// Recovers a tool call a model wrote as plain text, e.g.
/// `{"name": "city_code", "parameters": {"city_name": "Pune"}}`.
///
/// The object spans from the first `{` to the last `}`. The name must be one
/// of the offered tools; `arguments` is accepted in place of `parameters`.
fn recover_inline_call(text: &str, tools: &[ToolDefinition]) -> Option<(String, Value)> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    let Value::Object(mut object) = serde_json::from_str::<Value>(&text[start..=end]).ok()? else {
        return None;
    };

    let name = match object.remove("name")? {
        Value::String(name) => name,
        _ => return None,
    };
    if !tools.iter().any(|tool| tool.name == name) {
        return None;
    }

    let arguments = match object
        .remove("parameters")
        .or_else(|| object.remove("arguments"))
    {
        Some(Value::String(raw)) => serde_json::from_str(&raw).unwrap_or(Value::String(raw)),
        Some(Value::Null) | None => Value::Object(Map::new()),
        Some(value) => value,
    };
    Some((name, arguments))
}
