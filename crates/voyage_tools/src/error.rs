//! Error types for tool registration and execution.

use serde_json::{Value, json};
use thiserror::Error;

/// Errors a tool implementation returns from [`Tool::execute`](crate::Tool::execute).
#[derive(Debug, Error)]
pub enum ToolError {
    /// Error during parameter deserialization or parsing.
    #[error("Parameter error: {0}")]
    ParameterError(String),

    /// Error during tool function execution, including downstream I/O.
    #[error("Execution error: {0}")]
    ExecutionError(String),

    /// The request was well-formed but violates a domain rule
    /// (e.g. a journey date in the past).
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// JSON serialization/deserialization error.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl ToolError {
    /// Creates a [`ParameterError`](Self::ParameterError).
    pub fn parameter_error(msg: impl Into<String>) -> Self {
        Self::ParameterError(msg.into())
    }

    /// Creates an [`ExecutionError`](Self::ExecutionError).
    pub fn execution_error(msg: impl Into<String>) -> Self {
        Self::ExecutionError(msg.into())
    }

    /// Creates a [`ValidationError`](Self::ValidationError).
    pub fn validation_error(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }
}

/// Errors raised by [`ToolRegistry`](crate::ToolRegistry).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A tool with this name is already registered.
    #[error("tool '{0}' is already registered")]
    DuplicateToolName(String),

    /// No tool with this name is registered.
    #[error("unknown tool: {0}")]
    UnknownTool(String),
}

/// Structured failure carried by an error tool result.
///
/// Produced by the [`ToolExecutor`](crate::ToolExecutor) instead of
/// propagating errors, so the model can read it and recover.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolFailure {
    /// The model requested a tool that is not registered.
    #[error("unknown tool '{name}'")]
    UnknownTool {
        /// The requested name.
        name: String,
    },

    /// A required parameter was absent or null.
    #[error("missing required parameter '{name}'")]
    MissingParameter {
        /// Parameter name.
        name: String,
    },

    /// A parameter could not be coerced to its schema type.
    #[error("parameter '{name}' must be {expected}, got {actual}")]
    InvalidParameterType {
        /// Parameter name.
        name: String,
        /// Expected JSON type.
        expected: String,
        /// What was received.
        actual: String,
    },

    /// The tool ran and failed, panicked or timed out.
    #[error("tool '{tool}' failed: {cause}")]
    ToolExecutionFailed {
        /// Tool name.
        tool: String,
        /// Human-readable cause.
        cause: String,
    },

    /// The tool rejected the request on domain grounds.
    #[error("tool '{tool}' rejected the request: {message}")]
    ValidationError {
        /// Tool name.
        tool: String,
        /// Why the request was rejected.
        message: String,
    },
}

impl ToolFailure {
    /// Returns the snake-case failure kind used in payloads.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnknownTool { .. } => "unknown_tool",
            Self::MissingParameter { .. } => "missing_parameter",
            Self::InvalidParameterType { .. } => "invalid_parameter_type",
            Self::ToolExecutionFailed { .. } => "tool_execution_failed",
            Self::ValidationError { .. } => "validation_error",
        }
    }

    /// Renders the failure as the JSON payload of an error tool result.
    ///
    /// The payload always has `error` (the [`kind`](Self::kind)) and
    /// `message`, plus the variant's fields.
    #[must_use]
    pub fn to_payload(&self) -> Value {
        let mut payload = match self {
            Self::UnknownTool { name } | Self::MissingParameter { name } => json!({ "name": name }),
            Self::InvalidParameterType {
                name,
                expected,
                actual,
            } => json!({ "name": name, "expected": expected, "actual": actual }),
            Self::ToolExecutionFailed { tool, cause } => json!({ "tool": tool, "cause": cause }),
            Self::ValidationError { tool, message } => {
                json!({ "tool": tool, "reason": message })
            }
        };
        if let Some(obj) = payload.as_object_mut() {
            obj.insert("error".to_string(), json!(self.kind()));
            obj.insert("message".to_string(), json!(self.to_string()));
        }
        payload
    }
}
