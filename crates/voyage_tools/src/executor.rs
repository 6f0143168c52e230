//! Tool execution with argument validation and failure capture.
//!
//! [`ToolExecutor::execute`] never returns an error. Every problem, from an
//! unknown tool name to a panicking implementation, becomes a
//! [`ToolFailure`] inside the returned [`ToolOutcome`] so the conversation
//! can continue and the model can correct itself.

use crate::adapter::AdapterSet;
use crate::error::{ToolError, ToolFailure};
use crate::param::FunctionCall;
use crate::registry::ToolRegistry;
use crate::schema::{FunctionMetadata, ParamType};
use futures::FutureExt;
use serde_json::{Map, Value};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use voyage_models::llm::{ToolCall, ToolDefinition, ToolResult};

/// Default per-call execution budget.
pub const DEFAULT_TOOL_TIMEOUT: Duration = Duration::from_secs(30);

/// Result of executing one tool call.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutcome {
    /// Id of the call this answers.
    pub call_id: String,
    /// Requested tool name.
    pub tool: String,
    /// Success payload or structured failure.
    pub result: Result<Value, ToolFailure>,
}

impl ToolOutcome {
    /// Returns whether the tool succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// Converts the outcome into a tool result turn payload.
    #[must_use]
    pub fn into_tool_result(self) -> ToolResult {
        match self.result {
            Ok(value) => ToolResult::success(self.call_id, self.tool, value),
            Err(failure) => ToolResult::error(self.call_id, self.tool, failure.to_payload()),
        }
    }
}

impl From<ToolOutcome> for ToolResult {
    fn from(outcome: ToolOutcome) -> Self {
        outcome.into_tool_result()
    }
}

/// Executes model tool calls against a [`ToolRegistry`].
#[derive(Debug, Clone)]
pub struct ToolExecutor {
    registry: Arc<ToolRegistry>,
    adapters: AdapterSet,
    timeout: Duration,
}

impl ToolExecutor {
    /// Creates an executor with no adapters and the default timeout.
    #[must_use]
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self {
            registry,
            adapters: AdapterSet::new(),
            timeout: DEFAULT_TOOL_TIMEOUT,
        }
    }

    /// Sets the argument adapters.
    #[must_use]
    pub fn with_adapters(mut self, adapters: AdapterSet) -> Self {
        self.adapters = adapters;
        self
    }

    /// Sets the per-call timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the underlying registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    /// Returns the definitions advertised to the model.
    #[must_use]
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.registry.definitions()
    }

    /// Executes one tool call. Always produces an outcome.
    pub async fn execute(&self, call: &ToolCall) -> ToolOutcome {
        let result = self.run(call).await;
        match &result {
            Ok(_) => tracing::debug!(tool = %call.name(), call_id = %call.id, "tool succeeded"),
            Err(failure) => tracing::warn!(
                tool = %call.name(),
                call_id = %call.id,
                kind = failure.kind(),
                error = %failure,
                "tool failed"
            ),
        }
        ToolOutcome {
            call_id: call.id.clone(),
            tool: call.name().to_string(),
            result,
        }
    }

    async fn run(&self, call: &ToolCall) -> Result<Value, ToolFailure> {
        let name = call.name();
        let spec = self
            .registry
            .lookup(name)
            .map_err(|_| ToolFailure::UnknownTool {
                name: name.to_string(),
            })?;

        let mut args = raw_arguments(&call.function.arguments)?;
        self.adapters.apply(name, &mut args);
        let args = validate_arguments(spec.metadata(), args)?;

        let tool = Arc::clone(spec.tool());
        let invocation = FunctionCall::new(name, args);
        let fut = AssertUnwindSafe(tool.execute(invocation)).catch_unwind();

        match tokio::time::timeout(self.timeout, fut).await {
            Err(_) => Err(ToolFailure::ToolExecutionFailed {
                tool: name.to_string(),
                cause: format!("timed out after {}s", self.timeout.as_secs_f64()),
            }),
            Ok(Err(panic)) => Err(ToolFailure::ToolExecutionFailed {
                tool: name.to_string(),
                cause: format!("panicked: {}", panic_message(panic.as_ref())),
            }),
            Ok(Ok(Err(ToolError::ValidationError(message)))) => Err(ToolFailure::ValidationError {
                tool: name.to_string(),
                message,
            }),
            Ok(Ok(Err(err))) => Err(ToolFailure::ToolExecutionFailed {
                tool: name.to_string(),
                cause: err.to_string(),
            }),
            Ok(Ok(Ok(value))) => Ok(value),
        }
    }
}

fn raw_arguments(arguments: &Value) -> Result<Map<String, Value>, ToolFailure> {
    match arguments {
        Value::Object(map) => Ok(map.clone()),
        Value::Null => Ok(Map::new()),
        Value::String(text) if text.trim().is_empty() => Ok(Map::new()),
        Value::String(text) => match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(map)) => Ok(map),
            _ => Err(invalid("arguments", "object", arguments)),
        },
        other => Err(invalid("arguments", "object", other)),
    }
}

/// Validates raw arguments against a tool's parameter list.
///
/// Required parameters must be present and non-null. Optional parameters
/// that are null are treated as absent. Defaults are filled in. Scalar values
/// are coerced where the conversion is lossless (`"2"` to `2` for an
/// integer). Arguments the tool does not declare are dropped.
///
/// # Errors
///
/// Returns [`ToolFailure::MissingParameter`] or
/// [`ToolFailure::InvalidParameterType`] for the first offending parameter,
/// in declaration order.
pub fn validate_arguments(
    metadata: &FunctionMetadata,
    mut args: Map<String, Value>,
) -> Result<Map<String, Value>, ToolFailure> {
    let mut validated = Map::new();

    for param in &metadata.parameters {
        let value = match args.remove(&param.name) {
            Some(Value::Null) | None => None,
            Some(value) => Some(value),
        };
        let value = match (value, &param.default_value) {
            (Some(value), _) => value,
            (None, Some(default)) => default.clone(),
            (None, None) if param.required => {
                return Err(ToolFailure::MissingParameter {
                    name: param.name.clone(),
                });
            }
            (None, None) => continue,
        };
        let value = coerce(&param.name, param.param_type(), value)?;
        validated.insert(param.name.clone(), value);
    }

    if !args.is_empty() {
        let extra: Vec<&str> = args.keys().map(String::as_str).collect();
        tracing::warn!(tool = %metadata.name, ?extra, "dropping undeclared arguments");
    }

    Ok(validated)
}

fn coerce(name: &str, expected: ParamType, value: Value) -> Result<Value, ToolFailure> {
    let actual = json_type(&value);
    let coerced = match (expected, value) {
        (ParamType::Any, value) => Some(value),
        (ParamType::String, Value::String(s)) => Some(Value::String(s)),
        (ParamType::String, Value::Number(n)) => Some(Value::String(n.to_string())),
        (ParamType::String, Value::Bool(b)) => Some(Value::String(b.to_string())),
        (ParamType::Integer, Value::Number(n)) => integral(&n),
        (ParamType::Integer, Value::String(ref s)) => s
            .trim()
            .parse::<i64>()
            .ok()
            .map(Value::from)
            .or_else(|| {
                s.trim()
                    .parse::<f64>()
                    .ok()
                    .and_then(serde_json::Number::from_f64)
                    .and_then(|n| integral(&n))
            }),
        (ParamType::Number, Value::Number(n)) => Some(Value::Number(n)),
        (ParamType::Number, Value::String(ref s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number),
        (ParamType::Boolean, Value::Bool(b)) => Some(Value::Bool(b)),
        (ParamType::Boolean, Value::String(ref s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Some(Value::Bool(true)),
            "false" => Some(Value::Bool(false)),
            _ => None,
        },
        (ParamType::Array, Value::Array(items)) => Some(Value::Array(items)),
        (ParamType::Object, Value::Object(map)) => Some(Value::Object(map)),
        _ => None,
    };
    coerced.ok_or_else(|| ToolFailure::InvalidParameterType {
        name: name.to_string(),
        expected: expected.as_str().to_string(),
        actual: actual.to_string(),
    })
}

fn integral(n: &serde_json::Number) -> Option<Value> {
    if let Some(i) = n.as_i64() {
        return Some(Value::from(i));
    }
    if let Some(u) = n.as_u64() {
        return Some(Value::from(u));
    }
    let f = n.as_f64()?;
    (f.fract() == 0.0 && f.abs() < 9.0e15).then(|| Value::from(f as i64))
}

fn invalid(name: &str, expected: &str, actual: &Value) -> ToolFailure {
    ToolFailure::InvalidParameterType {
        name: name.to_string(),
        expected: expected.to_string(),
        actual: json_type(actual).to_string(),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "number",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
