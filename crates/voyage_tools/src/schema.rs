//! Schema types for tool parameter metadata.
//!
//! Provides [`ParameterInfo`] for individual parameter schemas and
//! [`FunctionMetadata`] for building complete tool definitions with
//! JSON Schema parameter specifications. Parameter order is preserved, both
//! in the advertised schema and during validation.

use crate::param::InputParam;
use serde::{Deserialize, Serialize};
use voyage_models::llm::ToolDefinition;

/// JSON type a parameter is validated and coerced against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    /// JSON string.
    String,
    /// Whole number.
    Integer,
    /// Any JSON number.
    Number,
    /// `true` / `false`.
    Boolean,
    /// JSON array.
    Array,
    /// JSON object.
    Object,
    /// No type constraint.
    Any,
}

impl ParamType {
    /// Reads the type from a JSON schema's `type` keyword.
    ///
    /// Nullable unions such as `["string", "null"]` resolve to their
    /// non-null member.
    #[must_use]
    pub fn from_schema(schema: &serde_json::Value) -> Self {
        let name = match schema.get("type") {
            Some(serde_json::Value::String(name)) => Some(name.as_str()),
            Some(serde_json::Value::Array(names)) => names
                .iter()
                .filter_map(serde_json::Value::as_str)
                .find(|name| *name != "null"),
            _ => None,
        };
        match name {
            Some("string") => Self::String,
            Some("integer") => Self::Integer,
            Some("number") => Self::Number,
            Some("boolean") => Self::Boolean,
            Some("array") => Self::Array,
            Some("object") => Self::Object,
            _ => Self::Any,
        }
    }

    /// Returns the JSON Schema name of this type.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
            Self::Any => "any",
        }
    }
}

/// Schema information for a single tool parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterInfo {
    /// Parameter name.
    pub name: String,
    /// Parameter description shown to the model.
    pub description: Option<String>,
    /// JSON Schema for this parameter's type.
    pub schema: serde_json::Value,
    /// Whether this parameter is required.
    pub required: bool,
    /// Default value for optional parameters.
    pub default_value: Option<serde_json::Value>,
}

impl ParameterInfo {
    /// Creates a new required parameter with the given name and schema.
    pub fn new(name: impl Into<String>, schema: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            description: None,
            schema,
            required: true,
            default_value: None,
        }
    }

    /// Creates a required parameter whose schema is derived from `T`.
    #[must_use]
    pub fn of<T: InputParam>(name: &str) -> Self {
        T::schema_info(name)
    }

    /// Sets the description.
    #[must_use]
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Marks the parameter as optional with no default.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Marks the parameter as optional, filled with `value` when absent.
    #[must_use]
    pub fn with_default(mut self, value: serde_json::Value) -> Self {
        self.required = false;
        self.default_value = Some(value);
        self
    }

    /// Returns whether the model must supply this parameter.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required && self.default_value.is_none()
    }

    /// Returns the JSON type the value is coerced to.
    #[must_use]
    pub fn param_type(&self) -> ParamType {
        ParamType::from_schema(&self.schema)
    }
}

/// Metadata describing a tool function's name, description, and parameters.
///
/// Used to build [`ToolDefinition`] instances with proper JSON Schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionMetadata {
    /// Function name.
    pub name: String,
    /// Function description.
    pub description: Option<String>,
    /// Model-visible parameters, in declaration order.
    pub parameters: Vec<ParameterInfo>,
    /// Full JSON Schema derived from `parameters`. Use [`Self::schema()`] to read.
    schema: serde_json::Value,
}

impl FunctionMetadata {
    /// Creates new metadata with the given function name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            parameters: Vec::new(),
            schema: serde_json::json!({
                "type": "object",
                "properties": {},
                "required": []
            }),
        }
    }

    /// Sets the function description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds a parameter and rebuilds the schema.
    ///
    /// A parameter with an existing name replaces the earlier one in place.
    #[must_use]
    pub fn add_parameter(mut self, param: ParameterInfo) -> Self {
        match self.parameters.iter_mut().find(|p| p.name == param.name) {
            Some(existing) => *existing = param,
            None => self.parameters.push(param),
        }
        self.rebuild_schema();
        self
    }

    /// Returns a parameter by name.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&ParameterInfo> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Returns the full JSON Schema for the function's parameters.
    #[must_use]
    pub fn schema(&self) -> &serde_json::Value {
        &self.schema
    }

    /// Converts this metadata into a [`ToolDefinition`].
    pub fn to_tool_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name.clone(),
            description: self.description.clone().unwrap_or_default(),
            parameters: self.schema.clone(),
        }
    }

    fn rebuild_schema(&mut self) {
        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();

        for param in &self.parameters {
            let mut param_schema = param.schema.clone();
            if let Some(desc) = &param.description
                && let Some(obj) = param_schema.as_object_mut()
            {
                obj.insert(
                    "description".to_string(),
                    serde_json::Value::String(desc.clone()),
                );
            }

            if let Some(default) = &param.default_value
                && let Some(obj) = param_schema.as_object_mut()
            {
                obj.insert("default".to_string(), default.clone());
            }

            properties.insert(param.name.clone(), param_schema);

            if param.is_required() {
                required.push(param.name.clone());
            }
        }

        self.schema = serde_json::json!({
            "type": "object",
            "properties": properties,
            "required": required
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn nullable_union_resolves_to_inner_type() {
        assert_eq!(
            ParamType::from_schema(&json!({"type": ["string", "null"]})),
            ParamType::String
        );
        assert_eq!(ParamType::from_schema(&json!({})), ParamType::Any);
    }

    #[test]
    fn defaults_are_not_required_and_appear_in_schema() {
        let meta = FunctionMetadata::new("hotels_finder")
            .add_parameter(ParameterInfo::of::<String>("q").describe("City or area"))
            .add_parameter(ParameterInfo::of::<i64>("rooms").with_default(json!(1)));

        let schema = meta.schema();
        assert_eq!(schema["required"], json!(["q"]));
        assert_eq!(schema["properties"]["rooms"]["default"], 1);
        assert_eq!(schema["properties"]["q"]["description"], "City or area");
    }

    #[test]
    fn properties_keep_declaration_order() {
        let meta = FunctionMetadata::new("t")
            .add_parameter(ParameterInfo::of::<String>("zeta"))
            .add_parameter(ParameterInfo::of::<String>("alpha"));
        let keys: Vec<_> = meta.schema()["properties"]
            .as_object()
            .unwrap()
            .keys()
            .cloned()
            .collect();
        assert_eq!(keys, ["zeta", "alpha"]);
    }

    #[test]
    fn re_adding_parameter_replaces_it() {
        let meta = FunctionMetadata::new("t")
            .add_parameter(ParameterInfo::of::<String>("a"))
            .add_parameter(ParameterInfo::of::<String>("a").optional());
        assert_eq!(meta.parameters.len(), 1);
        assert!(!meta.parameters[0].is_required());
    }
}
