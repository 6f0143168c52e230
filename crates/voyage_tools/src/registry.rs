//! Tool registry.
//!
//! The [`ToolRegistry`] stores registered tools by name in registration order.
//! It is populated once at startup and then shared read-only (typically behind
//! an `Arc`) with the [`ToolExecutor`](crate::ToolExecutor).

use crate::error::RegistryError;
use crate::schema::FunctionMetadata;
use crate::tool::Tool;
use indexmap::IndexMap;
use std::sync::Arc;
use voyage_models::llm::ToolDefinition;

/// A registered tool together with its cached metadata.
#[derive(Clone)]
pub struct ToolSpec {
    metadata: FunctionMetadata,
    definition: ToolDefinition,
    tool: Arc<dyn Tool>,
}

impl ToolSpec {
    fn new(tool: Arc<dyn Tool>) -> Self {
        let metadata = tool.metadata();
        let definition = metadata.to_tool_definition();
        Self {
            metadata,
            definition,
            tool,
        }
    }

    /// Returns the tool name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Returns the ordered parameter metadata.
    #[must_use]
    pub fn metadata(&self) -> &FunctionMetadata {
        &self.metadata
    }

    /// Returns the definition advertised to the model.
    #[must_use]
    pub fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    /// Returns the callable tool.
    #[must_use]
    pub fn tool(&self) -> &Arc<dyn Tool> {
        &self.tool
    }
}

impl core::fmt::Debug for ToolSpec {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ToolSpec")
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

/// Registry of available tools.
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: IndexMap<String, ToolSpec>,
}

impl core::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish()
    }
}

impl ToolRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tools: IndexMap::new(),
        }
    }

    /// Registers a tool.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateToolName`] if a tool with the same
    /// name is already registered. The existing tool is kept.
    pub fn register(&mut self, tool: impl Tool) -> Result<(), RegistryError> {
        self.register_arc(Arc::new(tool))
    }

    /// Registers an already shared tool.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateToolName`] on a name clash.
    pub fn register_arc(&mut self, tool: Arc<dyn Tool>) -> Result<(), RegistryError> {
        let spec = ToolSpec::new(tool);
        let name = spec.name().to_string();
        if self.tools.contains_key(&name) {
            return Err(RegistryError::DuplicateToolName(name));
        }
        tracing::debug!(tool = %name, "registered tool");
        self.tools.insert(name, spec);
        Ok(())
    }

    /// Looks up a tool by exact name.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownTool`] if nothing is registered under `name`.
    pub fn lookup(&self, name: &str) -> Result<&ToolSpec, RegistryError> {
        self.tools
            .get(name)
            .ok_or_else(|| RegistryError::UnknownTool(name.to_string()))
    }

    /// Returns a tool by name, if registered.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ToolSpec> {
        self.tools.get(name)
    }

    /// Returns whether a tool with the given name is registered.
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Returns the names of all registered tools, in registration order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    /// Returns tool definitions for all registered tools, in registration order.
    #[must_use]
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .values()
            .map(|spec| spec.definition.clone())
            .collect()
    }

    /// Returns the number of registered tools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Returns whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
