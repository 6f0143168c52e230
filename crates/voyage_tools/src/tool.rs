//! The core [`Tool`] trait for executable tools.

use crate::error::ToolError;
use crate::param::FunctionCall;
use crate::schema::FunctionMetadata;
use std::future::Future;
use std::pin::Pin;

/// Boxed future returned by [`Tool::execute`].
pub type ToolFuture<'a> =
    Pin<Box<dyn Future<Output = Result<serde_json::Value, ToolError>> + Send + 'a>>;

/// A tool that can be invoked by a language model.
///
/// Tools expose [`FunctionMetadata`] (name, description, ordered parameter
/// schema) and an async [`execute`](Tool::execute) method. `execute` only
/// ever sees arguments that already passed schema validation, with defaults
/// filled in.
pub trait Tool: Send + Sync + 'static {
    /// Returns the tool's name, description and parameter schema.
    fn metadata(&self) -> FunctionMetadata;

    /// Executes the tool with validated arguments.
    fn execute(&self, call: FunctionCall) -> ToolFuture<'_>;
}

/// A [`Tool`] backed by a closure. Created with [`from_fn`].
pub struct FnTool<F> {
    metadata: FunctionMetadata,
    func: F,
}

impl<F> core::fmt::Debug for FnTool<F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FnTool")
            .field("name", &self.metadata.name)
            .finish_non_exhaustive()
    }
}

/// Wraps an async closure as a [`Tool`].
pub fn from_fn<F, Fut>(metadata: FunctionMetadata, func: F) -> FnTool<F>
where
    F: Fn(FunctionCall) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<serde_json::Value, ToolError>> + Send + 'static,
{
    FnTool { metadata, func }
}

impl<F, Fut> Tool for FnTool<F>
where
    F: Fn(FunctionCall) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<serde_json::Value, ToolError>> + Send + 'static,
{
    fn metadata(&self) -> FunctionMetadata {
        self.metadata.clone()
    }

    fn execute(&self, call: FunctionCall) -> ToolFuture<'_> {
        Box::pin((self.func)(call))
    }
}
