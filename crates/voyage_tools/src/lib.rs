//! Tool framework for Voyage agents.
//!
//! This crate provides the infrastructure for defining, registering, and
//! executing tools that a language model may call. The executor validates the
//! model's raw arguments against each tool's parameter schema and contains
//! every failure as a structured [`ToolFailure`], so a broken tool never
//! aborts an agent run.
//!
//! # Quick Start
//!
//! ```
//! use voyage_tools::{FunctionMetadata, ParameterInfo, ToolError, ToolRegistry, from_fn};
//!
//! let echo = from_fn(
//!     FunctionMetadata::new("echo")
//!         .with_description("Repeats its input.")
//!         .add_parameter(ParameterInfo::of::<String>("text")),
//!     |call| async move {
//!         let text: String = call.get_param("text")?;
//!         Ok::<_, ToolError>(serde_json::json!(text))
//!     },
//! );
//!
//! let mut registry = ToolRegistry::new();
//! registry.register(echo).unwrap();
//! assert!(registry.has("echo"));
//! ```
//!
//! # Architecture
//!
//! - [`Tool`]: trait for executable tools with a parameter schema
//! - [`ToolRegistry`]: stores tools by name, append-only
//! - [`ArgumentAdapter`] / [`AdapterSet`]: per-tool key renames and defaults
//! - [`ToolExecutor`]: validation, coercion, timeout and failure containment
//! - [`FunctionCall`] / [`InputParam`]: parameter extraction
//! - [`FunctionMetadata`] / [`ParameterInfo`]: schema building

pub mod adapter;
pub mod error;
pub mod executor;
pub mod param;
pub mod registry;
pub mod schema;
pub mod tool;

// Re-export core types at crate root.
pub use adapter::{AdapterSet, ArgumentAdapter, FillMissing, RenameKeys};
pub use error::{RegistryError, ToolError, ToolFailure};
pub use executor::{ToolExecutor, ToolOutcome, validate_arguments};
pub use param::{FunctionCall, FunctionParam, InputParam};
pub use registry::{ToolRegistry, ToolSpec};
pub use schema::{FunctionMetadata, ParamType, ParameterInfo};
pub use tool::{FnTool, Tool, ToolFuture, from_fn};
