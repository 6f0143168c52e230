//! Argument adapters.
//!
//! Models routinely call tools with near-miss argument names (`city` instead
//! of `city_name`) or leave out values the host already knows (`user_id`).
//! An [`ArgumentAdapter`] rewrites the raw argument object before schema
//! validation. Adapters are registered per tool name in an [`AdapterSet`]
//! and applied in insertion order.

use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// Rewrites a tool call's raw arguments before validation.
pub trait ArgumentAdapter: Send + Sync + 'static {
    /// Mutates `args` in place.
    fn adapt(&self, args: &mut Map<String, Value>);
}

impl<F> ArgumentAdapter for F
where
    F: Fn(&mut Map<String, Value>) + Send + Sync + 'static,
{
    fn adapt(&self, args: &mut Map<String, Value>) {
        self(args);
    }
}

/// Renames alias keys to their canonical name.
///
/// When both the alias and the canonical key are present, the canonical value
/// wins and the alias is dropped.
#[derive(Debug, Clone, Default)]
pub struct RenameKeys {
    renames: Vec<(String, String)>,
}

impl RenameKeys {
    /// Creates an empty rename set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an `alias -> canonical` mapping.
    #[must_use]
    pub fn alias(mut self, alias: impl Into<String>, canonical: impl Into<String>) -> Self {
        self.renames.push((alias.into(), canonical.into()));
        self
    }
}

impl ArgumentAdapter for RenameKeys {
    fn adapt(&self, args: &mut Map<String, Value>) {
        for (alias, canonical) in &self.renames {
            let Some(value) = args.remove(alias) else {
                continue;
            };
            if args.contains_key(canonical) {
                tracing::warn!(
                    alias = %alias,
                    canonical = %canonical,
                    "both alias and canonical argument present, keeping canonical"
                );
                continue;
            }
            args.insert(canonical.clone(), value);
        }
    }
}

/// Inserts a fixed value when a key is absent or null.
#[derive(Debug, Clone)]
pub struct FillMissing {
    key: String,
    value: Value,
}

impl FillMissing {
    /// Fills `key` with `value` when the model leaves it out.
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl ArgumentAdapter for FillMissing {
    fn adapt(&self, args: &mut Map<String, Value>) {
        match args.get(&self.key) {
            Some(existing) if !existing.is_null() => {}
            _ => {
                args.insert(self.key.clone(), self.value.clone());
            }
        }
    }
}

/// Adapters keyed by tool name.
#[derive(Clone, Default)]
pub struct AdapterSet {
    by_tool: HashMap<String, Vec<Arc<dyn ArgumentAdapter>>>,
}

impl core::fmt::Debug for AdapterSet {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let counts: HashMap<&str, usize> = self
            .by_tool
            .iter()
            .map(|(name, adapters)| (name.as_str(), adapters.len()))
            .collect();
        f.debug_struct("AdapterSet")
            .field("by_tool", &counts)
            .finish()
    }
}

impl AdapterSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`add`](Self::add).
    #[must_use]
    pub fn with(mut self, tool: impl Into<String>, adapter: impl ArgumentAdapter) -> Self {
        self.add(tool, adapter);
        self
    }

    /// Appends an adapter for `tool`.
    pub fn add(&mut self, tool: impl Into<String>, adapter: impl ArgumentAdapter) {
        self.by_tool
            .entry(tool.into())
            .or_default()
            .push(Arc::new(adapter));
    }

    /// Runs every adapter registered for `tool` over `args`.
    pub fn apply(&self, tool: &str, args: &mut Map<String, Value>) {
        if let Some(adapters) = self.by_tool.get(tool) {
            for adapter in adapters {
                adapter.adapt(args);
            }
        }
    }

    /// Returns whether no adapters are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_tool.is_empty()
    }
}
