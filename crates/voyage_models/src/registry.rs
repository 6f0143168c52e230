//! Model provider registry.

use crate::error::CreateModelError;
use crate::llm::{Llm, LlmProvider};
use std::collections::HashMap;
use std::sync::Arc;

/// Registry for model provider implementations.
///
/// # For Consumers
///
/// Access models using provider/model identifiers (e.g., `"ollama/gemma3:4b"`).
/// See [`llm()`](Self::llm) for details.
///
/// # For Provider Authors
///
/// Providers are registered once at startup, before the registry is shared:
///
/// ```
/// # use voyage_models::ModelRegistry;
/// # use voyage_models::llm::{LlmProvider, GenerationRequest, GenerationResponse, GenerationError};
/// # use async_trait::async_trait;
/// # use std::sync::Arc;
/// # struct MyProvider;
/// # #[async_trait]
/// # impl LlmProvider for MyProvider {
/// #   async fn generate(&self, _model: &str, _request: GenerationRequest) -> Result<GenerationResponse, GenerationError> {
/// #     unimplemented!()
/// #   }
/// # }
/// let mut registry = ModelRegistry::new();
/// registry.register_llm_provider("my_provider", Arc::new(MyProvider));
///
/// let llm = registry.llm("my_provider/some-model").unwrap();
/// assert_eq!(llm.model_name(), "some-model");
/// ```
#[derive(Default)]
pub struct ModelRegistry {
    // Maps provider names to implementations.
    llm_providers: HashMap<String, Arc<dyn LlmProvider>>,
}

impl core::fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ModelRegistry")
            .field("llm_providers", &self.llm_provider_names())
            .finish()
    }
}

impl ModelRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            llm_providers: HashMap::new(),
        }
    }

    /// Creates a handle to an [`Llm`].
    ///
    /// # Arguments
    ///
    /// * `model_id` - Identifier in `"provider/model"` format (e.g., `"ollama/gemma3:4b"`)
    ///
    /// # Errors
    ///
    /// Returns an error if the `model_id` structure is invalid or the provider is not registered.
    pub fn llm(&self, model_id: impl AsRef<str>) -> Result<Llm, CreateModelError> {
        let model_id = model_id.as_ref();

        let (provider_name, model_name) = model_id
            .split_once('/')
            .filter(|(provider, model)| !provider.is_empty() && !model.is_empty())
            .ok_or_else(|| CreateModelError::InvalidModelId(model_id.to_string()))?;

        let provider = self
            .get_llm_provider(provider_name)
            .ok_or_else(|| CreateModelError::UnknownProvider(provider_name.to_string()))?;

        Ok(Llm::new(provider, model_name))
    }

    /// Registers an LLM provider.
    ///
    /// # Arguments
    ///
    /// * `name` - Provider name used in identifiers (e.g., `"ollama"` for `"ollama/gemma3:4b"`)
    /// * `provider` - The provider implementation
    ///
    /// # Panics
    ///
    /// Panics if a provider with the same name is already registered.
    pub fn register_llm_provider<P: LlmProvider>(
        &mut self,
        name: impl Into<String>,
        provider: Arc<P>,
    ) {
        let name = name.into();
        assert!(
            !self.llm_providers.contains_key(&name),
            "LLM provider '{name}' is already registered"
        );
        self.llm_providers
            .insert(name, provider as Arc<dyn LlmProvider>);
    }

    /// Returns a provider by name.
    #[must_use]
    pub fn get_llm_provider(&self, name: impl AsRef<str>) -> Option<Arc<dyn LlmProvider>> {
        self.llm_providers.get(name.as_ref()).cloned()
    }

    /// Checks if a provider is registered.
    #[must_use]
    pub fn has_llm_provider(&self, name: impl AsRef<str>) -> bool {
        self.llm_providers.contains_key(name.as_ref())
    }

    /// Lists registered provider names.
    #[must_use]
    pub fn llm_provider_names(&self) -> Vec<String> {
        self.llm_providers.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{GenerationError, GenerationRequest, GenerationResponse, Usage};
    use async_trait::async_trait;

    struct EchoProvider;

    #[async_trait]
    impl LlmProvider for EchoProvider {
        async fn generate(
            &self,
            model: &str,
            _request: GenerationRequest,
        ) -> Result<GenerationResponse, GenerationError> {
            Ok(GenerationResponse::from_text(model, Usage::default()))
        }
    }

    #[test]
    fn llm_requires_provider_slash_model() {
        let mut registry = ModelRegistry::new();
        registry.register_llm_provider("echo", Arc::new(EchoProvider));

        assert!(matches!(
            registry.llm("echo"),
            Err(CreateModelError::InvalidModelId(_))
        ));
        assert!(matches!(
            registry.llm("echo/"),
            Err(CreateModelError::InvalidModelId(_))
        ));
        assert!(matches!(
            registry.llm("missing/model"),
            Err(CreateModelError::UnknownProvider(name)) if name == "missing"
        ));
    }

    #[test]
    fn model_name_keeps_tag_suffix() {
        let mut registry = ModelRegistry::new();
        registry.register_llm_provider("ollama", Arc::new(EchoProvider));

        let llm = registry.llm("ollama/gemma3:4b").unwrap();
        assert_eq!(llm.model_name(), "gemma3:4b");
    }

    #[tokio::test]
    async fn handle_forwards_model_name() {
        let mut registry = ModelRegistry::new();
        registry.register_llm_provider("echo", Arc::new(EchoProvider));

        let llm = registry.llm("echo/granite").unwrap();
        let response = llm.generate(GenerationRequest::new("hi")).await.unwrap();
        assert_eq!(response.text(), "granite");
    }

    #[test]
    #[should_panic(expected = "already registered")]
    fn duplicate_provider_panics() {
        let mut registry = ModelRegistry::new();
        registry.register_llm_provider("echo", Arc::new(EchoProvider));
        registry.register_llm_provider("echo", Arc::new(EchoProvider));
    }
}
