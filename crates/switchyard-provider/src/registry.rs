use std::collections::BTreeMap;
use std::sync::Arc;

use switchyard_auth::{GoogleTokenIssuer, MemoryTokenCache};
use switchyard_core::ProviderKind;

use crate::ProviderError;
use crate::adapter::ProviderAdapter;
use crate::adapter::anthropic::AnthropicAdapter;
use crate::adapter::azure::AzureAdapter;
use crate::adapter::bedrock::BedrockAdapter;
use crate::adapter::compatible::CompatibleAdapter;
use crate::adapter::google::GoogleAiStudioAdapter;
use crate::adapter::openai::OpenAiAdapter;
use crate::adapter::vertex::VertexAdapter;

/// Construction options for the built-in adapters
#[derive(Debug, Clone)]
pub struct RegistryOptions {
    /// Azure resource used by pay-through-billing endpoints without a `baseUri`
    pub azure_ptb_base_uri: Option<String>,
    /// Token issuer used by Vertex AI
    pub google: GoogleTokenIssuer,
}

impl Default for RegistryOptions {
    fn default() -> Self {
        Self {
            azure_ptb_base_uri: None,
            google: GoogleTokenIssuer::new(Arc::new(MemoryTokenCache::new())),
        }
    }
}

/// Shared adapter instance per provider
#[derive(Clone, Default)]
pub struct AdapterRegistry {
    adapters: BTreeMap<ProviderKind, Arc<dyn ProviderAdapter>>,
}

impl AdapterRegistry {
    /// Registry with an adapter for every built-in provider
    pub fn standard(options: RegistryOptions) -> Self {
        let mut registry = Self::default();

        registry.register(Arc::new(OpenAiAdapter));
        registry.register(Arc::new(AnthropicAdapter));
        registry.register(Arc::new(AzureAdapter::new(options.azure_ptb_base_uri)));
        registry.register(Arc::new(BedrockAdapter));
        registry.register(Arc::new(VertexAdapter::new(options.google)));
        registry.register(Arc::new(GoogleAiStudioAdapter));
        for adapter in CompatibleAdapter::all() {
            registry.register(Arc::new(adapter));
        }

        registry
    }

    /// Add or replace the adapter for its provider
    pub fn register(&mut self, adapter: Arc<dyn ProviderAdapter>) {
        self.adapters.insert(adapter.kind(), adapter);
    }

    pub fn get(&self, kind: ProviderKind) -> Result<Arc<dyn ProviderAdapter>, ProviderError> {
        self.adapters
            .get(&kind)
            .cloned()
            .ok_or_else(|| ProviderError::Configuration(format!("no adapter registered for provider {kind}")))
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}

impl std::fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterRegistry")
            .field("providers", &self.adapters.keys().collect::<Vec<_>>())
            .finish()
    }
}
