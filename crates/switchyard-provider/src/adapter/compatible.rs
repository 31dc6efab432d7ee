//! `OpenAI`-compatible chat-completions providers
//!
//! These upstreams differ only in base URL and, for a few, the header the
//! API key travels in.

use std::sync::Arc;

use async_trait::async_trait;
use switchyard_auth::CacheProvider;
use switchyard_core::{AuthContext, AuthResult, Endpoint, ProviderKind, RequestParams};

use super::{ProviderAdapter, bearer_auth, key_header_auth};
use crate::ProviderError;

/// Where the API key is sent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPlacement {
    /// `Authorization: Bearer <key>`
    Bearer,
    /// Raw key in the named header
    Header(&'static str),
}

/// Adapter for a fixed-URL chat-completions API
#[derive(Debug, Clone, Copy)]
pub struct CompatibleAdapter {
    kind: ProviderKind,
    url: &'static str,
    key_placement: KeyPlacement,
}

impl CompatibleAdapter {
    pub const fn new(kind: ProviderKind, url: &'static str, key_placement: KeyPlacement) -> Self {
        Self {
            kind,
            url,
            key_placement,
        }
    }

    const fn bearer(kind: ProviderKind, url: &'static str) -> Self {
        Self::new(kind, url, KeyPlacement::Bearer)
    }

    pub const fn helicone() -> Self {
        Self::bearer(ProviderKind::Helicone, "https://ai-gateway.helicone.ai/v1/chat/completions")
    }

    pub const fn groq() -> Self {
        Self::bearer(ProviderKind::Groq, "https://api.groq.com/openai/v1/chat/completions")
    }

    pub const fn deepseek() -> Self {
        Self::bearer(ProviderKind::DeepSeek, "https://api.deepseek.com/chat/completions")
    }

    pub const fn cohere() -> Self {
        Self::bearer(ProviderKind::Cohere, "https://api.cohere.ai/compatibility/v1/chat/completions")
    }

    pub const fn fireworks() -> Self {
        Self::new(
            ProviderKind::Fireworks,
            "https://api.fireworks.ai/inference/v1/chat/completions",
            KeyPlacement::Header("api-key"),
        )
    }

    pub const fn mistral() -> Self {
        Self::bearer(ProviderKind::Mistral, "https://api.mistral.ai/v1/chat/completions")
    }

    pub const fn nebius() -> Self {
        Self::bearer(ProviderKind::Nebius, "https://api.studio.nebius.com/v1/chat/completions")
    }

    pub const fn novita() -> Self {
        Self::bearer(ProviderKind::Novita, "https://api.novita.ai/openai/v1/chat/completions")
    }

    pub const fn perplexity() -> Self {
        Self::bearer(ProviderKind::Perplexity, "https://api.perplexity.ai/chat/completions")
    }

    pub const fn xai() -> Self {
        Self::bearer(ProviderKind::Xai, "https://api.x.ai/v1/chat/completions")
    }

    pub const fn cerebras() -> Self {
        Self::bearer(ProviderKind::Cerebras, "https://api.cerebras.ai/v1/chat/completions")
    }

    pub const fn chutes() -> Self {
        Self::bearer(ProviderKind::Chutes, "https://llm.chutes.ai/v1/chat/completions")
    }

    pub const fn deepinfra() -> Self {
        Self::bearer(ProviderKind::DeepInfra, "https://api.deepinfra.com/v1/openai/chat/completions")
    }

    pub const fn baseten() -> Self {
        Self::bearer(ProviderKind::Baseten, "https://inference.baseten.co/v1/chat/completions")
    }

    pub const fn io_intelligence() -> Self {
        Self::bearer(
            ProviderKind::IoIntelligence,
            "https://api.intelligence.io.solutions/api/v1/chat/completions",
        )
    }

    pub const fn canopywave() -> Self {
        Self::bearer(ProviderKind::CanopyWave, "https://inference.canopywave.io/v1/chat/completions")
    }

    pub const fn openrouter() -> Self {
        Self::bearer(ProviderKind::OpenRouter, "https://openrouter.ai/api/v1/chat/completions")
    }

    /// Every built-in compatible provider
    pub const fn all() -> [Self; 17] {
        [
            Self::helicone(),
            Self::groq(),
            Self::deepseek(),
            Self::cohere(),
            Self::fireworks(),
            Self::mistral(),
            Self::nebius(),
            Self::novita(),
            Self::perplexity(),
            Self::xai(),
            Self::cerebras(),
            Self::chutes(),
            Self::deepinfra(),
            Self::baseten(),
            Self::io_intelligence(),
            Self::canopywave(),
            Self::openrouter(),
        ]
    }
}

#[async_trait]
impl ProviderAdapter for CompatibleAdapter {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    fn build_url(&self, _endpoint: &Endpoint, _params: &RequestParams) -> Result<String, ProviderError> {
        Ok(self.url.to_owned())
    }

    async fn authenticate(
        &self,
        context: &AuthContext,
        _endpoint: &Endpoint,
        _cache: Option<&Arc<dyn CacheProvider>>,
    ) -> Result<AuthResult, ProviderError> {
        match self.key_placement {
            KeyPlacement::Bearer => bearer_auth(self.kind, context),
            KeyPlacement::Header(name) => key_header_auth(self.kind, context, name),
        }
    }
}
