use std::collections::BTreeSet;

use secrecy::SecretString;
use serde::Deserialize;
use switchyard_core::{
    AuthContext, AuthType, Author, ModelProviderConfig, PricingTier, ProviderKind, UserEndpointConfig,
};

/// One way of serving a logical model
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EndpointConfig {
    /// Unique label, reported as the attempt name
    pub name: String,
    /// Logical model requested by callers
    pub model: String,
    pub provider: ProviderKind,
    /// Upstream model identifier before adapter transformation
    pub provider_model_id: String,
    #[serde(default)]
    pub author: Option<Author>,
    /// Whose credential pays for this endpoint
    pub auth_type: AuthType,
    /// Overrides the provider priority for this endpoint only
    #[serde(default)]
    pub priority: Option<u32>,
    #[serde(default)]
    pub ptb_enabled: bool,
    #[serde(default)]
    pub cross_region: bool,
    #[serde(default)]
    pub context_length: u32,
    #[serde(default)]
    pub max_completion_tokens: u32,
    #[serde(default)]
    pub supported_parameters: BTreeSet<String>,
    pub pricing: Vec<PricingTier>,
    #[serde(default)]
    pub user_config: UserEndpointConfig,
    #[serde(default)]
    pub credentials: CredentialsConfig,
    /// Organization the credential belongs to
    #[serde(default)]
    pub org_id: Option<String>,
}

/// Secrets used to authenticate an endpoint
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CredentialsConfig {
    /// API key, AWS access key id, or service-account JSON
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// AWS secret access key
    #[serde(default)]
    pub secret_key: Option<SecretString>,
}

impl EndpointConfig {
    /// Static provider configuration of this endpoint
    pub fn model_config(&self) -> ModelProviderConfig {
        ModelProviderConfig {
            provider_model_id: self.provider_model_id.clone(),
            provider: self.provider,
            author: self.author.clone(),
            pricing: self.pricing.clone(),
            context_length: self.context_length,
            max_completion_tokens: self.max_completion_tokens,
            ptb_enabled: self.ptb_enabled,
            cross_region: self.cross_region,
            supported_parameters: self.supported_parameters.clone(),
        }
    }

    /// Authentication inputs carrying this endpoint's credentials
    pub fn auth_context(&self) -> AuthContext {
        AuthContext {
            api_key: self.credentials.api_key.clone(),
            secret_key: self.credentials.secret_key.clone(),
            org_id: self.org_id.clone(),
            ..AuthContext::default()
        }
    }
}
