//! Programmatic catalog builder for integration tests

use std::collections::BTreeSet;

use secrecy::SecretString;
use switchyard_config::{Config, CredentialsConfig, EndpointConfig};
use switchyard_core::{AuthType, PricingTier, ProviderKind, UserEndpointConfig};

pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Point Google token exchanges at a mock endpoint
    pub fn with_token_uri(mut self, token_uri: &str) -> Self {
        self.config.gcp.token_uri = Some(token_uri.parse().expect("valid URL"));
        self
    }

    pub fn with_azure_ptb(mut self, base_uri: &str) -> Self {
        self.config.azure.ptb_base_uri = Some(base_uri.parse().expect("valid URL"));
        self
    }

    pub fn with_priority(mut self, provider: ProviderKind, priority: u32) -> Self {
        self.config.priorities.insert(provider, priority);
        self
    }

    pub fn with_endpoint(mut self, endpoint: EndpointConfig) -> Self {
        self.config.endpoints.push(endpoint);
        self
    }

    pub fn build(self) -> Config {
        self.config.validate().expect("valid test config");
        self.config
    }
}

/// Endpoint with one pricing tier and no credentials
pub fn endpoint(
    name: &str,
    model: &str,
    provider: ProviderKind,
    provider_model_id: &str,
    auth_type: AuthType,
    unit_cost: f64,
) -> EndpointConfig {
    EndpointConfig {
        name: name.to_owned(),
        model: model.to_owned(),
        provider,
        provider_model_id: provider_model_id.to_owned(),
        author: None,
        auth_type,
        priority: None,
        ptb_enabled: auth_type == AuthType::Ptb,
        cross_region: false,
        context_length: 128_000,
        max_completion_tokens: 8_192,
        supported_parameters: BTreeSet::new(),
        pricing: vec![PricingTier {
            threshold: 0,
            input: unit_cost / 2.0,
            output: unit_cost / 2.0,
        }],
        user_config: UserEndpointConfig::default(),
        credentials: CredentialsConfig::default(),
        org_id: None,
    }
}

pub fn with_api_key(mut endpoint: EndpointConfig, api_key: &str) -> EndpointConfig {
    endpoint.credentials.api_key = Some(SecretString::from(api_key.to_owned()));
    endpoint
}
