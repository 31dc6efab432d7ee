//! Azure `OpenAI` deployments

use std::sync::Arc;

use async_trait::async_trait;
use switchyard_auth::CacheProvider;
use switchyard_core::{AuthContext, AuthResult, ConfigField, Endpoint, ProviderKind, RequestParams};

use super::{ProviderAdapter, key_header_auth};
use crate::ProviderError;

const DEFAULT_API_VERSION: &str = "2025-01-01-preview";

/// Azure `OpenAI` adapter
///
/// `ptb_base_uri` is the gateway-owned resource used for pay-through-billing
/// endpoints that carry no `baseUri` of their own.
#[derive(Debug, Clone, Default)]
pub struct AzureAdapter {
    ptb_base_uri: Option<String>,
}

impl AzureAdapter {
    pub fn new(ptb_base_uri: Option<String>) -> Self {
        Self { ptb_base_uri }
    }

    fn base_uri<'a>(&'a self, endpoint: &'a Endpoint) -> Result<&'a str, ProviderError> {
        endpoint
            .user_config
            .field(ConfigField::BaseUri)
            .or_else(|| {
                self.ptb_base_uri
                    .as_deref()
                    .filter(|_| endpoint.ptb_enabled)
                    .map(str::trim)
                    .filter(|uri| !uri.is_empty())
            })
            .ok_or_else(|| ProviderError::Configuration("Azure OpenAI requires baseUri in config".to_owned()))
    }
}

/// Deployment segment: explicit name, then the upstream model id, then the
/// caller's model name
fn deployment_name(endpoint: &Endpoint) -> Result<&str, ProviderError> {
    let provider_model_id = endpoint.provider_model_id.trim();

    endpoint
        .user_config
        .field(ConfigField::DeploymentName)
        .or_else(|| (!provider_model_id.is_empty()).then_some(provider_model_id))
        .or_else(|| endpoint.user_config.field(ConfigField::ModelName))
        .ok_or_else(|| {
            ProviderError::Configuration(
                "Azure OpenAI requires deploymentName, providerModelId, or modelName in config".to_owned(),
            )
        })
}

#[async_trait]
impl ProviderAdapter for AzureAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Azure
    }

    fn build_url(&self, endpoint: &Endpoint, _params: &RequestParams) -> Result<String, ProviderError> {
        let base_uri = self.base_uri(endpoint)?.trim_end_matches('/');
        let deployment = deployment_name(endpoint)?;
        let api_version = endpoint
            .user_config
            .field(ConfigField::ApiVersion)
            .unwrap_or(DEFAULT_API_VERSION);

        Ok(format!(
            "{base_uri}/openai/deployments/{deployment}/chat/completions?api-version={api_version}"
        ))
    }

    async fn authenticate(
        &self,
        context: &AuthContext,
        _endpoint: &Endpoint,
        _cache: Option<&Arc<dyn CacheProvider>>,
    ) -> Result<AuthResult, ProviderError> {
        key_header_auth(self.kind(), context, "api-key")
    }
}
