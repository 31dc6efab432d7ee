//! Provider adapter trait and implementations

pub mod anthropic;
pub mod azure;
pub mod bedrock;
pub mod compatible;
pub mod google;
pub mod openai;
pub mod vertex;

use std::sync::Arc;

use async_trait::async_trait;
use http::HeaderMap;
use http::header::{AUTHORIZATION, HeaderName, HeaderValue};
use secrecy::ExposeSecret;
use serde_json::Value;
use switchyard_auth::CacheProvider;
use switchyard_core::{
    AuthContext, AuthResult, ConfigField, Endpoint, ModelProviderConfig, ProviderKind, RequestParams, UserEndpointConfig,
};

use crate::ProviderError;
use crate::translate::RequestBodyContext;

/// Trait implemented by each upstream provider
///
/// Only `kind` and `build_url` are required; every other method has the
/// behavior shared by `OpenAI`-compatible APIs and is overridden where a
/// provider differs.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Provider served by this adapter
    fn kind(&self) -> ProviderKind;

    /// `UserEndpointConfig` fields that must be present for this provider
    fn required_config(&self) -> &'static [ConfigField] {
        &[]
    }

    /// Build the upstream URL
    ///
    /// Fails with `ProviderError::Configuration` before any I/O when the
    /// endpoint config is incomplete.
    fn build_url(&self, endpoint: &Endpoint, params: &RequestParams) -> Result<String, ProviderError>;

    /// Upstream model id for a model config and caller overrides
    fn build_model_id(&self, model_config: &ModelProviderConfig, _user_config: &UserEndpointConfig) -> String {
        model_config.provider_model_id.clone()
    }

    /// Headers authenticating the request
    async fn authenticate(
        &self,
        context: &AuthContext,
        _endpoint: &Endpoint,
        _cache: Option<&Arc<dyn CacheProvider>>,
    ) -> Result<AuthResult, ProviderError> {
        bearer_auth(self.kind(), context)
    }

    /// Serialized upstream request body
    async fn build_request_body(
        &self,
        endpoint: &Endpoint,
        context: &RequestBodyContext<'_>,
    ) -> Result<String, ProviderError> {
        let mut body = context.chat_body()?;
        set_model(&mut body, &endpoint.provider_model_id);
        Ok(serde_json::to_string(&body)?)
    }

    /// Human-readable reason from a failed upstream response
    fn build_error_message(&self, status: u16, body: &str) -> String {
        default_error_message(status, body)
    }
}

/// `Authorization: Bearer <api key>`
pub(crate) fn bearer_auth(kind: ProviderKind, context: &AuthContext) -> Result<AuthResult, ProviderError> {
    let key = require_api_key(kind, context)?;
    let value = HeaderValue::from_str(&format!("Bearer {key}"))
        .map_err(|_| ProviderError::Authentication(format!("{kind} API key is not a valid header value")))?;

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, value);
    Ok(AuthResult::from_headers(headers))
}

/// API key carried verbatim in a provider-specific header
pub(crate) fn key_header_auth(
    kind: ProviderKind,
    context: &AuthContext,
    name: &'static str,
) -> Result<AuthResult, ProviderError> {
    let key = require_api_key(kind, context)?;
    let value = HeaderValue::from_str(key)
        .map_err(|_| ProviderError::Authentication(format!("{kind} API key is not a valid header value")))?;

    let mut headers = HeaderMap::new();
    headers.insert(HeaderName::from_static(name), value);
    Ok(AuthResult::from_headers(headers))
}

fn require_api_key(kind: ProviderKind, context: &AuthContext) -> Result<&str, ProviderError> {
    context
        .api_key
        .as_ref()
        .map(|key| key.expose_secret())
        .filter(|key| !key.is_empty())
        .ok_or_else(|| ProviderError::Authentication(format!("{kind} requires an API key")))
}

/// Overwrite the `model` field of a JSON object body
pub(crate) fn set_model(body: &mut Value, model: &str) {
    if let Some(obj) = body.as_object_mut() {
        obj.insert("model".to_owned(), Value::String(model.to_owned()));
    }
}

pub(crate) fn remove_field(body: &mut Value, field: &str) {
    if let Some(obj) = body.as_object_mut() {
        obj.remove(field);
    }
}

/// `error.message` from a JSON body, or a generic status message
pub fn default_error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .as_ref()
        .and_then(error_message_field)
        .unwrap_or_else(|| format!("Request failed with status {status}"))
}

pub(crate) fn error_message_field(value: &Value) -> Option<String> {
    value
        .get("error")?
        .get("message")?
        .as_str()
        .map(str::to_owned)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::BTreeSet;

    use secrecy::SecretString;
    use switchyard_core::PricingTier;

    use super::*;

    pub fn model_config(provider: ProviderKind, provider_model_id: &str) -> ModelProviderConfig {
        ModelProviderConfig {
            provider_model_id: provider_model_id.to_owned(),
            provider,
            author: None,
            pricing: vec![PricingTier {
                threshold: 0,
                input: 0.000_001,
                output: 0.000_002,
            }],
            context_length: 128_000,
            max_completion_tokens: 8_192,
            ptb_enabled: false,
            cross_region: false,
            supported_parameters: BTreeSet::new(),
        }
    }

    pub fn endpoint(provider: ProviderKind, provider_model_id: &str, user_config: UserEndpointConfig) -> Endpoint {
        Endpoint::from_config(model_config(provider, provider_model_id), user_config, provider_model_id.to_owned())
            .unwrap()
    }

    pub fn with_key(key: &str) -> AuthContext {
        AuthContext {
            api_key: Some(SecretString::from(key.to_owned())),
            ..AuthContext::default()
        }
    }

    pub fn streaming() -> RequestParams {
        RequestParams {
            is_streaming: true,
            ..RequestParams::default()
        }
    }
}
