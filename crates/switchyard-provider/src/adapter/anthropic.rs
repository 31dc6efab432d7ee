//! Anthropic direct (Messages API)

use std::sync::Arc;

use async_trait::async_trait;
use http::header::{HeaderName, HeaderValue};
use switchyard_auth::CacheProvider;
use switchyard_core::{AuthContext, AuthResult, BodyMapping, Endpoint, ProviderKind, RequestParams};

use super::{ProviderAdapter, key_header_auth, set_model};
use crate::ProviderError;
use crate::translate::RequestBodyContext;

const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";

/// Anthropic API version header value
const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Clone, Copy, Default)]
pub struct AnthropicAdapter;

#[async_trait]
impl ProviderAdapter for AnthropicAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Anthropic
    }

    fn build_url(&self, _endpoint: &Endpoint, _params: &RequestParams) -> Result<String, ProviderError> {
        Ok(MESSAGES_URL.to_owned())
    }

    async fn authenticate(
        &self,
        context: &AuthContext,
        _endpoint: &Endpoint,
        _cache: Option<&Arc<dyn CacheProvider>>,
    ) -> Result<AuthResult, ProviderError> {
        let mut auth = key_header_auth(self.kind(), context, "x-api-key")?;
        auth.headers.insert(
            HeaderName::from_static("anthropic-version"),
            HeaderValue::from_static(ANTHROPIC_VERSION),
        );
        Ok(auth)
    }

    async fn build_request_body(
        &self,
        endpoint: &Endpoint,
        context: &RequestBodyContext<'_>,
    ) -> Result<String, ProviderError> {
        let mut body = match context.body_mapping {
            BodyMapping::NoMapping => context.parsed_body.clone(),
            BodyMapping::OpenAi | BodyMapping::Responses => context.translator.to_anthropic(&context.chat_body()?)?,
        };

        set_model(&mut body, &endpoint.provider_model_id);
        Ok(serde_json::to_string(&body)?)
    }
}
