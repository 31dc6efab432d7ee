//! Google AI Studio (Generative Language API)
//!
//! The API key travels in the `key` query parameter, so authentication
//! contributes no headers.

use std::sync::Arc;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use switchyard_auth::CacheProvider;
use switchyard_core::{AuthContext, AuthResult, Endpoint, ProviderKind, RequestParams};

use super::{ProviderAdapter, remove_field};
use crate::ProviderError;
use crate::translate::RequestBodyContext;

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

#[derive(Debug, Clone, Copy, Default)]
pub struct GoogleAiStudioAdapter;

#[async_trait]
impl ProviderAdapter for GoogleAiStudioAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::GoogleAiStudio
    }

    fn build_url(&self, endpoint: &Endpoint, params: &RequestParams) -> Result<String, ProviderError> {
        let api_key = params
            .api_key
            .as_ref()
            .map(|key| key.expose_secret())
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ProviderError::Configuration("Google AI Studio requires an API key".to_owned()))?;
        let model_id = &endpoint.provider_model_id;

        Ok(if params.is_streaming {
            format!("{BASE_URL}/{model_id}:streamGenerateContent?alt=sse&key={api_key}")
        } else {
            format!("{BASE_URL}/{model_id}:generateContent?key={api_key}")
        })
    }

    async fn authenticate(
        &self,
        _context: &AuthContext,
        _endpoint: &Endpoint,
        _cache: Option<&Arc<dyn CacheProvider>>,
    ) -> Result<AuthResult, ProviderError> {
        Ok(AuthResult::empty())
    }

    async fn build_request_body(
        &self,
        _endpoint: &Endpoint,
        context: &RequestBodyContext<'_>,
    ) -> Result<String, ProviderError> {
        let mut body = context.chat_body()?;
        remove_field(&mut body, "context_editing");
        let google = context.translator.to_google(&body)?;
        Ok(serde_json::to_string(&google)?)
    }
}
