//! AWS Bedrock runtime (`InvokeModel`)

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use http::HeaderMap;
use http::header::{CONTENT_TYPE, HOST, HeaderValue};
use secrecy::ExposeSecret;
use serde_json::Value;
use switchyard_auth::{AwsCredentials, CacheProvider, SigV4Signer, SignableRequest};
use switchyard_core::{
    AuthContext, AuthResult, BodyMapping, ConfigField, Endpoint, ModelProviderConfig, ProviderKind, RequestParams,
    UserEndpointConfig,
};

use super::{ProviderAdapter, remove_field};
use crate::ProviderError;
use crate::translate::RequestBodyContext;

const SIGNING_SERVICE: &str = "bedrock";
const DEFAULT_URL_REGION: &str = "us-east-1";
// Signing falls back to a different region than the URL does
const DEFAULT_SIGNING_REGION: &str = "us-west-1";
const BEDROCK_ANTHROPIC_VERSION: &str = "bedrock-2023-05-31";

#[derive(Debug, Clone, Copy, Default)]
pub struct BedrockAdapter;

/// Inference-profile prefix for a region (`us-east-1` -> `us`, `ap-south-1` -> `apac`)
fn region_prefix(region: &str) -> &str {
    match region.split('-').next().unwrap_or(region) {
        "ap" => "apac",
        prefix => prefix,
    }
}

fn host(region: &str) -> String {
    format!("bedrock-runtime.{region}.amazonaws.com")
}

#[async_trait]
impl ProviderAdapter for BedrockAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Bedrock
    }

    fn build_model_id(&self, model_config: &ModelProviderConfig, user_config: &UserEndpointConfig) -> String {
        match user_config.field(ConfigField::Region) {
            Some(region) if user_config.cross_region() && model_config.cross_region => {
                format!("{}.{}", region_prefix(region), model_config.provider_model_id)
            }
            _ => model_config.provider_model_id.clone(),
        }
    }

    fn build_url(&self, endpoint: &Endpoint, params: &RequestParams) -> Result<String, ProviderError> {
        let region = endpoint
            .user_config
            .field(ConfigField::Region)
            .unwrap_or(DEFAULT_URL_REGION);
        let model_id = self.build_model_id(&endpoint.model_config, &endpoint.user_config);
        let action = if params.is_streaming {
            "invoke-with-response-stream"
        } else {
            "invoke"
        };

        let url = format!("https://{}/model/{model_id}/{action}", host(region));
        tracing::debug!(provider = %self.kind(), url = %url, "built bedrock url");
        Ok(url)
    }

    async fn authenticate(
        &self,
        context: &AuthContext,
        _endpoint: &Endpoint,
        _cache: Option<&Arc<dyn CacheProvider>>,
    ) -> Result<AuthResult, ProviderError> {
        let (Some(access_key), Some(secret_key)) = (&context.api_key, &context.secret_key) else {
            return Err(ProviderError::Configuration(
                "Bedrock requires both apiKey and secretKey".to_owned(),
            ));
        };

        let (Some(method), Some(url), Some(body)) =
            (&context.request_method, &context.request_url, &context.request_body)
        else {
            return Err(ProviderError::Configuration(
                "Bedrock authentication requires requestMethod, requestUrl, and requestBody".to_owned(),
            ));
        };

        let region = context
            .config
            .region
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or(DEFAULT_SIGNING_REGION);

        let credentials = AwsCredentials::new(access_key.expose_secret(), secret_key.expose_secret());
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let request = SignableRequest {
            method,
            url,
            headers: &headers,
            body: body.as_bytes(),
        };

        let mut signed = SigV4Signer::new(SIGNING_SERVICE, region).sign(&credentials, &request, Utc::now())?;

        let host = HeaderValue::from_str(&host(region))
            .map_err(|_| ProviderError::Configuration(format!("invalid Bedrock region: {region}")))?;
        signed.insert(HOST, host);

        Ok(AuthResult::from_headers(signed))
    }

    async fn build_request_body(
        &self,
        endpoint: &Endpoint,
        context: &RequestBodyContext<'_>,
    ) -> Result<String, ProviderError> {
        if !endpoint.provider_model_id.contains("claude-") {
            let mut body = context.chat_body()?;
            super::set_model(&mut body, &endpoint.provider_model_id);
            return Ok(serde_json::to_string(&body)?);
        }

        let mut body = match context.body_mapping {
            BodyMapping::NoMapping => context.parsed_body.clone(),
            BodyMapping::OpenAi | BodyMapping::Responses => context.translator.to_anthropic(&context.chat_body()?)?,
        };

        remove_field(&mut body, "model");
        if let Some(obj) = body.as_object_mut() {
            obj.insert(
                "anthropic_version".to_owned(),
                Value::String(BEDROCK_ANTHROPIC_VERSION.to_owned()),
            );
        }

        Ok(serde_json::to_string(&body)?)
    }
}
