//! Google Vertex AI
//!
//! Gemini models use the Google `generateContent` API; every other publisher
//! (Anthropic by default) goes through `rawPredict`.

use std::sync::Arc;

use async_trait::async_trait;
use http::HeaderMap;
use http::header::{AUTHORIZATION, HeaderValue};
use secrecy::ExposeSecret;
use serde_json::Value;
use switchyard_auth::{CLOUD_PLATFORM_SCOPE, CacheProvider, GoogleTokenIssuer};
use switchyard_core::{AuthContext, AuthResult, Author, BodyMapping, ConfigField, Endpoint, ProviderKind, RequestParams};

use super::{ProviderAdapter, error_message_field, remove_field, set_model};
use crate::ProviderError;
use crate::translate::RequestBodyContext;

const DEFAULT_REGION: &str = "us-central1";
const VERTEX_ANTHROPIC_VERSION: &str = "vertex-2023-10-16";

/// Vertex AI adapter authenticating with a service-account token issuer
#[derive(Debug, Clone)]
pub struct VertexAdapter {
    issuer: GoogleTokenIssuer,
}

impl VertexAdapter {
    pub fn new(issuer: GoogleTokenIssuer) -> Self {
        Self { issuer }
    }
}

fn is_gemini(provider_model_id: &str) -> bool {
    provider_model_id.to_ascii_lowercase().contains("gemini")
}

/// Models without an author are published by Anthropic
fn is_anthropic(endpoint: &Endpoint) -> bool {
    matches!(endpoint.author, None | Some(Author::Anthropic))
}

fn publisher(endpoint: &Endpoint) -> &str {
    endpoint.author.as_ref().map_or("anthropic", Author::vertex_publisher)
}

#[async_trait]
impl ProviderAdapter for VertexAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Vertex
    }

    fn required_config(&self) -> &'static [ConfigField] {
        &[ConfigField::ProjectId]
    }

    fn build_url(&self, endpoint: &Endpoint, params: &RequestParams) -> Result<String, ProviderError> {
        let config = &endpoint.user_config;
        let model_id = &endpoint.provider_model_id;
        let region = config.field(ConfigField::Region).unwrap_or(DEFAULT_REGION);

        if is_gemini(model_id) {
            let project_id = config.field(ConfigField::ProjectId).ok_or_else(|| {
                ProviderError::Configuration("Vertex AI requires projectId in config for Gemini models".to_owned())
            })?;
            let action = if params.is_streaming {
                "streamGenerateContent?alt=sse"
            } else {
                "generateContent"
            };

            return Ok(format!(
                "https://{region}-aiplatform.googleapis.com/v1beta1/projects/{project_id}/locations/{region}/publishers/google/models/{model_id}:{action}"
            ));
        }

        let project_id = config.field(ConfigField::ProjectId).ok_or_else(|| {
            ProviderError::Configuration(
                "Vertex AI requires projectId and region in config for non-Gemini models".to_owned(),
            )
        })?;
        let action = if params.is_streaming {
            "streamRawPredict"
        } else {
            "rawPredict"
        };
        let publisher = publisher(endpoint);

        Ok(format!(
            "https://{region}-aiplatform.googleapis.com/v1/projects/{project_id}/locations/{region}/publishers/{publisher}/models/{model_id}:{action}"
        ))
    }

    async fn authenticate(
        &self,
        context: &AuthContext,
        _endpoint: &Endpoint,
        cache: Option<&Arc<dyn CacheProvider>>,
    ) -> Result<AuthResult, ProviderError> {
        let service_account = context
            .api_key
            .as_ref()
            .map(|key| key.expose_secret())
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                ProviderError::Authentication("Service account JSON is required for Vertex AI authentication".to_owned())
            })?;

        let issuer = match cache {
            Some(cache) => self.issuer.with_cache(Arc::clone(cache)),
            None => self.issuer.clone(),
        };

        let token = issuer
            .access_token(service_account, context.org_id.as_deref(), &[CLOUD_PLATFORM_SCOPE])
            .await
            .map_err(|e| ProviderError::Authentication(e.to_string()))?;

        let value = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| ProviderError::Authentication("Google access token is not a valid header value".to_owned()))?;

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, value);
        Ok(AuthResult::from_headers(headers))
    }

    async fn build_request_body(
        &self,
        endpoint: &Endpoint,
        context: &RequestBodyContext<'_>,
    ) -> Result<String, ProviderError> {
        if is_gemini(&endpoint.provider_model_id) {
            let google = context.translator.to_google(&context.chat_body()?)?;
            return Ok(serde_json::to_string(&google)?);
        }

        if !is_anthropic(endpoint) {
            let mut body = context.parsed_body.clone();
            set_model(&mut body, &endpoint.provider_model_id);
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
                Value::String(VERTEX_ANTHROPIC_VERSION.to_owned()),
            );
        }

        Ok(serde_json::to_string(&body)?)
    }

    /// Anthropic publishers return `{error}`; Gemini returns `[{error}]`
    fn build_error_message(&self, status: u16, body: &str) -> String {
        let parsed = serde_json::from_str::<Value>(body).ok();
        let message = match &parsed {
            Some(Value::Array(items)) => items.first().and_then(error_message_field),
            Some(value) => error_message_field(value),
            None => None,
        };

        message.unwrap_or_else(|| format!("Request failed with status {status}"))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use switchyard_auth::MemoryTokenCache;
    use switchyard_core::UserEndpointConfig;

    use super::*;
    use crate::WireTranslator;
    use crate::adapter::test_support::{model_config, streaming, with_key};
    use crate::translate::BodyTranslator;

    fn adapter() -> VertexAdapter {
        VertexAdapter::new(GoogleTokenIssuer::new(Arc::new(MemoryTokenCache::new())))
    }

    fn vertex_endpoint(model_id: &str, author: Option<Author>, project_id: Option<&str>, region: Option<&str>) -> Endpoint {
        let mut config = model_config(ProviderKind::Vertex, model_id);
        config.author = author;
        let user_config = UserEndpointConfig {
            project_id: project_id.map(str::to_owned),
            region: region.map(str::to_owned),
            ..UserEndpointConfig::default()
        };
        Endpoint::from_config(config, user_config, model_id.to_owned()).unwrap()
    }

    fn url(endpoint: &Endpoint, params: &RequestParams) -> Result<String, ProviderError> {
        adapter().build_url(endpoint, params)
    }

    #[test]
    fn gemini_generate_content_urls() {
        let endpoint = vertex_endpoint("gemini-1.5-pro", Some(Author::Google), Some("test-project"), Some("eu-west1"));

        assert_eq!(
            url(&endpoint, &RequestParams::default()).unwrap(),
            "https://eu-west1-aiplatform.googleapis.com/v1beta1/projects/test-project/locations/eu-west1/publishers/google/models/gemini-1.5-pro:generateContent"
        );
        assert_eq!(
            url(&endpoint, &streaming()).unwrap(),
            "https://eu-west1-aiplatform.googleapis.com/v1beta1/projects/test-project/locations/eu-west1/publishers/google/models/gemini-1.5-pro:streamGenerateContent?alt=sse"
        );
    }

    #[test]
    fn gemini_detection_ignores_case() {
        let upper = vertex_endpoint("GEMINI-1.5-PRO", Some(Author::Google), Some("p"), Some("us-central1"));
        let lower = vertex_endpoint("gemini-1.5-pro", Some(Author::Google), Some("p"), Some("us-central1"));

        let upper_url = url(&upper, &RequestParams::default()).unwrap();
        let lower_url = url(&lower, &RequestParams::default()).unwrap();
        assert!(upper_url.contains("/v1beta1/") && upper_url.ends_with("GEMINI-1.5-PRO:generateContent"));
        assert_eq!(upper_url.to_lowercase(), lower_url.to_lowercase());
    }

    #[test]
    fn claude_raw_predict_urls() {
        let endpoint = vertex_endpoint("claude-3-sonnet", Some(Author::Anthropic), Some("my-project"), Some("europe-west1"));

        assert_eq!(
            url(&endpoint, &RequestParams::default()).unwrap(),
            "https://europe-west1-aiplatform.googleapis.com/v1/projects/my-project/locations/europe-west1/publishers/anthropic/models/claude-3-sonnet:rawPredict"
        );
        assert!(url(&endpoint, &streaming()).unwrap().ends_with("claude-3-sonnet:streamRawPredict"));
    }

    #[test]
    fn missing_project_id_is_a_configuration_error() {
        let gemini = vertex_endpoint("gemini-pro", Some(Author::Google), None, Some("us-central1"));
        let err = url(&gemini, &RequestParams::default()).unwrap_err();
        assert_eq!(err.to_string(), "Vertex AI requires projectId in config for Gemini models");

        let claude = vertex_endpoint("claude-3", Some(Author::Anthropic), None, Some("us-central1"));
        let err = url(&claude, &RequestParams::default()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Vertex AI requires projectId and region in config for non-Gemini models"
        );
    }

    #[test]
    fn region_and_author_defaults() {
        let gemini = vertex_endpoint("gemini-pro", Some(Author::Google), Some("test-project"), None);
        assert!(
            url(&gemini, &RequestParams::default())
                .unwrap()
                .starts_with("https://us-central1-aiplatform.googleapis.com/v1beta1/projects/test-project/locations/us-central1/")
        );

        let claude = vertex_endpoint("claude-3", None, Some("test-project"), None);
        assert_eq!(
            url(&claude, &RequestParams::default()).unwrap(),
            "https://us-central1-aiplatform.googleapis.com/v1/projects/test-project/locations/us-central1/publishers/anthropic/models/claude-3:rawPredict"
        );
    }

    #[test]
    fn empty_model_id_takes_raw_predict_path() {
        let endpoint = vertex_endpoint("", None, Some("test-project"), Some("us-central1"));
        assert_eq!(
            url(&endpoint, &RequestParams::default()).unwrap(),
            "https://us-central1-aiplatform.googleapis.com/v1/projects/test-project/locations/us-central1/publishers/anthropic/models/:rawPredict"
        );
    }

    #[test]
    fn non_anthropic_publishers_use_their_own_path() {
        let endpoint = vertex_endpoint("mistral-large", Some(Author::Mistral), Some("p"), Some("us-central1"));
        assert!(
            url(&endpoint, &RequestParams::default())
                .unwrap()
                .contains("/publishers/mistralai/models/mistral-large:rawPredict")
        );
    }

    #[test]
    fn unlisted_authors_keep_their_publisher_tag() {
        let author: Author = serde_json::from_str("\"zhipu\"").unwrap();
        let endpoint = vertex_endpoint("glm-4", Some(author), Some("p"), Some("us-central1"));
        assert_eq!(
            url(&endpoint, &RequestParams::default()).unwrap(),
            "https://us-central1-aiplatform.googleapis.com/v1/projects/p/locations/us-central1/publishers/zhipu/models/glm-4:rawPredict"
        );
    }

    async fn body(endpoint: &Endpoint, body: &Value, mapping: BodyMapping, translator: &dyn BodyTranslator) -> Value {
        let context = RequestBodyContext::new(body, mapping, translator);
        serde_json::from_str(&adapter().build_request_body(endpoint, &context).await.unwrap()).unwrap()
    }

    #[tokio::test]
    async fn gemini_bodies_use_generate_content_shape() {
        let endpoint = vertex_endpoint("gemini-1.5-pro", Some(Author::Google), Some("p"), None);
        let input = json!({
            "model": "gemini-1.5-pro",
            "messages": [{"role": "user", "content": "Hello"}],
            "temperature": 0.5,
            "max_tokens": 1024
        });

        let out = body(&endpoint, &input, BodyMapping::OpenAi, &WireTranslator).await;
        assert_eq!(out["contents"], json!([{"role": "user", "parts": [{"text": "Hello"}]}]));
        assert_eq!(out["generationConfig"], json!({"temperature": 0.5, "maxOutputTokens": 1024}));
    }

    struct MarkingTranslator;

    impl BodyTranslator for MarkingTranslator {
        fn to_anthropic(&self, body: &Value) -> Result<Value, ProviderError> {
            let mut out = body.clone();
            out["anthropic_content"] = json!(true);
            Ok(out)
        }

        fn to_chat_completions(&self, body: &Value) -> Result<Value, ProviderError> {
            Ok(body.clone())
        }

        fn to_google(&self, body: &Value) -> Result<Value, ProviderError> {
            Ok(body.clone())
        }
    }

    #[tokio::test]
    async fn claude_bodies_get_vertex_anthropic_version() {
        let input = json!({"model": "claude-3-haiku", "messages": [{"role": "user", "content": "Test"}]});

        let endpoint = vertex_endpoint("claude-3-haiku", Some(Author::Anthropic), Some("p"), None);
        let mapped = body(&endpoint, &input, BodyMapping::OpenAi, &MarkingTranslator).await;
        assert_eq!(mapped["anthropic_version"], VERTEX_ANTHROPIC_VERSION);
        assert_eq!(mapped["anthropic_content"], true);
        assert!(mapped.get("model").is_none());

        let native = body(&endpoint, &input, BodyMapping::NoMapping, &MarkingTranslator).await;
        assert_eq!(native["anthropic_version"], VERTEX_ANTHROPIC_VERSION);
        assert!(native.get("anthropic_content").is_none());
    }

    #[tokio::test]
    async fn responses_bodies_become_anthropic_messages_for_claude() {
        let endpoint = vertex_endpoint("claude-3-5-sonnet@20241022", Some(Author::Anthropic), Some("p"), None);
        let input = json!({"model": "x", "input": "hi"});

        let out = body(&endpoint, &input, BodyMapping::Responses, &WireTranslator).await;
        assert_eq!(
            out,
            json!({
                "anthropic_version": VERTEX_ANTHROPIC_VERSION,
                "max_tokens": 4096,
                "messages": [{"role": "user", "content": "hi"}],
            })
        );
    }

    #[tokio::test]
    async fn other_publishers_pass_through() {
        let endpoint = vertex_endpoint("some-other-model", Some(Author::Other("some-publisher".to_owned())), Some("p"), None);
        let input = json!({"model": "some-other-model", "custom_field": "custom_value"});

        let out = body(&endpoint, &input, BodyMapping::NoMapping, &MarkingTranslator).await;
        assert_eq!(out, input);
    }

    #[tokio::test]
    async fn missing_service_account_fails_authentication() {
        let endpoint = vertex_endpoint("gemini-pro", Some(Author::Google), Some("p"), None);
        let context = AuthContext {
            org_id: Some("test-org".to_owned()),
            ..AuthContext::default()
        };

        let err = adapter().authenticate(&context, &endpoint, None).await.unwrap_err();
        assert_eq!(err.to_string(), "Service account JSON is required for Vertex AI authentication");
        assert!(matches!(err, ProviderError::Authentication(_)));

        let err = adapter()
            .authenticate(&with_key(r#"{"type":"service_account"}"#), &endpoint, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Authentication(_)));
    }

    #[test]
    fn error_messages_from_both_shapes() {
        let adapter = adapter();
        assert_eq!(
            adapter.build_error_message(400, r#"{"error":{"message":"bad anthropic request"}}"#),
            "bad anthropic request"
        );
        assert_eq!(
            adapter.build_error_message(429, r#"[{"error":{"code":429,"message":"quota exhausted"}}]"#),
            "quota exhausted"
        );
        assert_eq!(adapter.build_error_message(503, "unavailable"), "Request failed with status 503");
    }
}
