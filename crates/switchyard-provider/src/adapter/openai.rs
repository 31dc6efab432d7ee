//! `OpenAI` direct

use async_trait::async_trait;
use switchyard_core::{BodyMapping, Endpoint, ProviderKind, RequestParams};

use super::{ProviderAdapter, remove_field, set_model};
use crate::ProviderError;
use crate::translate::RequestBodyContext;

const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";
const RESPONSES_URL: &str = "https://api.openai.com/v1/responses";

#[derive(Debug, Clone, Copy, Default)]
pub struct OpenAiAdapter;

#[async_trait]
impl ProviderAdapter for OpenAiAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAi
    }

    fn build_url(&self, _endpoint: &Endpoint, params: &RequestParams) -> Result<String, ProviderError> {
        let url = match params.body_mapping {
            BodyMapping::Responses => RESPONSES_URL,
            BodyMapping::OpenAi | BodyMapping::NoMapping => CHAT_COMPLETIONS_URL,
        };
        Ok(url.to_owned())
    }

    async fn build_request_body(
        &self,
        endpoint: &Endpoint,
        context: &RequestBodyContext<'_>,
    ) -> Result<String, ProviderError> {
        // The Responses API is native here; only unsupported fields are dropped
        let mut body = if context.body_mapping == BodyMapping::Responses {
            let mut body = context.parsed_body.clone();
            remove_field(&mut body, "context_editing");
            body
        } else {
            context.chat_body()?
        };

        set_model(&mut body, &endpoint.provider_model_id);
        Ok(serde_json::to_string(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};
    use switchyard_core::UserEndpointConfig;

    use super::*;
    use crate::WireTranslator;
    use crate::adapter::test_support::endpoint;

    #[test]
    fn responses_mapping_selects_responses_url() {
        let endpoint = endpoint(ProviderKind::OpenAi, "gpt-4o", UserEndpointConfig::default());
        let chat = RequestParams::default();
        let responses = RequestParams {
            body_mapping: BodyMapping::Responses,
            ..RequestParams::default()
        };

        assert_eq!(OpenAiAdapter.build_url(&endpoint, &chat).unwrap(), CHAT_COMPLETIONS_URL);
        assert_eq!(OpenAiAdapter.build_url(&endpoint, &responses).unwrap(), RESPONSES_URL);
    }

    #[tokio::test]
    async fn responses_body_keeps_shape_and_drops_context_editing() {
        let endpoint = endpoint(ProviderKind::OpenAi, "gpt-4o-2024-08-06", UserEndpointConfig::default());
        let body = json!({"model": "gpt-4o", "input": "hi", "context_editing": {"enabled": true}});
        let context = RequestBodyContext::new(&body, BodyMapping::Responses, &WireTranslator);

        let out: Value = serde_json::from_str(&OpenAiAdapter.build_request_body(&endpoint, &context).await.unwrap())
            .unwrap();
        assert_eq!(out, json!({"model": "gpt-4o-2024-08-06", "input": "hi"}));
    }
}
