//! Request body translation between wire formats
//!
//! Adapters never convert bodies themselves; they call the
//! [`BodyTranslator`] carried in the [`RequestBodyContext`]. The
//! [`WireTranslator`] covers text and tool-calling chat requests and can be
//! replaced by the caller's own translation layer.

mod anthropic;
mod chat;
mod google;
mod responses;

use serde_json::Value;
use switchyard_core::BodyMapping;

use crate::ProviderError;

/// Converts a caller's request body into another provider's wire shape
pub trait BodyTranslator: Send + Sync {
    /// `OpenAI` chat-completions body to Anthropic Messages body
    fn to_anthropic(&self, body: &Value) -> Result<Value, ProviderError>;

    /// `OpenAI` Responses body to chat-completions body
    fn to_chat_completions(&self, body: &Value) -> Result<Value, ProviderError>;

    /// `OpenAI` chat-completions body to Google `generateContent` body
    fn to_google(&self, body: &Value) -> Result<Value, ProviderError>;
}

/// Inputs to `build_request_body`
#[derive(Clone, Copy)]
pub struct RequestBodyContext<'a> {
    /// Caller's normalized request
    pub parsed_body: &'a Value,
    pub body_mapping: BodyMapping,
    pub translator: &'a dyn BodyTranslator,
}

impl<'a> RequestBodyContext<'a> {
    pub fn new(parsed_body: &'a Value, body_mapping: BodyMapping, translator: &'a dyn BodyTranslator) -> Self {
        Self {
            parsed_body,
            body_mapping,
            translator,
        }
    }

    /// Body in chat-completions shape, converting Responses bodies first
    pub(crate) fn chat_body(&self) -> Result<Value, ProviderError> {
        match self.body_mapping {
            BodyMapping::Responses => self.translator.to_chat_completions(self.parsed_body),
            BodyMapping::OpenAi | BodyMapping::NoMapping => Ok(self.parsed_body.clone()),
        }
    }
}

impl std::fmt::Debug for RequestBodyContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestBodyContext")
            .field("parsed_body", self.parsed_body)
            .field("body_mapping", &self.body_mapping)
            .finish_non_exhaustive()
    }
}

/// Built-in translator for chat-style requests
#[derive(Debug, Clone, Copy, Default)]
pub struct WireTranslator;

impl BodyTranslator for WireTranslator {
    fn to_anthropic(&self, body: &Value) -> Result<Value, ProviderError> {
        let request: chat::ChatRequest = serde_json::from_value(body.clone())?;
        let converted = anthropic::AnthropicRequest::from(&request);
        Ok(serde_json::to_value(converted)?)
    }

    fn to_chat_completions(&self, body: &Value) -> Result<Value, ProviderError> {
        Ok(responses::to_chat_completions(body))
    }

    fn to_google(&self, body: &Value) -> Result<Value, ProviderError> {
        let request: chat::ChatRequest = serde_json::from_value(body.clone())?;
        let converted = google::GoogleRequest::from(&request);
        Ok(serde_json::to_value(converted)?)
    }
}
