use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Shape of the caller's request body relative to the upstream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyMapping {
    /// Body is already in the upstream's native shape
    #[default]
    #[serde(rename = "NO_MAPPING")]
    NoMapping,
    /// Body is an `OpenAI` chat-completions request
    #[serde(rename = "OPENAI")]
    OpenAi,
    /// Body is an `OpenAI` Responses API request
    #[serde(rename = "RESPONSES")]
    Responses,
}

/// Per-call routing inputs
#[derive(Debug, Clone, Default)]
pub struct RequestParams {
    pub is_streaming: bool,
    pub body_mapping: BodyMapping,
    /// Only read by providers that carry the key in the URL
    pub api_key: Option<SecretString>,
}
