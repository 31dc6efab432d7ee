use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Upstream provider tag
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, EnumString, EnumIter, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ProviderKind {
    /// `OpenAI` direct
    OpenAi,
    /// Anthropic direct (Messages API)
    Anthropic,
    /// Azure `OpenAI` deployments
    Azure,
    /// AWS Bedrock runtime
    Bedrock,
    /// Google Vertex AI
    Vertex,
    /// Google AI Studio (Generative Language API)
    #[serde(rename = "google-ai-studio")]
    #[strum(serialize = "google-ai-studio")]
    GoogleAiStudio,
    /// Gateway-hosted inference
    Helicone,
    Groq,
    DeepSeek,
    Cohere,
    Fireworks,
    Mistral,
    Nebius,
    Novita,
    Perplexity,
    Xai,
    Cerebras,
    Chutes,
    DeepInfra,
    Baseten,
    #[serde(rename = "io-intelligence")]
    #[strum(serialize = "io-intelligence")]
    IoIntelligence,
    CanopyWave,
    OpenRouter,
}

/// Model family that authored a model
///
/// Tags without dedicated handling are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Author {
    Anthropic,
    Google,
    OpenAi,
    Meta,
    Mistral,
    DeepSeek,
    Xai,
    Cohere,
    Qwen,
    Moonshot,
    Other(String),
}

impl Author {
    /// Config tag of this author
    pub fn as_str(&self) -> &str {
        match self {
            Self::Anthropic => "anthropic",
            Self::Google => "google",
            Self::OpenAi => "openai",
            Self::Meta => "meta",
            Self::Mistral => "mistral",
            Self::DeepSeek => "deepseek",
            Self::Xai => "xai",
            Self::Cohere => "cohere",
            Self::Qwen => "qwen",
            Self::Moonshot => "moonshot",
            Self::Other(tag) => tag,
        }
    }

    /// Publisher segment used in Vertex AI model paths
    pub fn vertex_publisher(&self) -> &str {
        match self {
            Self::Mistral => "mistralai",
            Self::DeepSeek => "deepseek-ai",
            Self::Moonshot => "moonshotai",
            other => other.as_str(),
        }
    }
}

impl From<String> for Author {
    fn from(tag: String) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "anthropic" => Self::Anthropic,
            "google" => Self::Google,
            "openai" => Self::OpenAi,
            "meta" => Self::Meta,
            "mistral" => Self::Mistral,
            "deepseek" => Self::DeepSeek,
            "xai" => Self::Xai,
            "cohere" => Self::Cohere,
            "qwen" => Self::Qwen,
            "moonshot" => Self::Moonshot,
            _ => Self::Other(tag),
        }
    }
}

impl From<Author> for String {
    fn from(author: Author) -> Self {
        match author {
            Author::Other(tag) => tag,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for Author {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
