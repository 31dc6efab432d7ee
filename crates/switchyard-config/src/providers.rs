use serde::Deserialize;
use url::Url;

/// Google service-account token exchange
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GcpConfig {
    /// Token endpoint overriding the one in the service-account key
    #[serde(default)]
    pub token_uri: Option<Url>,
}

/// Azure `OpenAI`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AzureConfig {
    /// Resource used by pay-through-billing endpoints that set no `base_uri`
    #[serde(default)]
    pub ptb_base_uri: Option<Url>,
}
