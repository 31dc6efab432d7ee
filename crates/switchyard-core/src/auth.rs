use http::HeaderMap;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::request::BodyMapping;

/// Free-form settings passed through to authentication
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthConfig {
    /// Signing region for providers that sign requests
    pub region: Option<String>,
}

/// Inputs to `authenticate`
#[derive(Debug, Clone, Default)]
pub struct AuthContext {
    /// API key, access key id, or service-account JSON depending on provider
    pub api_key: Option<SecretString>,
    /// AWS secret access key
    pub secret_key: Option<SecretString>,
    pub body_mapping: BodyMapping,
    pub org_id: Option<String>,
    /// Fields of the final request, used when signing
    pub request_method: Option<String>,
    pub request_url: Option<String>,
    pub request_body: Option<String>,
    pub config: AuthConfig,
}

/// Output of `authenticate`
#[derive(Debug, Clone, Default)]
pub struct AuthResult {
    pub headers: HeaderMap,
}

impl AuthResult {
    /// Result with no headers (credential travels elsewhere)
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_headers(headers: HeaderMap) -> Self {
        Self { headers }
    }
}
