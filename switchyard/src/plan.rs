use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::Context;
use http::HeaderMap;
use serde::Serialize;
use serde_json::{Value, json};
use switchyard_auth::{GoogleTokenIssuer, MemoryTokenCache};
use switchyard_config::Config;
use switchyard_core::{AuthType, BodyMapping, ProviderKind, RequestParams};
use switchyard_provider::{
    AdapterRegistry, ProviderError, RegistryOptions, RequestBodyContext, WireTranslator, prepare_attempt,
};
use switchyard_routing::{PriorityTable, plan_attempts};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::args::PlanArgs;

const REDACTED: &str = "REDACTED";

/// Headers that carry credentials
const SECRET_HEADERS: [&str; 4] = ["authorization", "x-api-key", "api-key", "x-amz-security-token"];

#[derive(Debug, Serialize)]
pub struct PlannedAttempt {
    attempt: String,
    provider: ProviderKind,
    auth_type: AuthType,
    priority: u32,
    #[serde(flatten)]
    outcome: Outcome,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum Outcome {
    Prepared {
        method: String,
        url: String,
        headers: BTreeMap<String, String>,
        body: Value,
    },
    Failed {
        message: String,
    },
}

/// Adapters configured from the `[gcp]` and `[azure]` sections
fn build_registry(config: &Config) -> AdapterRegistry {
    let mut google = GoogleTokenIssuer::new(Arc::new(MemoryTokenCache::new()));
    if let Some(token_uri) = &config.gcp.token_uri {
        google = google.with_token_uri(token_uri.as_str());
    }

    AdapterRegistry::standard(RegistryOptions {
        azure_ptb_base_uri: config.azure.ptb_base_uri.as_ref().map(|uri| uri.as_str().to_owned()),
        google,
    })
}

pub async fn run(config: &Config, args: &PlanArgs, cancel: &CancellationToken) -> anyhow::Result<Vec<PlannedAttempt>> {
    let body_mapping = BodyMapping::from(args.mapping);
    let body = match &args.body {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read request body {}", path.display()))?;
            serde_json::from_str(&raw).with_context(|| format!("request body {} is not JSON", path.display()))?
        }
        None => default_body(body_mapping),
    };

    let registry = build_registry(config);
    let priorities = PriorityTable::with_overrides(config.priorities.clone());
    let attempts = plan_attempts(&args.model, config, &registry, &priorities)?;

    let context = RequestBodyContext::new(&body, body_mapping, &WireTranslator);
    let params = RequestParams {
        is_streaming: args.stream,
        body_mapping,
        api_key: None,
    };

    let mut planned = Vec::with_capacity(attempts.len());

    for attempt in &attempts {
        let adapter = registry.get(attempt.endpoint.provider)?;
        let mut auth = config
            .endpoint(&attempt.name)
            .map(switchyard_config::EndpointConfig::auth_context)
            .unwrap_or_default();
        auth.body_mapping = body_mapping;

        let outcome = match prepare_attempt(adapter.as_ref(), attempt, auth, &params, &context, None, cancel).await {
            Ok(prepared) => Outcome::Prepared {
                method: prepared.method.to_string(),
                url: redact_url(&prepared.url),
                headers: redact_headers(prepared.headers),
                body: serde_json::from_str(&prepared.body).unwrap_or(Value::String(prepared.body)),
            },
            Err(ProviderError::Cancelled) => anyhow::bail!("planning cancelled"),
            Err(e) => Outcome::Failed { message: e.to_string() },
        };

        planned.push(PlannedAttempt {
            attempt: attempt.name.clone(),
            provider: attempt.endpoint.provider,
            auth_type: attempt.auth_type,
            priority: attempt.priority,
            outcome,
        });
    }

    Ok(planned)
}

fn default_body(mapping: BodyMapping) -> Value {
    match mapping {
        BodyMapping::Responses => json!({ "input": "ping" }),
        BodyMapping::OpenAi | BodyMapping::NoMapping => json!({
            "messages": [{ "role": "user", "content": "ping" }],
        }),
    }
}

/// Render headers with credential values masked
fn redact_headers(mut headers: HeaderMap) -> BTreeMap<String, String> {
    for name in SECRET_HEADERS {
        if let Some(value) = headers.get_mut(name) {
            value.set_sensitive(true);
        }
    }

    headers
        .iter()
        .map(|(name, value)| {
            let rendered = if value.is_sensitive() {
                REDACTED.to_owned()
            } else {
                String::from_utf8_lossy(value.as_bytes()).into_owned()
            };
            (name.as_str().to_owned(), rendered)
        })
        .collect()
}

/// Mask the `key` query parameter used by URL-authenticated providers
fn redact_url(raw: &str) -> String {
    let Ok(mut url) = Url::parse(raw) else {
        return raw.to_owned();
    };

    if !url.query_pairs().any(|(name, _)| name == "key") {
        return raw.to_owned();
    }

    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(name, value)| {
            let value = if name == "key" { REDACTED.to_owned() } else { value.into_owned() };
            (name.into_owned(), value)
        })
        .collect();
    url.query_pairs_mut().clear().extend_pairs(pairs);

    url.to_string()
}

#[cfg(test)]
mod tests {
    use http::header::{AUTHORIZATION, CONTENT_TYPE, HeaderValue};

    use super::*;

    #[test]
    fn credential_headers_are_masked() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer sk-live"));
        headers.insert("x-api-key", HeaderValue::from_static("sk-ant"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let rendered = redact_headers(headers);
        assert_eq!(rendered["authorization"], REDACTED);
        assert_eq!(rendered["x-api-key"], REDACTED);
        assert_eq!(rendered["content-type"], "application/json");
    }

    #[test]
    fn url_key_is_masked() {
        assert_eq!(
            redact_url("https://generativelanguage.googleapis.com/v1beta/models/g:streamGenerateContent?alt=sse&key=AIza"),
            "https://generativelanguage.googleapis.com/v1beta/models/g:streamGenerateContent?alt=sse&key=REDACTED"
        );
        assert_eq!(
            redact_url("https://api.groq.com/openai/v1/chat/completions"),
            "https://api.groq.com/openai/v1/chat/completions"
        );
    }
}
