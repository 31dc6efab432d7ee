//! Turning an attempt into a ready-to-send request

use std::sync::Arc;

use http::header::{CONTENT_TYPE, HeaderValue};
use http::{HeaderMap, Method};
use switchyard_auth::CacheProvider;
use switchyard_core::{
    Attempt, AuthContext, ConfigField, Endpoint, ModelProviderConfig, ProviderKind, RequestParams, UserEndpointConfig,
};
use tokio_util::sync::CancellationToken;

use crate::ProviderError;
use crate::adapter::ProviderAdapter;
use crate::translate::RequestBodyContext;

/// A fully shaped upstream request for one attempt
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    /// Diagnostic label of the attempt
    pub attempt: String,
    pub provider: ProviderKind,
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: String,
}

/// Build an endpoint after checking the adapter's required config
///
/// The endpoint's upstream model id comes from the adapter's
/// `build_model_id`.
pub fn resolve_endpoint(
    adapter: &dyn ProviderAdapter,
    model_config: ModelProviderConfig,
    user_config: UserEndpointConfig,
) -> Result<Endpoint, ProviderError> {
    let missing: Vec<String> = adapter
        .required_config()
        .iter()
        .filter(|field| user_config.field(**field).is_none())
        .map(ConfigField::to_string)
        .collect();

    if !missing.is_empty() {
        return Err(ProviderError::Configuration(format!(
            "{} requires {} in config",
            adapter.kind(),
            missing.join(", ")
        )));
    }

    let provider_model_id = adapter.build_model_id(&model_config, &user_config);
    Endpoint::from_config(model_config, user_config, provider_model_id)
        .map_err(|e| ProviderError::Configuration(e.to_string()))
}

/// Build URL, body and authentication headers for one attempt
///
/// Authentication runs after the body is built so request signers see the
/// final payload, and is abandoned if `cancel` fires first.
pub async fn prepare_attempt(
    adapter: &dyn ProviderAdapter,
    attempt: &Attempt,
    mut auth: AuthContext,
    params: &RequestParams,
    body: &RequestBodyContext<'_>,
    cache: Option<&Arc<dyn CacheProvider>>,
    cancel: &CancellationToken,
) -> Result<PreparedRequest, ProviderError> {
    if cancel.is_cancelled() {
        return Err(ProviderError::Cancelled);
    }

    let endpoint = &attempt.endpoint;
    let kind = adapter.kind();

    let mut params = params.clone();
    if params.api_key.is_none() {
        params.api_key.clone_from(&auth.api_key);
    }

    let url = adapter.build_url(endpoint, &params)?;
    tracing::debug!(attempt = %attempt.name, provider = %kind, "built upstream url");

    let payload = adapter.build_request_body(endpoint, body).await?;

    auth.request_method = Some(Method::POST.to_string());
    auth.request_url = Some(url.clone());
    auth.request_body = Some(payload.clone());
    if auth.config.region.is_none() {
        auth.config.region = endpoint.user_config.field(ConfigField::Region).map(str::to_owned);
    }

    let result = tokio::select! {
        () = cancel.cancelled() => {
            tracing::debug!(attempt = %attempt.name, provider = %kind, "attempt cancelled during authentication");
            return Err(ProviderError::Cancelled);
        }
        result = adapter.authenticate(&auth, endpoint, cache) => result,
    };

    let auth_result = result.inspect_err(|e| {
        tracing::warn!(attempt = %attempt.name, provider = %kind, error = %e, "attempt authentication failed");
    })?;

    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    for (name, value) in &auth_result.headers {
        headers.insert(name.clone(), value.clone());
    }

    Ok(PreparedRequest {
        attempt: attempt.name.clone(),
        provider: kind,
        method: Method::POST,
        url,
        headers,
        body: payload,
    })
}
