//! Mock Google OAuth token endpoint
//!
//! Accepts the JWT-bearer grant and hands out numbered access tokens.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Json, Router, routing};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

pub struct MockTokenEndpoint {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<TokenState>,
}

struct TokenState {
    exchange_count: AtomicU32,
    /// Reject every exchange with this status when set
    reject_with: Option<StatusCode>,
}

#[derive(Debug, Deserialize)]
struct TokenRequest {
    grant_type: String,
    assertion: String,
}

impl MockTokenEndpoint {
    pub async fn start() -> anyhow::Result<Self> {
        Self::start_inner(None).await
    }

    /// Start an endpoint that refuses every assertion
    pub async fn start_rejecting(status: StatusCode) -> anyhow::Result<Self> {
        Self::start_inner(Some(status)).await
    }

    async fn start_inner(reject_with: Option<StatusCode>) -> anyhow::Result<Self> {
        let state = Arc::new(TokenState {
            exchange_count: AtomicU32::new(0),
            reject_with,
        });

        let app = Router::new()
            .route("/token", routing::post(handle_token))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let stop = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move { stop.cancelled().await })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    pub fn token_uri(&self) -> String {
        format!("http://{}/token", self.addr)
    }

    /// Number of token exchanges received
    pub fn exchange_count(&self) -> u32 {
        self.state.exchange_count.load(Ordering::SeqCst)
    }
}

impl Drop for MockTokenEndpoint {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn handle_token(State(state): State<Arc<TokenState>>, Form(request): Form<TokenRequest>) -> impl IntoResponse {
    let n = state.exchange_count.fetch_add(1, Ordering::SeqCst) + 1;

    if let Some(status) = state.reject_with {
        let body = serde_json::json!({"error": "invalid_grant", "error_description": "Invalid JWT Signature."});
        return (status, Json(body));
    }

    if request.grant_type != JWT_BEARER_GRANT || request.assertion.split('.').count() != 3 {
        return (StatusCode::BAD_REQUEST, Json(serde_json::json!({"error": "unsupported_grant_type"})));
    }

    // Give concurrent callers a chance to pile up on the same key
    tokio::time::sleep(std::time::Duration::from_millis(25)).await;

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "access_token": format!("ya29.mock-{n}"),
            "expires_in": 3600,
            "token_type": "Bearer",
        })),
    )
}
