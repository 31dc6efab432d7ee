use http::StatusCode;
use switchyard_auth::AuthError;
use switchyard_core::HttpError;
use thiserror::Error;

use crate::adapter::ProviderAdapter;

/// Errors raised while preparing or reporting a provider attempt
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Required endpoint configuration is missing or empty
    #[error("{0}")]
    Configuration(String),

    /// Credential missing, invalid, or rejected during exchange
    #[error("{0}")]
    Authentication(String),

    /// Upstream returned a non-success response
    #[error("{message}")]
    Upstream {
        /// HTTP status returned by the provider
        status: u16,
        /// Reason extracted from the response body
        message: String,
    },

    /// Attempt was abandoned through its cancellation token
    #[error("attempt cancelled")]
    Cancelled,

    /// Request body could not be encoded or translated
    #[error("failed to encode request body: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ProviderError {
    /// Whether the caller should move on to the next attempt
    ///
    /// Configuration, authentication and upstream failures are fatal for
    /// the attempt only; a cancelled request is abandoned as a whole.
    pub const fn is_attempt_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Configuration(_) | Self::Authentication(_) | Self::Upstream { .. }
        )
    }

    /// Upstream failure with the reason the adapter reads from the response body
    pub fn upstream(adapter: &dyn ProviderAdapter, status: u16, body: &str) -> Self {
        let message = adapter.build_error_message(status, body);
        tracing::debug!(provider = %adapter.kind(), status, %message, "upstream request failed");

        Self::Upstream { status, message }
    }
}

impl From<AuthError> for ProviderError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingCredential(message) => Self::Configuration(message),
            other => Self::Authentication(other.to_string()),
        }
    }
}

impl HttpError for ProviderError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Configuration(_) | Self::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Authentication(_) => StatusCode::UNAUTHORIZED,
            Self::Upstream { status, .. } => StatusCode::from_u16(*status)
                .ok()
                .filter(|s| s.is_client_error() || s.is_server_error())
                .unwrap_or(StatusCode::BAD_GATEWAY),
            Self::Cancelled => StatusCode::REQUEST_TIMEOUT,
        }
    }

    fn error_type(&self) -> &str {
        match self {
            Self::Configuration(_) => "configuration_error",
            Self::Authentication(_) => "authentication_error",
            Self::Upstream { .. } => "upstream_error",
            Self::Cancelled => "request_cancelled",
            Self::Serialization(_) => "internal_error",
        }
    }

    fn client_message(&self) -> String {
        match self {
            Self::Serialization(_) => "an internal error occurred".to_owned(),
            other => other.to_string(),
        }
    }
}
