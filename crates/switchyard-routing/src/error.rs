//! Routing-specific error types

use http::StatusCode;
use switchyard_core::HttpError;
use thiserror::Error;

/// Errors raised while planning attempts for a logical model
#[derive(Debug, Error)]
pub enum RoutingError {
    /// No endpoint in the catalog serves the model
    #[error("no endpoints configured for model '{model}'")]
    UnknownModel { model: String },

    /// Endpoints exist but none of them could be resolved
    #[error("no usable endpoint for model '{model}' ({rejected} rejected)")]
    NoUsableEndpoint { model: String, rejected: usize },
}

impl HttpError for RoutingError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::UnknownModel { .. } => StatusCode::NOT_FOUND,
            Self::NoUsableEndpoint { .. } => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_type(&self) -> &str {
        match self {
            Self::UnknownModel { .. } => "model_not_found",
            Self::NoUsableEndpoint { .. } => "no_available_endpoint",
        }
    }

    fn client_message(&self) -> String {
        match self {
            Self::UnknownModel { model } => format!("model '{model}' is not available"),
            Self::NoUsableEndpoint { model, .. } => format!("no provider is currently able to serve '{model}'"),
        }
    }
}
