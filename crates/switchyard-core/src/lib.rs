//! Shared data model for Switchyard
//!
//! Request-scoped value objects passed between the prioritizer, the
//! provider adapters, and the authentication strategies.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod attempt;
mod auth;
mod endpoint;
mod error;
mod provider;
mod request;

pub use attempt::{Attempt, AuthType};
pub use auth::{AuthConfig, AuthContext, AuthResult};
pub use endpoint::{ConfigField, Endpoint, ModelProviderConfig, PricingError, PricingTier, UserEndpointConfig};
pub use error::HttpError;
pub use provider::{Author, ProviderKind};
pub use request::{BodyMapping, RequestParams};
