//! Provider adapters for Switchyard
//!
//! Each upstream provider gets an adapter that builds the request URL,
//! authentication headers, and wire body for one attempt. Adapters are
//! stateless and shared across concurrent requests through the
//! [`AdapterRegistry`].

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod adapter;
mod error;
mod prepare;
mod registry;
pub mod translate;

pub use adapter::ProviderAdapter;
pub use error::ProviderError;
pub use prepare::{PreparedRequest, prepare_attempt, resolve_endpoint};
pub use registry::{AdapterRegistry, RegistryOptions};
pub use translate::{BodyTranslator, RequestBodyContext, WireTranslator};
