//! Switchyard configuration
//!
//! A TOML document describing the endpoint catalog, the credentials each
//! endpoint authenticates with, and provider-wide options.

#![allow(clippy::must_use_candidate)]

mod endpoint;
mod env;
mod loader;
mod providers;

use std::collections::BTreeMap;

use serde::Deserialize;
use switchyard_core::ProviderKind;

pub use endpoint::{CredentialsConfig, EndpointConfig};
pub use providers::{AzureConfig, GcpConfig};

/// Top-level Switchyard configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Google service-account authentication
    #[serde(default)]
    pub gcp: GcpConfig,
    /// Azure `OpenAI` options
    #[serde(default)]
    pub azure: AzureConfig,
    /// Per-provider priority overrides, lower is preferred
    #[serde(default)]
    pub priorities: BTreeMap<ProviderKind, u32>,
    /// Endpoint catalog
    #[serde(default)]
    pub endpoints: Vec<EndpointConfig>,
}

impl Config {
    /// Endpoints serving a logical model, in file order
    pub fn endpoints_for<'a>(&'a self, model: &'a str) -> impl Iterator<Item = &'a EndpointConfig> + 'a {
        self.endpoints.iter().filter(move |endpoint| endpoint.model == model)
    }

    /// Endpoint by its unique name
    pub fn endpoint(&self, name: &str) -> Option<&EndpointConfig> {
        self.endpoints.iter().find(|endpoint| endpoint.name == name)
    }
}
