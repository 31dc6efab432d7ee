use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::provider::{Author, ProviderKind};

/// One pricing tier, in USD per token
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingTier {
    /// Prompt-token count at which this tier starts applying
    pub threshold: u64,
    /// Cost per input token
    pub input: f64,
    /// Cost per output token
    pub output: f64,
}

/// Pricing table invariant violations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    /// No tiers were supplied
    #[error("pricing must contain at least one tier")]
    Empty,

    /// The first tier does not start at threshold 0
    #[error("first pricing tier must have threshold 0, found {threshold}")]
    MissingBaseTier { threshold: u64 },

    /// Tiers are not strictly ascending by threshold
    #[error("pricing tiers must be ascending by threshold ({previous} is followed by {next})")]
    NotAscending { previous: u64, next: u64 },
}

impl PricingTier {
    /// Validate a tier list: non-empty, base tier at 0, strictly ascending
    pub fn validate(tiers: &[Self]) -> Result<(), PricingError> {
        let first = tiers.first().ok_or(PricingError::Empty)?;
        if first.threshold != 0 {
            return Err(PricingError::MissingBaseTier {
                threshold: first.threshold,
            });
        }

        for pair in tiers.windows(2) {
            if pair[1].threshold <= pair[0].threshold {
                return Err(PricingError::NotAscending {
                    previous: pair[0].threshold,
                    next: pair[1].threshold,
                });
            }
        }

        Ok(())
    }
}

/// Named fields of [`UserEndpointConfig`] an adapter may require
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "camelCase")]
pub enum ConfigField {
    Region,
    ProjectId,
    DeploymentName,
    BaseUri,
    ApiVersion,
    ResourceName,
    ModelName,
}

/// Per-caller endpoint overrides
///
/// Every field is optional; each adapter decides which ones it needs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UserEndpointConfig {
    pub region: Option<String>,
    pub project_id: Option<String>,
    pub deployment_name: Option<String>,
    pub base_uri: Option<String>,
    pub api_version: Option<String>,
    pub resource_name: Option<String>,
    pub model_name: Option<String>,
    pub cross_region: Option<bool>,
}

impl UserEndpointConfig {
    /// Trimmed value of a field, `None` when absent or blank
    pub fn field(&self, field: ConfigField) -> Option<&str> {
        let value = match field {
            ConfigField::Region => &self.region,
            ConfigField::ProjectId => &self.project_id,
            ConfigField::DeploymentName => &self.deployment_name,
            ConfigField::BaseUri => &self.base_uri,
            ConfigField::ApiVersion => &self.api_version,
            ConfigField::ResourceName => &self.resource_name,
            ConfigField::ModelName => &self.model_name,
        };

        value.as_deref().map(str::trim).filter(|v| !v.is_empty())
    }

    /// Whether the caller opted into cross-region inference
    pub fn cross_region(&self) -> bool {
        self.cross_region.unwrap_or(false)
    }
}

/// Provider-level static configuration an endpoint is derived from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelProviderConfig {
    /// Upstream model identifier before any adapter transformation
    pub provider_model_id: String,
    pub provider: ProviderKind,
    #[serde(default)]
    pub author: Option<Author>,
    pub pricing: Vec<PricingTier>,
    #[serde(default)]
    pub context_length: u32,
    #[serde(default)]
    pub max_completion_tokens: u32,
    #[serde(default)]
    pub ptb_enabled: bool,
    /// Whether the model can be served through a cross-region inference profile
    #[serde(default)]
    pub cross_region: bool,
    #[serde(default)]
    pub supported_parameters: BTreeSet<String>,
}

/// A fully resolved callable target
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint {
    /// Upstream model identifier after adapter transformation
    pub provider_model_id: String,
    pub provider: ProviderKind,
    pub author: Option<Author>,
    /// Tiers ascending by threshold; the threshold-0 tier is always first
    pub pricing: Vec<PricingTier>,
    pub context_length: u32,
    pub max_completion_tokens: u32,
    /// Can be served through pay-through-billing
    pub ptb_enabled: bool,
    pub supported_parameters: BTreeSet<String>,
    pub user_config: UserEndpointConfig,
    pub model_config: ModelProviderConfig,
}

impl Endpoint {
    /// Build an endpoint from its static config, the caller's overrides, and
    /// the already-transformed upstream model id
    pub fn from_config(
        model_config: ModelProviderConfig,
        user_config: UserEndpointConfig,
        provider_model_id: String,
    ) -> Result<Self, PricingError> {
        PricingTier::validate(&model_config.pricing)?;

        Ok(Self {
            provider_model_id,
            provider: model_config.provider,
            author: model_config.author.clone(),
            pricing: model_config.pricing.clone(),
            context_length: model_config.context_length,
            max_completion_tokens: model_config.max_completion_tokens,
            ptb_enabled: model_config.ptb_enabled,
            supported_parameters: model_config.supported_parameters.clone(),
            user_config,
            model_config,
        })
    }

    /// Cost of one input plus one output token at the base tier
    pub fn unit_cost(&self) -> f64 {
        self.pricing
            .first()
            .map_or(f64::INFINITY, |tier| tier.input + tier.output)
    }
}
