use std::collections::BTreeSet;
use std::path::Path;

use anyhow::Context;
use switchyard_core::PricingTier;

use crate::Config;

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, a placeholder cannot be
    /// expanded, the TOML does not parse, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;

        let config = Self::from_toml(&raw)?;
        tracing::debug!(path = %path.display(), endpoints = config.endpoints.len(), "configuration loaded");

        Ok(config)
    }

    /// Parse configuration text, expanding `{{ env.VAR }}` placeholders first
    ///
    /// # Errors
    ///
    /// Returns an error if expansion, parsing, or validation fails
    pub fn from_toml(raw: &str) -> anyhow::Result<Self> {
        let expanded = crate::env::expand_env(raw).context("config variable expansion failed")?;
        let config: Self = toml::from_str(&expanded).context("failed to parse config")?;

        config.validate()?;
        Ok(config)
    }

    /// Check invariants serde cannot express
    ///
    /// # Errors
    ///
    /// Returns an error naming the first offending endpoint
    pub fn validate(&self) -> anyhow::Result<()> {
        let mut names = BTreeSet::new();

        for endpoint in &self.endpoints {
            let name = endpoint.name.as_str();

            if name.trim().is_empty() {
                anyhow::bail!("endpoint for model '{}' has an empty name", endpoint.model);
            }
            if !names.insert(name) {
                anyhow::bail!("endpoint name '{name}' is used more than once");
            }
            if endpoint.model.trim().is_empty() {
                anyhow::bail!("endpoint '{name}' has an empty model");
            }
            if endpoint.provider_model_id.trim().is_empty() {
                anyhow::bail!("endpoint '{name}' has an empty provider_model_id");
            }

            PricingTier::validate(&endpoint.pricing).with_context(|| format!("endpoint '{name}' has invalid pricing"))?;
        }

        Ok(())
    }
}
