use std::collections::BTreeMap;

use switchyard_core::ProviderKind;

/// Priority of providers missing from [`PROVIDER_PRIORITIES`]
pub const DEFAULT_PRIORITY: u32 = 4;

/// Built-in provider priorities, lower is preferred
pub const PROVIDER_PRIORITIES: &[(ProviderKind, u32)] = &[
    (ProviderKind::Helicone, 2),
    (ProviderKind::Anthropic, 3),
    (ProviderKind::OpenAi, 3),
    (ProviderKind::OpenRouter, 10),
];

/// Provider priorities with operator overrides applied
#[derive(Debug, Clone, Default)]
pub struct PriorityTable {
    overrides: BTreeMap<ProviderKind, u32>,
}

impl PriorityTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table whose entries replace the built-in priority of their provider
    pub fn with_overrides(overrides: impl IntoIterator<Item = (ProviderKind, u32)>) -> Self {
        Self {
            overrides: overrides.into_iter().collect(),
        }
    }

    pub fn priority(&self, kind: ProviderKind) -> u32 {
        if let Some(priority) = self.overrides.get(&kind) {
            return *priority;
        }

        PROVIDER_PRIORITIES
            .iter()
            .find(|(provider, _)| *provider == kind)
            .map_or(DEFAULT_PRIORITY, |(_, priority)| *priority)
    }
}
