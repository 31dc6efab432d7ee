use serde::{Deserialize, Serialize};
use strum::Display;

use crate::endpoint::Endpoint;

/// Whose credential pays for an attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AuthType {
    /// Bring your own key: the caller's provider credential
    Byok,
    /// Pay-through-billing: the gateway operator's credential
    Ptb,
}

/// One ordered candidate for serving a logical request
#[derive(Debug, Clone, PartialEq)]
pub struct Attempt {
    pub auth_type: AuthType,
    /// Lower is preferred
    pub priority: u32,
    pub endpoint: Endpoint,
    /// Diagnostic label
    pub name: String,
}

impl Attempt {
    /// Base-tier cost used to order pay-through-billing attempts
    pub fn unit_cost(&self) -> f64 {
        self.endpoint.unit_cost()
    }
}
