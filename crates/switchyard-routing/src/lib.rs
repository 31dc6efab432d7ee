//! Attempt planning and prioritization for Switchyard
//!
//! Turns the configured endpoints of a logical model into an ordered list
//! of attempts: caller-keyed (BYOK) attempts by priority, then
//! pay-through-billing (PTB) attempts by base-tier cost.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod error;
mod plan;
mod prioritize;
mod priority;

pub use error::RoutingError;
pub use plan::plan_attempts;
pub use prioritize::sort_attempts_by_priority;
pub use priority::{DEFAULT_PRIORITY, PROVIDER_PRIORITIES, PriorityTable};
