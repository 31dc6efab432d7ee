use switchyard_config::Config;
use switchyard_core::Attempt;
use switchyard_provider::{AdapterRegistry, resolve_endpoint};

use crate::error::RoutingError;
use crate::prioritize::sort_attempts_by_priority;
use crate::priority::PriorityTable;

/// Build the prioritized attempts for a logical model
///
/// Each configured endpoint is resolved through its provider's adapter.
/// Endpoints that fail to resolve are skipped with a warning, so one
/// misconfigured provider does not take the model down.
pub fn plan_attempts(
    model: &str,
    config: &Config,
    registry: &AdapterRegistry,
    priorities: &PriorityTable,
) -> Result<Vec<Attempt>, RoutingError> {
    let mut attempts = Vec::new();
    let mut rejected = 0;

    for entry in config.endpoints_for(model) {
        let resolved = registry
            .get(entry.provider)
            .and_then(|adapter| resolve_endpoint(adapter.as_ref(), entry.model_config(), entry.user_config.clone()));

        match resolved {
            Ok(endpoint) => attempts.push(Attempt {
                auth_type: entry.auth_type,
                priority: entry.priority.unwrap_or_else(|| priorities.priority(entry.provider)),
                endpoint,
                name: entry.name.clone(),
            }),
            Err(e) => {
                rejected += 1;
                tracing::warn!(
                    model,
                    endpoint = %entry.name,
                    provider = %entry.provider,
                    error = %e,
                    "skipping endpoint that failed to resolve"
                );
            }
        }
    }

    if attempts.is_empty() {
        return Err(if rejected == 0 {
            RoutingError::UnknownModel {
                model: model.to_owned(),
            }
        } else {
            RoutingError::NoUsableEndpoint {
                model: model.to_owned(),
                rejected,
            }
        });
    }

    tracing::debug!(model, attempts = attempts.len(), rejected, "attempts planned");

    Ok(sort_attempts_by_priority(attempts))
}

#[cfg(test)]
mod tests {
    use switchyard_core::AuthType;
    use switchyard_provider::RegistryOptions;

    use super::*;

    const CATALOG: &str = r#"
[priorities]
groq = 1

[[endpoints]]
name = "openrouter-ptb"
model = "llama-70b"
provider = "openrouter"
provider_model_id = "meta-llama/llama-3.3-70b-instruct"
auth_type = "ptb"
ptb_enabled = true
pricing = [{ threshold = 0, input = 0.0000006, output = 0.0000006 }]

[[endpoints]]
name = "groq-ptb"
model = "llama-70b"
provider = "groq"
provider_model_id = "llama-3.3-70b-versatile"
auth_type = "ptb"
ptb_enabled = true
pricing = [{ threshold = 0, input = 0.0000006, output = 0.0000006 }]

[[endpoints]]
name = "deepinfra-byok"
model = "llama-70b"
provider = "deepinfra"
provider_model_id = "meta-llama/Llama-3.3-70B-Instruct"
auth_type = "byok"
priority = 9
pricing = [{ threshold = 0, input = 0.0000002, output = 0.0000002 }]

[[endpoints]]
name = "vertex-no-project"
model = "llama-70b"
provider = "vertex"
provider_model_id = "llama-3.3-70b-instruct-maas"
author = "meta"
auth_type = "byok"
pricing = [{ threshold = 0, input = 0.0000001, output = 0.0000001 }]

[[endpoints]]
name = "vertex-broken"
model = "broken"
provider = "vertex"
provider_model_id = "gemini-2.0-flash"
auth_type = "byok"
pricing = [{ threshold = 0, input = 0.0000001, output = 0.0000001 }]
"#;

    fn planned(model: &str) -> Result<Vec<Attempt>, RoutingError> {
        let config = Config::from_toml(CATALOG).unwrap();
        let registry = AdapterRegistry::standard(RegistryOptions::default());
        let priorities = PriorityTable::with_overrides(config.priorities.clone());

        plan_attempts(model, &config, &registry, &priorities)
    }

    #[test]
    fn plans_resolvable_endpoints_in_try_order() {
        let attempts = planned("llama-70b").unwrap();

        let names: Vec<_> = attempts.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["deepinfra-byok", "groq-ptb", "openrouter-ptb"]);

        assert_eq!(attempts[0].auth_type, AuthType::Byok);
        assert_eq!(attempts[0].priority, 9);
        assert_eq!(attempts[1].priority, 1);
        assert_eq!(attempts[2].priority, 10);
    }

    #[test]
    fn unknown_model() {
        assert!(matches!(
            planned("gpt-4o"),
            Err(RoutingError::UnknownModel { model }) if model == "gpt-4o"
        ));
    }

    #[test]
    fn every_endpoint_rejected() {
        let err = planned("broken").unwrap_err();
        assert!(matches!(err, RoutingError::NoUsableEndpoint { rejected: 1, .. }));
        assert_eq!(err.to_string(), "no usable endpoint for model 'broken' (1 rejected)");
    }
}
