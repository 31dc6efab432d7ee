use switchyard_core::{Attempt, AuthType};

/// Order attempts into try-order
///
/// Every BYOK attempt comes first, ascending by priority. PTB attempts
/// follow, ascending by base-tier unit cost with priority breaking ties.
/// The sort is stable, so fully tied attempts keep their input order.
pub fn sort_attempts_by_priority(attempts: Vec<Attempt>) -> Vec<Attempt> {
    let (mut ordered, mut ptb): (Vec<_>, Vec<_>) = attempts
        .into_iter()
        .partition(|attempt| attempt.auth_type == AuthType::Byok);

    ordered.sort_by_key(|attempt| attempt.priority);
    ptb.sort_by(|a, b| {
        a.unit_cost()
            .total_cmp(&b.unit_cost())
            .then_with(|| a.priority.cmp(&b.priority))
    });
    ordered.extend(ptb);

    tracing::debug!(
        order = ?ordered.iter().map(|attempt| attempt.name.as_str()).collect::<Vec<_>>(),
        "attempts prioritized"
    );

    ordered
}
