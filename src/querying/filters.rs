//! Result filters shared by every index. Filters only ever drop identifiers;
//! relative order is preserved.

use crate::core::identifier::ResourceIdentifier;
use crate::querying::pattern::QueryFilter;

/// Keep identifiers whose rendering starts with `prefix`. A missing or empty
/// prefix keeps everything.
pub fn apply_prefix_filter(
    identifiers: Vec<ResourceIdentifier>,
    prefix: Option<&str>,
) -> Vec<ResourceIdentifier> {
    match prefix.filter(|prefix| !prefix.is_empty()) {
        Some(prefix) => identifiers
            .into_iter()
            .filter(|identifier| identifier.to_string().starts_with(prefix))
            .collect(),
        None => identifiers,
    }
}

/// Truncate to `limit` identifiers. `None` and `Some(0)` mean no limit.
pub fn apply_limit_filter(
    mut identifiers: Vec<ResourceIdentifier>,
    limit: Option<usize>,
) -> Vec<ResourceIdentifier> {
    if let Some(limit) = limit.filter(|&limit| limit > 0) {
        identifiers.truncate(limit);
    }
    identifiers
}

/// Walk identifiers in order, accumulating their token counts, and stop at
/// the first one that would push the running sum above `max_tokens`.
/// `None` and `Some(0)` mean no budget.
pub fn apply_tokens_filter(
    identifiers: Vec<ResourceIdentifier>,
    max_tokens: Option<u64>,
) -> Vec<ResourceIdentifier> {
    let Some(max_tokens) = max_tokens.filter(|&max| max > 0) else {
        return identifiers;
    };

    let mut total = 0u64;
    identifiers
        .into_iter()
        .take_while(|identifier| {
            total = total.saturating_add(identifier.tokens());
            total <= max_tokens
        })
        .collect()
}

/// Prefix, then limit, then token budget.
pub fn apply_filters(
    identifiers: Vec<ResourceIdentifier>,
    filter: &QueryFilter,
) -> Vec<ResourceIdentifier> {
    let identifiers = apply_prefix_filter(identifiers, filter.prefix.as_deref());
    let identifiers = apply_limit_filter(identifiers, filter.limit);
    apply_tokens_filter(identifiers, filter.max_tokens)
}
