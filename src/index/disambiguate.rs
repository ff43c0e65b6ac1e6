use super::types::{QueryResult, Target};

/// Order a result's targets for display.
///
/// Kind priority first (functions, macros and types ahead of files and
/// groups), then provenance label, then the original insertion ordinal.
/// Nothing is merged or dropped.
pub fn disambiguate(mut result: QueryResult) -> QueryResult {
    if result.targets.len() > 1 {
        result.targets.sort_by(compare_targets);
    }
    result
}

fn compare_targets(a: &Target, b: &Target) -> std::cmp::Ordering {
    a.kind_hint
        .priority()
        .cmp(&b.kind_hint.priority())
        .then_with(|| a.provenance_label.cmp(&b.provenance_label))
        .then(a.ordinal.cmp(&b.ordinal))
}
