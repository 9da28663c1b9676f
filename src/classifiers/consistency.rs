use crate::classifiers::Neighbour;
use crate::core::Dataset;
use crate::distance::DistanceContext;
use crate::rules::LocalRule;
use std::collections::BTreeMap;

/// Whether no differently labelled record of `verification` satisfies `rule`.
///
/// `verification` must be ranked ascending (see [`Neighbour::rank_cmp`]). Only
/// records no farther from the query than the candidate can be covered by
/// the rule, so the scan stops at the first record past the rule's bound.
pub fn is_consistent(
    rule: &LocalRule<'_>,
    candidate_distance: f64,
    verification: &[Neighbour],
    dataset: &Dataset,
) -> bool {
    let bound = rule.pruning_bound(candidate_distance);
    for neighbour in verification {
        if neighbour.distance > bound {
            break;
        }
        let record = dataset.record(neighbour.index);
        if record.label != rule.decision() && rule.satisfies(record) {
            return false;
        }
    }
    true
}

/// [`is_consistent`] without pruning; visits every verification record.
pub fn is_consistent_exhaustive(
    rule: &LocalRule<'_>,
    verification: &[Neighbour],
    dataset: &Dataset,
) -> bool {
    verification.iter().all(|neighbour| {
        let record = dataset.record(neighbour.index);
        record.label == rule.decision() || !rule.satisfies(record)
    })
}

/// Tallies, per label, the candidates whose local rule is consistent with
/// `verification`. Labels without consistent rules are absent.
pub fn rule_support<'a>(
    dataset: &'a Dataset,
    query: usize,
    candidates: &[Neighbour],
    verification: &[Neighbour],
    ctx: &DistanceContext,
) -> BTreeMap<&'a str, usize> {
    let query = dataset.record(query);
    let mut support = BTreeMap::new();
    for candidate in candidates {
        let record = dataset.record(candidate.index);
        let rule = LocalRule::new(query, record, ctx);
        if is_consistent(&rule, candidate.distance, verification, dataset) {
            *support.entry(record.label.as_str()).or_insert(0) += 1;
        }
    }
    support
}

/// Label → member count over `neighbours`.
pub fn class_sizes<'a>(dataset: &'a Dataset, neighbours: &[Neighbour]) -> BTreeMap<&'a str, usize> {
    let mut sizes = BTreeMap::new();
    for n in neighbours {
        *sizes
            .entry(dataset.record(n.index).label.as_str())
            .or_insert(0) += 1;
    }
    sizes
}
