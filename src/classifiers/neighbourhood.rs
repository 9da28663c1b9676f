use crate::core::Dataset;
use crate::distance::{DistanceContext, MixedDistance};
use serde::Serialize;
use std::cmp::Ordering;

/// A training record seen from a query: its position in the dataset, its id
/// and its distance to the query.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Neighbour {
    pub index: usize,
    pub id: u64,
    pub distance: f64,
}

impl Neighbour {
    /// Total order used everywhere records are ranked: distance, then id,
    /// then position.
    #[inline]
    pub fn rank_cmp(&self, other: &Neighbour) -> Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then(self.id.cmp(&other.id))
            .then(self.index.cmp(&other.index))
    }
}

/// Every record except `excluded`, ranked by distance to the excluded one.
pub fn rank_training_records(
    dataset: &Dataset,
    excluded: usize,
    ctx: &DistanceContext,
) -> Vec<Neighbour> {
    let distance = MixedDistance::new(ctx);
    let query = dataset.record(excluded);

    let mut ranked: Vec<Neighbour> = dataset
        .records()
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != excluded)
        .map(|(index, record)| Neighbour {
            index,
            id: record.id,
            distance: distance.dist(query, record),
        })
        .collect();

    ranked.sort_unstable_by(Neighbour::rank_cmp);
    ranked
}

/// Clamps a requested neighbourhood size to `[1, available]`.
#[inline]
pub fn clamp_k(k: usize, available: usize) -> usize {
    k.clamp(1, available.max(1))
}
