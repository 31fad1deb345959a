use rayon::prelude::*;

use crate::types::{Neighbor, Record, TagSet};

/// Jaccard distance `1 - |a ∩ b| / |a ∪ b|`.
///
/// Two empty sets are identical, so their distance is `0.0` rather than the
/// undefined `0/0`.
#[inline]
pub fn jaccard_distance(a: &TagSet, b: &TagSet) -> f32 {
    if a.is_empty() && b.is_empty() {
        return 0.0;
    }
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let inter = small.iter().filter(|t| large.contains(*t)).count();
    let union = a.len() + b.len() - inter;
    distance_from_counts(inter, union)
}

/// Largest f32 below 1.0.
const BELOW_ONE: f32 = 1.0 - f32::EPSILON / 2.0;

/// `(union - inter) / union`, kept strictly inside (0, 1) unless the sets are
/// identical (`inter == union`) or disjoint (`inter == 0`).
#[inline]
fn distance_from_counts(inter: usize, union: usize) -> f32 {
    debug_assert!(inter <= union && union > 0);
    let d = (union - inter) as f32 / union as f32;
    if inter > 0 && d >= 1.0 {
        return BELOW_ONE;
    }
    d
}

/// Score every record against `query`, one neighbor per record, in dataset order.
pub fn compute_neighbors(records: &[Record], query: &TagSet) -> Vec<Neighbor> {
    records
        .iter()
        .enumerate()
        .map(|(index, r)| Neighbor {
            index,
            distance: jaccard_distance(query, &r.tags),
        })
        .collect()
}

/// Parallel form of [`compute_neighbors`]. The returned Vec is complete and in
/// dataset order before any caller can select from it.
pub fn compute_neighbors_par(records: &[Record], query: &TagSet) -> Vec<Neighbor> {
    records
        .par_iter()
        .enumerate()
        .map(|(index, r)| Neighbor {
            index,
            distance: jaccard_distance(query, &r.tags),
        })
        .collect()
}
