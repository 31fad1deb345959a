//! Top-K selection over a complete neighbor set.
//!
//! Selection partitions in expected linear time and then sorts only the
//! K-element prefix, so the cost is O(N + K log K) instead of O(N log N).

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::types::{Neighbor, Record};

/// Secondary ordering for neighbors at equal distance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum TieBreak {
    /// Earlier records in the dataset win.
    #[default]
    Position,
    /// Lexicographically smaller record ids win, then position.
    Id,
}

#[inline]
fn by_distance_then_position(a: &Neighbor, b: &Neighbor) -> Ordering {
    a.distance
        .total_cmp(&b.distance)
        .then_with(|| a.index.cmp(&b.index))
}

/// The `min(k, len)` closest neighbors, ascending by distance, ties by position.
pub fn select_top_k(neighbors: Vec<Neighbor>, k: usize) -> Vec<Neighbor> {
    select_top_k_by(neighbors, k, by_distance_then_position)
}

/// [`select_top_k`] with a caller-supplied total order.
///
/// `cmp` must be a total order for the output to be deterministic.
pub fn select_top_k_by<F>(mut neighbors: Vec<Neighbor>, k: usize, mut cmp: F) -> Vec<Neighbor>
where
    F: FnMut(&Neighbor, &Neighbor) -> Ordering,
{
    let k = k.min(neighbors.len());
    if k == 0 {
        return Vec::new();
    }
    if k < neighbors.len() {
        neighbors.select_nth_unstable_by(k - 1, &mut cmp);
        neighbors.truncate(k);
    }
    neighbors.sort_unstable_by(&mut cmp);
    neighbors
}

/// Select with the given tie-break policy, resolving ids through `records`.
pub fn select_with_tie_break(
    neighbors: Vec<Neighbor>,
    k: usize,
    records: &[Record],
    tie_break: TieBreak,
) -> Vec<Neighbor> {
    match tie_break {
        TieBreak::Position => select_top_k(neighbors, k),
        TieBreak::Id => select_top_k_by(neighbors, k, |a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then_with(|| records[a.index].id.cmp(&records[b.index].id))
                .then_with(|| a.index.cmp(&b.index))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::{select_top_k, select_with_tie_break, TieBreak};
    use crate::types::{Neighbor, Record};

    fn neighbors(distances: &[f32]) -> Vec<Neighbor> {
        distances
            .iter()
            .enumerate()
            .map(|(index, &distance)| Neighbor { index, distance })
            .collect()
    }

    #[test]
    fn selects_smallest_in_order() {
        let out = select_top_k(neighbors(&[0.9, 0.1, 0.5, 0.0, 0.7]), 3);
        let idx: Vec<usize> = out.iter().map(|n| n.index).collect();
        assert_eq!(idx, vec![3, 1, 2]);
    }

    #[test]
    fn clamps_k_to_len() {
        let out = select_top_k(neighbors(&[0.5, 0.0, 1.0]), 10);
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].distance, 0.0);
        assert_eq!(out[2].distance, 1.0);
    }

    #[test]
    fn k_zero_and_empty_input() {
        assert!(select_top_k(neighbors(&[0.1, 0.2]), 0).is_empty());
        assert!(select_top_k(Vec::new(), 4).is_empty());
    }

    #[test]
    fn ties_break_by_position() {
        let out = select_top_k(neighbors(&[0.5, 0.5, 0.5, 0.5, 0.1]), 3);
        let idx: Vec<usize> = out.iter().map(|n| n.index).collect();
        assert_eq!(idx, vec![4, 0, 1]);
    }

    #[test]
    fn ties_break_by_id() {
        let records = vec![
            Record::new("zeta", ["a"], 1, 1, 1),
            Record::new("alpha", ["a"], 2, 2, 2),
            Record::new("mid", ["a"], 3, 3, 3),
        ];
        let out = select_with_tie_break(neighbors(&[0.5, 0.5, 0.5]), 2, &records, TieBreak::Id);
        let ids: Vec<&str> = out.iter().map(|n| records[n.index].id.as_str()).collect();
        assert_eq!(ids, vec!["alpha", "mid"]);
    }
}
