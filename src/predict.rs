use serde::Serialize;

use crate::dataset::Dataset;
use crate::distance::{compute_neighbors, compute_neighbors_par};
use crate::error::{PredictError, Result};
use crate::options::PredictOptions;
use crate::select::select_with_tie_break;
use crate::types::{Neighbor, Prediction, Record, TagSet};

/// Floor average of each counter over the selected records.
///
/// Returns `None` for an empty selection.
pub fn aggregate(selected: &[Neighbor], records: &[Record]) -> Option<Prediction> {
    if selected.is_empty() {
        return None;
    }
    let (mut views, mut likes, mut comments) = (0u128, 0u128, 0u128);
    for n in selected {
        let r = &records[n.index];
        views += u128::from(r.views);
        likes += u128::from(r.likes);
        comments += u128::from(r.comments);
    }
    let k = selected.len() as u128;
    // The mean of u64 values always fits in u64.
    Some(Prediction {
        views: (views / k) as u64,
        likes: (likes / k) as u64,
        comments: (comments / k) as u64,
    })
}

/// One selected neighbor resolved to its record.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct RankedNeighbor<'a> {
    pub rank: usize,
    pub distance: f32,
    pub record: &'a Record,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Outcome<'a> {
    pub prediction: Prediction,
    pub neighbors: Vec<RankedNeighbor<'a>>,
}

impl Outcome<'_> {
    pub fn k(&self) -> usize {
        self.neighbors.len()
    }
}

/// K-nearest-neighbor engagement predictor over a fixed dataset.
pub struct Predictor {
    dataset: Dataset,
    options: PredictOptions,
}

impl Predictor {
    pub fn new(dataset: Dataset, options: PredictOptions) -> Result<Self> {
        validate_k(options.k)?;
        Ok(Self { dataset, options })
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn options(&self) -> &PredictOptions {
        &self.options
    }

    pub fn predict(&self, query: &TagSet) -> Result<Outcome<'_>> {
        validate_query(query)?;
        let records = self.dataset.records();

        let neighbors = if self.options.parallel {
            compute_neighbors_par(records, query)
        } else {
            compute_neighbors(records, query)
        };
        debug_assert_eq!(neighbors.len(), records.len());

        if self.options.k > neighbors.len() {
            tracing::debug!(
                requested = self.options.k,
                available = neighbors.len(),
                "clamping k to dataset size"
            );
        }
        let selected =
            select_with_tie_break(neighbors, self.options.k, records, self.options.tie_break);
        let prediction = aggregate(&selected, records).ok_or_else(|| {
            PredictError::InvalidArgument("no neighbors selected".to_string())
        })?;

        tracing::debug!(
            k = selected.len(),
            views = prediction.views,
            likes = prediction.likes,
            comments = prediction.comments,
            "prediction computed"
        );

        let neighbors = selected
            .iter()
            .enumerate()
            .map(|(i, n)| RankedNeighbor {
                rank: i + 1,
                distance: n.distance,
                record: &records[n.index],
            })
            .collect();
        Ok(Outcome {
            prediction,
            neighbors,
        })
    }
}

pub fn validate_k(k: usize) -> Result<()> {
    if k == 0 {
        return Err(PredictError::InvalidArgument("K must be positive".to_string()));
    }
    Ok(())
}

pub fn validate_query(query: &TagSet) -> Result<()> {
    if query.is_empty() {
        return Err(PredictError::InvalidArgument(
            "provide at least one tag for the query".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{aggregate, Predictor};
    use crate::dataset::Dataset;
    use crate::error::PredictError;
    use crate::options::PredictOptions;
    use crate::select::TieBreak;
    use crate::types::{parse_tags, Neighbor, Prediction, Record, TagSet};

    fn sample() -> Dataset {
        Dataset::from_records(vec![
            Record::new("A", ["cat", "dance"], 100, 10, 1),
            Record::new("B", ["cat"], 200, 20, 2),
            Record::new("C", ["dog"], 50, 5, 0),
        ])
        .unwrap()
    }

    fn predictor(k: usize) -> Predictor {
        Predictor::new(
            sample(),
            PredictOptions {
                k,
                ..Default::default()
            },
        )
        .unwrap()
    }

    #[test]
    fn aggregate_single_record_is_identity() {
        let records = vec![Record::new("x", ["a"], 123, 45, 6)];
        let got = aggregate(&[Neighbor { index: 0, distance: 0.3 }], &records).unwrap();
        assert_eq!(
            got,
            Prediction {
                views: 123,
                likes: 45,
                comments: 6
            }
        );
    }

    #[test]
    fn aggregate_floors_and_handles_large_counters() {
        let records = vec![
            Record::new("x", ["a"], u64::MAX, 1, 0),
            Record::new("y", ["a"], u64::MAX, 2, 1),
        ];
        let sel = [
            Neighbor { index: 0, distance: 0.0 },
            Neighbor { index: 1, distance: 0.0 },
        ];
        let got = aggregate(&sel, &records).unwrap();
        assert_eq!(got.views, u64::MAX);
        assert_eq!(got.likes, 1);
        assert_eq!(got.comments, 0);
    }

    #[test]
    fn aggregate_empty_is_none() {
        assert!(aggregate(&[], &[]).is_none());
    }

    #[test]
    fn cat_query_top_two() {
        let p = predictor(2);
        let out = p.predict(&parse_tags("cat", ';')).unwrap();
        let ids: Vec<&str> = out.neighbors.iter().map(|n| n.record.id.as_str()).collect();
        assert_eq!(ids, vec!["B", "A"]);
        assert_eq!(out.neighbors[0].distance, 0.0);
        assert!((out.neighbors[1].distance - 0.5).abs() < 1e-6);
        assert_eq!(
            out.prediction,
            Prediction {
                views: 150,
                likes: 15,
                comments: 1
            }
        );
    }

    #[test]
    fn k_larger_than_dataset_returns_all() {
        let binding = predictor(10);
        let out = binding.predict(&parse_tags("cat", ';')).unwrap();
        assert_eq!(out.k(), 3);
        assert_eq!(out.neighbors[2].record.id, "C");
        assert_eq!(out.neighbors[2].distance, 1.0);
        assert_eq!(out.prediction.views, 350 / 3);
    }

    #[test]
    fn zero_k_is_rejected() {
        let err = Predictor::new(
            sample(),
            PredictOptions {
                k: 0,
                ..Default::default()
            },
        )
        .err()
        .unwrap();
        assert!(matches!(err, PredictError::InvalidArgument(_)));
    }

    #[test]
    fn empty_query_is_rejected() {
        let err = predictor(2).predict(&TagSet::new()).unwrap_err();
        assert!(matches!(err, PredictError::InvalidArgument(_)));
    }

    #[test]
    fn parallel_and_id_tie_break_agree_on_scenario() {
        let p = Predictor::new(
            sample(),
            PredictOptions {
                k: 2,
                tie_break: TieBreak::Id,
                parallel: true,
            },
        )
        .unwrap();
        let out = p.predict(&parse_tags("cat", ';')).unwrap();
        assert_eq!(out.prediction.views, 150);
    }
}
