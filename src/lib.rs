//! `tagknn` predicts engagement (views, likes, comments) for a video described
//! only by its tags.
//!
//! The pipeline is a straight line:
//! - every reference record is scored by Jaccard distance to the query tags;
//! - the K closest are isolated by partial selection, then only those K are sorted;
//! - their counters are floor-averaged into a [`Prediction`].
//!
//! Distances are collected into one complete Vec before selection, so the
//! optional parallel scorer needs no further synchronisation.

pub mod dataset;
pub mod distance;
pub mod error;
pub mod options;
pub mod predict;
pub mod report;
pub mod select;
pub mod session;
pub mod types;

pub use dataset::{Dataset, LoadStats};
pub use distance::{compute_neighbors, compute_neighbors_par, jaccard_distance};
pub use error::{LoadError, PredictError};
pub use options::{LoadOptions, MetricPolicy, PredictOptions};
pub use predict::{aggregate, Outcome, Predictor, RankedNeighbor};
pub use report::{Report, ReportFormat};
pub use select::{select_top_k, select_top_k_by, TieBreak};
pub use session::{run_session, SessionStats};
pub use types::{parse_tags, Neighbor, Prediction, Record, TagSet};

/// Library version string exposed to the CLI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
