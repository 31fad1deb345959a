use std::fmt::Write as _;

use serde::Serialize;

use crate::predict::Outcome;
use crate::types::Prediction;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NeighborRow {
    pub rank: usize,
    pub id: String,
    pub distance: f32,
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
}

/// Owned, render-ready view of an [`Outcome`].
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Report {
    pub k: usize,
    pub prediction: Prediction,
    pub neighbors: Vec<NeighborRow>,
}

impl From<&Outcome<'_>> for Report {
    fn from(outcome: &Outcome<'_>) -> Self {
        Self {
            k: outcome.k(),
            prediction: outcome.prediction,
            neighbors: outcome
                .neighbors
                .iter()
                .map(|n| NeighborRow {
                    rank: n.rank,
                    id: n.record.id.clone(),
                    distance: n.distance,
                    views: n.record.views,
                    likes: n.record.likes,
                    comments: n.record.comments,
                })
                .collect(),
        }
    }
}

impl Report {
    pub fn render(&self, format: ReportFormat) -> anyhow::Result<String> {
        match format {
            ReportFormat::Text => Ok(self.to_text()),
            ReportFormat::Json => Ok(serde_json::to_string_pretty(self)?),
        }
    }

    pub fn to_text(&self) -> String {
        let p = &self.prediction;
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Predicted → Views:{} Likes:{} Comments:{}",
            p.views, p.likes, p.comments
        );
        let _ = writeln!(out, "Top {} neighbours:", self.k);
        for n in &self.neighbors {
            let _ = writeln!(
                out,
                "  {}. id={} dist={:.4} {} {} {}",
                n.rank, n.id, n.distance, n.views, n.likes, n.comments
            );
        }
        out
    }
}
