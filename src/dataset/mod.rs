//! Reference dataset loading.
//!
//! Rows are `id,tags,views,likes,comments`. Parsing is lenient: rows with
//! too few fields are dropped without error, and rows with unparseable
//! counters follow [`MetricPolicy`].

mod synthetic;

use std::path::Path;

use crate::error::LoadError;
use crate::options::{LoadOptions, MetricPolicy};
use crate::types::{parse_tags, Record};

pub use synthetic::{generate_synthetic, write_csv, SyntheticConfig, TAG_POOL};

const FIELD_COUNT: usize = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    pub header_skipped: bool,
    pub lines_read: usize,
    pub rows_kept: usize,
    pub short_rows: usize,
    pub bad_metric_rows: usize,
}

/// Immutable, ordered set of reference records.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<Record>,
    stats: LoadStats,
}

impl Dataset {
    pub fn load(path: impl AsRef<Path>, options: &LoadOptions) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| LoadError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        // Invalid UTF-8 is replaced rather than rejected; rows stay loadable.
        let text = String::from_utf8_lossy(&bytes);
        let dataset = Self::parse(&text, options)?;
        tracing::info!(
            path = %path.display(),
            records = dataset.len(),
            "dataset loaded"
        );
        Ok(dataset)
    }

    pub fn parse(text: &str, options: &LoadOptions) -> Result<Self, LoadError> {
        let mut stats = LoadStats::default();
        let mut records = Vec::new();

        let mut lines = text.lines().enumerate().peekable();
        if let Some((_, first)) = lines.peek() {
            if first.chars().next().is_some_and(|c| !c.is_ascii_digit()) {
                stats.header_skipped = true;
                lines.next();
            }
        }

        for (lineno, line) in lines {
            if line.is_empty() {
                continue;
            }
            stats.lines_read += 1;

            let cols: Vec<&str> = line
                .split(options.field_delimiter)
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .collect();
            if cols.len() < FIELD_COUNT {
                stats.short_rows += 1;
                continue;
            }

            match parse_metrics(&cols, lineno + 1) {
                Ok((views, likes, comments)) => {
                    records.push(Record {
                        id: cols[0].to_owned(),
                        tags: parse_tags(cols[1], options.tag_delimiter),
                        views,
                        likes,
                        comments,
                    });
                }
                Err(err) => match options.metric_policy {
                    MetricPolicy::Strict => return Err(err),
                    MetricPolicy::Skip => {
                        tracing::warn!(%err, "dropping row");
                        stats.bad_metric_rows += 1;
                    }
                },
            }
        }

        stats.rows_kept = records.len();
        tracing::debug!(?stats, "dataset parsed");
        if records.is_empty() {
            return Err(LoadError::Empty);
        }
        Ok(Self { records, stats })
    }

    pub fn from_records(records: Vec<Record>) -> Result<Self, LoadError> {
        if records.is_empty() {
            return Err(LoadError::Empty);
        }
        let stats = LoadStats {
            rows_kept: records.len(),
            lines_read: records.len(),
            ..Default::default()
        };
        Ok(Self { records, stats })
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn stats(&self) -> LoadStats {
        self.stats
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn parse_metrics(cols: &[&str], line: usize) -> Result<(u64, u64, u64), LoadError> {
    let field = |i: usize, name: &'static str| {
        cols[i].parse::<u64>().map_err(|_| LoadError::InvalidMetric {
            line,
            field: name,
            value: cols[i].to_owned(),
        })
    };
    Ok((field(2, "views")?, field(3, "likes")?, field(4, "comments")?))
}
