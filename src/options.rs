use crate::select::TieBreak;

/// What to do with a row whose metric fields do not parse as counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MetricPolicy {
    /// Drop the row and keep loading.
    #[default]
    Skip,
    /// Fail the whole load.
    Strict,
}

#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub field_delimiter: char,
    pub tag_delimiter: char,
    pub metric_policy: MetricPolicy,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            field_delimiter: ',',
            tag_delimiter: ';',
            metric_policy: MetricPolicy::Skip,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PredictOptions {
    pub k: usize,
    pub tie_break: TieBreak,
    /// Score records on the rayon pool.
    pub parallel: bool,
}

impl Default for PredictOptions {
    fn default() -> Self {
        Self {
            k: 5,
            tie_break: TieBreak::Position,
            parallel: false,
        }
    }
}
