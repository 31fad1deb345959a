use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("cannot open dataset {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("dataset is empty or malformed")]
    Empty,

    #[error("invalid {field} value {value:?} on line {line}")]
    InvalidMetric {
        line: usize,
        field: &'static str,
        value: String,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum PredictError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Load(#[from] LoadError),
}

pub type Result<T, E = PredictError> = std::result::Result<T, E>;
