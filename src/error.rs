//! Error types for loading the dataset and validating dashboard parameters.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors raised while reading or cleaning the source dataset.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read dataset '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("line {line}: expected {expected} fields, found {found}")]
    RaggedRow {
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("required column '{0}' is missing from the dataset header")]
    MissingColumn(String),
}

/// Invalid filter or preview parameters supplied by the presentation layer.
#[derive(Debug, Error, PartialEq)]
pub enum FilterError {
    #[error("unknown location '{0}'")]
    UnknownLocation(String),

    #[error("minimum rating {0} is outside 0.0..=5.0")]
    RatingOutOfRange(f64),

    #[error("maximum cost {value} is outside 0..={max}")]
    CostOutOfRange { value: f64, max: f64 },

    #[error("preview size {value} is outside {min}..={max}")]
    PreviewOutOfRange { value: usize, min: usize, max: usize },
}
