//! Error taxonomy for a calibration pass.

use std::path::PathBuf;

use thiserror::Error;

pub type CalibrationResult<T> = Result<T, CalibrationError>;

#[derive(Debug, Error)]
pub enum CalibrationError {
    /// The dataset has zero elements, so the empirical hit rate is undefined.
    #[error("dataset '{category}' has no elements; hit probability is undefined")]
    EmptyDataset { category: String },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Leftover units after flooring do not fit one-per-sequence.
    #[error(
        "apportionment remainder {remainder} does not fit {buckets} sequence(s); \
         total and weights are inconsistent"
    )]
    Apportionment { remainder: i64, buckets: usize },

    #[error("unknown category '{category}' (available: {})", .available.join(", "))]
    UnknownCategory {
        category: String,
        available: Vec<String>,
    },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {origin}: {source}")]
    Json {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
}

impl CalibrationError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
