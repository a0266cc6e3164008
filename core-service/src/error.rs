//! Error handling
//!
//! Fatal, run-aborting failures. Per-record defaulting never surfaces here:
//! absent flow fields are substituted in `logic::flow` and logged instead.

use std::path::PathBuf;
use thiserror::Error;

pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    // Input validation errors
    #[error("flow batch has {flows} records but anomaly batch has {scores} scores")]
    CountMismatch { flows: usize, scores: usize },

    #[error("anomaly score join failed for key '{key}': {reason}")]
    KeyMismatch { key: String, reason: String },

    #[error("anomaly score #{index} is not a finite number ({value})")]
    InvalidScore { index: usize, value: f64 },

    #[error("malformed timestamp in {context}: '{value}'")]
    MalformedTimestamp { context: String, value: String },

    // Configuration errors
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // IO / serialization errors
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl EngineError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        EngineError::Io { path: path.into(), source }
    }

    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        EngineError::Json { path: path.into(), source }
    }

    /// True for failures caused by the input batch rather than the environment.
    pub fn is_input_validation(&self) -> bool {
        matches!(
            self,
            EngineError::CountMismatch { .. }
                | EngineError::KeyMismatch { .. }
                | EngineError::InvalidScore { .. }
                | EngineError::MalformedTimestamp { .. }
        )
    }
}
