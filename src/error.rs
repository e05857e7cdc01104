//! Error types for NeuroTrack

use thiserror::Error;

/// Errors raised at the boundaries of the engine.
///
/// Scoring itself is total: invalid numbers are coerced and missing data is
/// reported through sentinels, so these only come from date parsing,
/// history invariants, and import/export.
#[derive(Debug, Error)]
pub enum TrackError {
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Duplicate entry for date {0}")]
    DuplicateDate(String),

    #[error("Invalid import payload: {0}")]
    InvalidImport(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Malformed CSV at line {line}: {message}")]
    CsvError { line: usize, message: String },

    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

impl From<csv::Error> for TrackError {
    fn from(e: csv::Error) -> Self {
        let line = e.position().map_or(0, |p| p.line() as usize);
        TrackError::CsvError {
            line,
            message: e.to_string(),
        }
    }
}
