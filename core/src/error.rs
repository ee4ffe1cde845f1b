use thiserror::Error;

use crate::types::SegmentCode;

#[derive(Error, Debug)]
pub enum SegError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed input at row {row}: {reason}")]
    MalformedInput { row: usize, reason: String },

    #[error("Duplicate item id '{item_id}'")]
    DuplicateItem { item_id: String },

    #[error("No label mapped for code {code} in table '{table}'")]
    UnmappedCode { table: String, code: SegmentCode },

    #[error("Invalid variant configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("Quantiles requested for an empty cohort")]
    EmptyCohort,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type SegResult<T> = Result<T, SegError>;
