//! Error types for Keyrank core.

use std::path::PathBuf;
use thiserror::Error;

use keyrank_engine::engine::MissingColumn;

/// Errors that can abort a ranking run.
#[derive(Error, Debug)]
pub enum KeyrankError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Required column not found: {field}")]
    MissingColumn { field: String },

    #[error("No date columns (YYYY-MM-DD) found in header")]
    NoDateColumns,

    #[error("Filter refers to a column that was not resolved: {field}")]
    UnknownFilterField { field: String },

    #[error("File has no header row")]
    EmptyTable,

    #[error("Config error in {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },

    #[error("No free output file name next to {}", .0.display())]
    OutputNameExhausted(PathBuf),
}

impl From<MissingColumn> for KeyrankError {
    fn from(err: MissingColumn) -> Self {
        KeyrankError::MissingColumn { field: err.field }
    }
}

pub type Result<T> = std::result::Result<T, KeyrankError>;
