//! # Pipeline Errors
//!
//! Only whole-batch failures are errors: unreadable inputs, a dataset with
//! no header, or a failed output write. Unknown countries and unparseable
//! cells are skipped with a diagnostic and never surface here.

use std::path::PathBuf;

use thiserror::Error;

use pp_core::ValidationError;
use pp_engine::EngineError;

#[derive(Error, Debug)]
pub enum DatagenError {
    /// Reading an input or writing the output failed.
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV reader failed before any row could be read.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// The dataset has no header row.
    #[error("dataset has no header row")]
    MissingHeader,

    /// Loading the reference country table failed.
    #[error("reference data: {0}")]
    Reference(#[from] EngineError),

    /// Serializing the output document failed.
    #[error("failed to serialize matrix document: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A code in the alias table is invalid.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

pub type DatagenResult<T> = Result<T, DatagenError>;
