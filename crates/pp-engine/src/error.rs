//! # Engine Errors
//!
//! Errors arise only while *loading* reference data. Resolution itself is
//! total: a missing matrix entry degrades to the documented fallback and
//! never reaches this type.

use std::path::PathBuf;

use thiserror::Error;

use pp_core::{CountryCode, ValidationError};

/// Failure to build or load the reference data store.
#[derive(Error, Debug)]
pub enum EngineError {
    /// A reference file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A reference file is not valid JSON for its expected shape.
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Embedded or in-memory JSON failed to parse.
    #[error("malformed reference data: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The matrix holds an entry for a passport's own country.
    #[error("visa matrix contains self-pair entry for {0}")]
    SelfPair(CountryCode),

    /// The same code appears twice in the country table.
    #[error("duplicate country code {0} in reference table")]
    DuplicateCountry(CountryCode),

    /// The same group id appears twice.
    #[error("duplicate power group {0}")]
    DuplicateGroup(String),

    /// A domain primitive failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Convenience alias for engine results.
pub type EngineResult<T> = Result<T, EngineError>;
