//! # pp-datagen: Dataset Pipeline
//!
//! Offline batch step that turns an external passport-index CSV into the
//! matrix document the engine loads at startup.
//!
//! - [`names`]: dataset country names to ISO codes (table, aliases, "the " strip).
//! - [`cell`]: requirement cell normalization.
//! - [`generate`]: CSV parse, skip accounting, atomic document write.

pub mod cell;
pub mod error;
pub mod generate;
pub mod names;

pub use cell::parse_cell;
pub use error::{DatagenError, DatagenResult};
pub use generate::{
    generate_matrix, run_pipeline, sha256_hex, write_document, GeneratedMatrix, GenerationReport,
};
pub use names::{normalize_name, CountryNameIndex, MANUAL_ALIASES};
