//! # pp-engine: Visa Eligibility Resolution
//!
//! Given a passport, a destination, and the visas a traveler already
//! holds, determine the effective entry requirement; then aggregate those
//! requirements into per-passport statistics and a global rank.
//!
//! ## Layers
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`reference`] | Immutable country table, bilateral matrix, power groups |
//! | [`bilateral`] | Direct matrix lookup with the unknown-pair fallback |
//! | [`substitution`] | Group activation, unlocked set, upgrade-only resolution |
//! | [`stats`] | Bucket counts, access score, competition-style ranking |
//! | [`engine`] | [`VisaEngine`] facade consumed by every caller |
//!
//! ## Purity
//!
//! Every resolution function is a pure read over immutable tables and
//! caller-supplied parameters. No interior mutability, no locking, no I/O
//! outside the explicit `load*` constructors in [`reference`].

pub mod bilateral;
pub mod engine;
pub mod error;
pub mod reference;
pub mod stats;
pub mod substitution;

pub use engine::{Access, Resolved, VisaEngine};
pub use error::{EngineError, EngineResult};
pub use reference::{
    builtin_countries, builtin_power_groups, load_countries, load_matrix_document,
    load_power_groups, MatrixDocument, ReferenceData, VisaMatrix,
};
pub use stats::{assign_ranks, PassportStats, RankedPassport};
