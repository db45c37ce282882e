//! # pp-core: Foundational Types for Passport Power
//!
//! This crate defines the domain primitives shared by the resolution engine,
//! the dataset pipeline, and the CLI. Every other crate in the workspace
//! depends on `pp-core`; it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Validated newtypes for codes.** `CountryCode` and `GroupId` are
//!    constructed through checked constructors. No bare strings for
//!    passport or destination identifiers.
//!
//! 2. **Single `Requirement` enum.** Five variants, exhaustive `match`
//!    everywhere. Forgetting to bucket `eta` in statistics is a compile
//!    error, not a silent miscount.
//!
//! 3. **Derived values are never stored.** `EffectiveRequirement` is
//!    recomputed from passport, destination, and held visas on every call.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `pp-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public types derive `Debug`, `Clone`, and implement `Serialize`/`Deserialize`.

pub mod country;
pub mod error;
pub mod group;
pub mod profile;
pub mod requirement;

// Re-export primary types for ergonomic imports.
pub use country::{Continent, Country, CountryCode};
pub use error::ValidationError;
pub use group::{GroupId, PowerGroup};
pub use profile::{HeldVisas, TravelerProfile};
pub use requirement::{
    Basis, EffectiveRequirement, Requirement, StatBucket, VisaMatrixEntry, HELD_VISA_NOTE,
    UNKNOWN_REQUIREMENT_NOTE,
};
