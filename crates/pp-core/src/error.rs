//! # Error Types
//!
//! Validation failures for domain primitives. All errors use `thiserror`
//! for derive-based `Display` and `Error` implementations, and carry the
//! rejected input so the caller can report it verbatim.

use thiserror::Error;

/// Rejection of a value at a domain-primitive constructor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Country codes must be exactly two ASCII letters.
    #[error("invalid country code {0:?}: expected two ASCII letters (ISO 3166-1 alpha-2)")]
    InvalidCountryCode(String),

    /// Power group identifiers must be non-empty.
    #[error("invalid power group id {0:?}: must be non-empty")]
    InvalidGroupId(String),

    /// Unknown entry-requirement label.
    #[error("unknown entry requirement: {0:?}")]
    UnknownRequirement(String),

    /// Unknown continent name.
    #[error("unknown continent: {0:?}")]
    UnknownContinent(String),

    /// A power group was declared without members.
    #[error("power group {0} has no members")]
    EmptyGroup(String),

    /// A power group's anchor is not among its members.
    #[error("power group {group} anchor {anchor} is not a member")]
    AnchorNotMember {
        /// The group being constructed.
        group: String,
        /// The declared anchor code.
        anchor: String,
    },
}
