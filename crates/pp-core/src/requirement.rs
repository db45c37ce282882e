//! # Entry Requirements: Single Source of Truth
//!
//! Defines the [`Requirement`] enum with all five entry-requirement kinds,
//! the stored [`VisaMatrixEntry`], and the derived [`EffectiveRequirement`].
//! Every `match` on `Requirement` is exhaustive; adding a sixth kind is a
//! compile error until statistics bucketing and every consumer handle it.
//!
//! ## Notes as Signals
//!
//! Two note strings carry meaning beyond display text:
//!
//! - [`UNKNOWN_REQUIREMENT_NOTE`] marks the visa-required *fallback* for a
//!   pair with no matrix entry, so it can be told apart from a confirmed
//!   visa-required rule.
//! - [`HELD_VISA_NOTE`] marks a visa-free outcome produced by held-visa
//!   substitution rather than by a bilateral rule.
//!
//! [`Basis`] carries the same distinction as a typed field.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Note attached to the fallback for pairs with no matrix entry.
pub const UNKNOWN_REQUIREMENT_NOTE: &str = "Requirement unknown, check official sources";

/// Note attached to requirements upgraded by held-visa substitution.
pub const HELD_VISA_NOTE: &str = "Unlocked by held visa";

/// The entry requirement a destination imposes on a passport holder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Requirement {
    /// Entry without any prior authorization.
    VisaFree,
    /// Visa issued at the border.
    VisaOnArrival,
    /// Electronic visa applied for online before travel.
    EVisa,
    /// Electronic travel authorization (ESTA, eTA, ETIAS-style).
    Eta,
    /// Visa must be obtained from a consulate before travel.
    VisaRequired,
}

impl Requirement {
    /// All five requirement kinds, least to most restrictive.
    pub fn all() -> &'static [Requirement] {
        &[
            Self::VisaFree,
            Self::VisaOnArrival,
            Self::EVisa,
            Self::Eta,
            Self::VisaRequired,
        ]
    }

    /// The kebab-case identifier, matching the serde form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VisaFree => "visa-free",
            Self::VisaOnArrival => "visa-on-arrival",
            Self::EVisa => "e-visa",
            Self::Eta => "eta",
            Self::VisaRequired => "visa-required",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::VisaFree => "Visa free",
            Self::VisaOnArrival => "Visa on arrival",
            Self::EVisa => "e-Visa",
            Self::Eta => "eTA",
            Self::VisaRequired => "Visa required",
        }
    }

    /// Whether travel is possible without a consular visa.
    pub fn is_unrestricted(&self) -> bool {
        self.bucket().is_unrestricted()
    }

    /// The aggregate-statistics bucket this requirement counts towards.
    ///
    /// `eta` and `e-visa` share the [`StatBucket::EVisa`] bucket.
    pub fn bucket(&self) -> StatBucket {
        match self {
            Self::VisaFree => StatBucket::VisaFree,
            Self::VisaOnArrival => StatBucket::VisaOnArrival,
            Self::EVisa | Self::Eta => StatBucket::EVisa,
            Self::VisaRequired => StatBucket::VisaRequired,
        }
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Requirement {
    type Err = ValidationError;

    /// Parse from the identifiers produced by [`Requirement::as_str()`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "visa-free" => Ok(Self::VisaFree),
            "visa-on-arrival" => Ok(Self::VisaOnArrival),
            "e-visa" => Ok(Self::EVisa),
            "eta" => Ok(Self::Eta),
            "visa-required" => Ok(Self::VisaRequired),
            other => Err(ValidationError::UnknownRequirement(other.to_string())),
        }
    }
}

/// Aggregate statistics buckets. Four, not five: `eta` folds into `EVisa`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatBucket {
    VisaFree,
    VisaOnArrival,
    EVisa,
    VisaRequired,
}

impl StatBucket {
    pub const ALL: [StatBucket; 4] = [
        Self::VisaFree,
        Self::VisaOnArrival,
        Self::EVisa,
        Self::VisaRequired,
    ];

    /// Every bucket except `VisaRequired` counts towards the access score.
    pub fn is_unrestricted(&self) -> bool {
        !matches!(self, Self::VisaRequired)
    }
}

/// A stored bilateral rule for one (passport, destination) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisaMatrixEntry {
    pub requirement: Requirement,
    /// Permitted stay, when the source states one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_days: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl VisaMatrixEntry {
    /// An entry with no duration or notes.
    pub fn new(requirement: Requirement) -> Self {
        Self {
            requirement,
            duration_days: None,
            notes: None,
        }
    }

    /// Attach a permitted stay in days.
    pub fn with_duration(mut self, days: u32) -> Self {
        self.duration_days = Some(days);
        self
    }
}

/// How an [`EffectiveRequirement`] was arrived at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Basis {
    /// Taken verbatim from the bilateral matrix.
    Matrix,
    /// No matrix entry; visa-required is a fallback, not a confirmed rule.
    Unknown,
    /// Upgraded to visa-free by a held visa or an activated power group.
    HeldVisa,
}

/// The substitution-aware requirement for a trip. Derived, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveRequirement {
    pub requirement: Requirement,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_days: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub basis: Basis,
}

impl EffectiveRequirement {
    /// Fallback for a pair with no matrix entry.
    pub fn unknown() -> Self {
        Self {
            requirement: Requirement::VisaRequired,
            duration_days: None,
            notes: Some(UNKNOWN_REQUIREMENT_NOTE.to_string()),
            basis: Basis::Unknown,
        }
    }

    /// Visa-free access granted through a held visa.
    pub fn unlocked_by_held_visa() -> Self {
        Self {
            requirement: Requirement::VisaFree,
            duration_days: None,
            notes: Some(HELD_VISA_NOTE.to_string()),
            basis: Basis::HeldVisa,
        }
    }

    /// Whether the requirement is the no-data fallback.
    pub fn is_unknown(&self) -> bool {
        self.basis == Basis::Unknown
    }

    /// Whether the requirement was upgraded by substitution.
    pub fn is_unlocked_by_held_visa(&self) -> bool {
        self.basis == Basis::HeldVisa
    }

    /// The permitted stay rendered as `"<n> days"`.
    pub fn duration_label(&self) -> Option<String> {
        self.duration_days.map(|d| format!("{d} days"))
    }
}

impl From<&VisaMatrixEntry> for EffectiveRequirement {
    fn from(entry: &VisaMatrixEntry) -> Self {
        Self {
            requirement: entry.requirement,
            duration_days: entry.duration_days,
            notes: entry.notes.clone(),
            basis: Basis::Matrix,
        }
    }
}
