//! # Power Groups
//!
//! A power group is a named bloc whose visa grants access beyond the
//! issuing country: a Schengen visa opens every Schengen state, and a US
//! visa is accepted as a substitute by several third countries. The member
//! set mixes the visa's home territory with those third
//! countries; once a group is activated both kinds are unlock targets.
//!
//! Groups are static reference data. They are validated at construction
//! (non-empty, anchor is a member) and deserialization goes through the
//! same checks.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::country::CountryCode;
use crate::error::ValidationError;
use crate::profile::HeldVisas;

/// Identifier of a power group, e.g. `SCHENGEN_VISA`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct GroupId(String);

impl<'de> Deserialize<'de> for GroupId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

impl GroupId {
    /// Create a group identifier, validating non-emptiness.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidGroupId`] for empty or
    /// whitespace-only input.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::InvalidGroupId(raw));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Deserialize)]
struct RawPowerGroup {
    id: GroupId,
    #[serde(default)]
    label: Option<String>,
    anchor: CountryCode,
    members: BTreeSet<CountryCode>,
}

impl TryFrom<RawPowerGroup> for PowerGroup {
    type Error = ValidationError;

    fn try_from(raw: RawPowerGroup) -> Result<Self, Self::Error> {
        let label = raw.label.unwrap_or_else(|| raw.id.to_string());
        PowerGroup::new(raw.id, label, raw.anchor, raw.members)
    }
}

/// A named bloc of destinations unlocked together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPowerGroup")]
pub struct PowerGroup {
    id: GroupId,
    label: String,
    /// The country whose visa the group is named after.
    anchor: CountryCode,
    members: BTreeSet<CountryCode>,
}

impl PowerGroup {
    /// Create a validated power group.
    ///
    /// # Errors
    ///
    /// [`ValidationError::EmptyGroup`] if `members` is empty, and
    /// [`ValidationError::AnchorNotMember`] if `anchor` is not in `members`.
    pub fn new(
        id: GroupId,
        label: impl Into<String>,
        anchor: CountryCode,
        members: BTreeSet<CountryCode>,
    ) -> Result<Self, ValidationError> {
        if members.is_empty() {
            return Err(ValidationError::EmptyGroup(id.to_string()));
        }
        if !members.contains(&anchor) {
            return Err(ValidationError::AnchorNotMember {
                group: id.to_string(),
                anchor: anchor.to_string(),
            });
        }
        Ok(Self {
            id,
            label: label.into(),
            anchor,
            members,
        })
    }

    pub fn id(&self) -> &GroupId {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn anchor(&self) -> &CountryCode {
        &self.anchor
    }

    /// Home territory and accepting third countries alike.
    pub fn members(&self) -> &BTreeSet<CountryCode> {
        &self.members
    }

    pub fn contains(&self, code: &CountryCode) -> bool {
        self.members.contains(code)
    }

    /// A group is activated when any held visa was issued by a member.
    pub fn is_activated_by(&self, held: &HeldVisas) -> bool {
        held.iter().any(|code| self.members.contains(code))
    }
}
