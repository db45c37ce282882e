//! # Traveler Profile
//!
//! The only mutable state in the system. The engine never reads a profile
//! from ambient storage; callers own it, persist it however they like, and
//! pass snapshots of [`HeldVisas`] into the resolution functions.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::country::CountryCode;

/// Visas and permits held independently of the passport, keyed by issuing country.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HeldVisas(BTreeSet<CountryCode>);

impl HeldVisas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the code was newly added.
    pub fn insert(&mut self, code: CountryCode) -> bool {
        self.0.insert(code)
    }

    /// Returns `true` if the code was held.
    pub fn remove(&mut self, code: &CountryCode) -> bool {
        self.0.remove(code)
    }

    /// Add the code if absent, remove it if present. Returns whether it is now held.
    pub fn toggle(&mut self, code: CountryCode) -> bool {
        if self.0.remove(&code) {
            false
        } else {
            self.0.insert(code);
            true
        }
    }

    pub fn contains(&self, code: &CountryCode) -> bool {
        self.0.contains(code)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CountryCode> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<CountryCode> for HeldVisas {
    fn from_iter<I: IntoIterator<Item = CountryCode>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<CountryCode> for HeldVisas {
    fn extend<I: IntoIterator<Item = CountryCode>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl<'a> IntoIterator for &'a HeldVisas {
    type Item = &'a CountryCode;
    type IntoIter = std::collections::btree_set::Iter<'a, CountryCode>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A traveler's profile record: chosen passport, held visas, visited countries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelerProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passport: Option<CountryCode>,
    #[serde(default)]
    pub held_visas: HeldVisas,
    #[serde(default)]
    pub visited: BTreeSet<CountryCode>,
}

impl TravelerProfile {
    pub fn new(passport: Option<CountryCode>) -> Self {
        Self {
            passport,
            ..Self::default()
        }
    }

    /// Toggle a held visa. Returns whether it is now held.
    pub fn toggle_held_visa(&mut self, code: CountryCode) -> bool {
        self.held_visas.toggle(code)
    }

    /// Returns `true` if the country was not already marked.
    pub fn mark_visited(&mut self, code: CountryCode) -> bool {
        self.visited.insert(code)
    }

    /// Returns `true` if the country had been marked.
    pub fn unmark_visited(&mut self, code: &CountryCode) -> bool {
        self.visited.remove(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> CountryCode {
        CountryCode::new(s).unwrap()
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut held = HeldVisas::new();
        assert!(held.toggle(code("US")));
        assert!(held.contains(&code("US")));
        assert!(!held.toggle(code("US")));
        assert!(held.is_empty());
    }

    #[test]
    fn set_semantics_no_duplicates() {
        let mut held = HeldVisas::new();
        assert!(held.insert(code("DE")));
        assert!(!held.insert(code("DE")));
        assert_eq!(held.len(), 1);
        assert!(held.remove(&code("DE")));
        assert!(!held.remove(&code("DE")));
    }

    #[test]
    fn held_visas_serialize_as_array() {
        let held: HeldVisas = [code("US"), code("DE")].into_iter().collect();
        let json = serde_json::to_string(&held).unwrap();
        assert_eq!(json, r#"["DE","US"]"#);
    }

    #[test]
    fn profile_defaults_from_partial_json() {
        let profile: TravelerProfile = serde_json::from_str(r#"{"passport":"in"}"#).unwrap();
        assert_eq!(profile.passport, Some(code("IN")));
        assert!(profile.held_visas.is_empty());
        assert!(profile.visited.is_empty());
    }

    #[test]
    fn profile_visited_tracking() {
        let mut profile = TravelerProfile::new(Some(code("BR")));
        assert!(profile.mark_visited(code("PT")));
        assert!(!profile.mark_visited(code("PT")));
        assert!(profile.unmark_visited(&code("PT")));
        assert!(profile.visited.is_empty());
    }

    #[test]
    fn profile_toggle_held_visa() {
        let mut profile = TravelerProfile::new(None);
        assert!(profile.toggle_held_visa(code("GB")));
        assert!(profile.held_visas.contains(&code("GB")));
        assert!(!profile.toggle_held_visa(code("GB")));
    }
}
