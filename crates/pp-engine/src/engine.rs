//! # Visa Engine
//!
//! The one entry point every consumer calls. Map colouring, passport
//! screens, and country panels all resolve through [`VisaEngine`] so they
//! cannot drift apart.
//!
//! The engine owns immutable [`ReferenceData`] and nothing else. Held
//! visas and the chosen passport are parameters on every call, so a single
//! engine can be shared across threads (`&VisaEngine` is `Send + Sync`)
//! and queried concurrently for different travelers.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use pp_core::{Country, CountryCode, EffectiveRequirement, GroupId, HeldVisas, PowerGroup};

use crate::bilateral;
use crate::reference::ReferenceData;
use crate::stats::{self, PassportStats, RankedPassport};
use crate::substitution;

/// Outcome of [`VisaEngine::classify`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Access {
    /// The destination is the passport's own country.
    Home,
    /// A foreign destination with its effective requirement.
    Foreign(EffectiveRequirement),
}

/// One destination in a [`VisaEngine::resolve_all`] listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolved {
    pub destination: CountryCode,
    #[serde(flatten)]
    pub effective: EffectiveRequirement,
}

/// Facade over the reference data exposing the resolution API.
#[derive(Debug, Clone)]
pub struct VisaEngine {
    data: ReferenceData,
}

impl VisaEngine {
    pub fn new(data: ReferenceData) -> Self {
        Self { data }
    }

    pub fn data(&self) -> &ReferenceData {
        &self.data
    }

    /// Fill every country's `passport_rank` from the baseline leaderboard and
    /// its `visa_free_destinations_count` from baseline statistics.
    pub fn with_derived_rankings(mut self) -> Self {
        let universe = self.data.passport_universe();
        let board = self.leaderboard(&universe);
        let none = HeldVisas::new();
        for row in &board {
            let visa_free = self.compute_stats(&row.passport, &none, &universe).visa_free;
            self.data.set_passport_ranking(&row.passport, row.rank, visa_free);
        }
        tracing::info!(passports = board.len(), "derived passport rankings");
        self
    }

    pub fn country(&self, code: &CountryCode) -> Option<&Country> {
        self.data.country(code)
    }

    /// Passports known to the matrix.
    pub fn universe(&self) -> BTreeSet<CountryCode> {
        self.data.passport_universe()
    }

    /// See [`bilateral::lookup_direct`]; panics on a self-pair in debug builds.
    pub fn lookup_direct(&self, passport: &CountryCode, destination: &CountryCode) -> EffectiveRequirement {
        bilateral::lookup_direct(self.data.matrix(), passport, destination)
    }

    /// See [`substitution::resolve_effective`]; panics on a self-pair in debug builds.
    pub fn resolve_effective(
        &self,
        passport: &CountryCode,
        destination: &CountryCode,
        held: &HeldVisas,
    ) -> EffectiveRequirement {
        substitution::resolve_effective(self.data.matrix(), self.data.groups(), passport, destination, held)
    }

    /// Like [`resolve_effective`](Self::resolve_effective), but total over
    /// self-pairs: a passport's own country is [`Access::Home`].
    pub fn classify(&self, passport: &CountryCode, destination: &CountryCode, held: &HeldVisas) -> Access {
        if passport == destination {
            return Access::Home;
        }
        Access::Foreign(self.resolve_effective(passport, destination, held))
    }

    /// Resolve every destination in `universe` except the passport's own.
    pub fn resolve_all(
        &self,
        passport: &CountryCode,
        held: &HeldVisas,
        universe: &BTreeSet<CountryCode>,
    ) -> Vec<Resolved> {
        universe
            .iter()
            .filter(|d| *d != passport)
            .map(|d| Resolved {
                destination: d.clone(),
                effective: self.resolve_effective(passport, d, held),
            })
            .collect()
    }

    pub fn list_activated_groups(&self, held: &HeldVisas) -> BTreeSet<GroupId> {
        substitution::activated_groups(self.data.groups(), held)
    }

    pub fn unlocked_destinations(&self, held: &HeldVisas) -> BTreeSet<CountryCode> {
        substitution::unlocked_destinations(self.data.groups(), held)
    }

    /// Activated groups containing `destination`.
    pub fn unlock_sources(&self, held: &HeldVisas, destination: &CountryCode) -> Vec<GroupId> {
        substitution::unlock_sources(self.data.groups(), held, destination)
    }

    pub fn groups(&self) -> &[PowerGroup] {
        self.data.groups()
    }

    pub fn compute_stats(
        &self,
        passport: &CountryCode,
        held: &HeldVisas,
        universe: &BTreeSet<CountryCode>,
    ) -> PassportStats {
        stats::compute_stats(self.data.matrix(), self.data.groups(), passport, held, universe)
    }

    pub fn compute_global_rank(
        &self,
        passport: &CountryCode,
        held: &HeldVisas,
        universe: &BTreeSet<CountryCode>,
    ) -> u32 {
        stats::compute_global_rank(self.data.matrix(), self.data.groups(), passport, held, universe)
    }

    /// Baseline ranking of every passport in `universe`.
    pub fn leaderboard(&self, universe: &BTreeSet<CountryCode>) -> Vec<RankedPassport> {
        stats::assign_ranks(stats::baseline_scores(self.data.matrix(), self.data.groups(), universe))
    }
}
