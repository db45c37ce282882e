//! # Aggregate Statistics & Global Rank
//!
//! Counts a passport's effective requirements across a destination
//! universe, and ranks passports by their *access score*: the number of
//! destinations reachable without a consular visa.
//!
//! ## Buckets
//!
//! Four buckets, derived from [`Requirement::bucket`]: `eta` and `e-visa`
//! share the e-visa bucket. The buckets always sum to `total`.
//!
//! ## Ranking
//!
//! Scores are sorted descending. The first passport is rank 1; a passport
//! whose score equals its predecessor's shares that rank; otherwise the
//! rank is the predecessor's plus one. Scores `[100, 100, 80]` rank
//! `[1, 1, 2]`.
//!
//! The subject passport is scored *with* its held visas, every other
//! passport with none: the rank compares the traveler's actual access to
//! everyone else's baseline.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use pp_core::{CountryCode, HeldVisas, PowerGroup, Requirement, StatBucket};

use crate::reference::VisaMatrix;
use crate::substitution::{resolve_with_unlocked, unlocked_destinations};

/// Bucketed requirement counts for one passport.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassportStats {
    /// Destinations considered (the universe minus the passport itself).
    pub total: u32,
    pub visa_free: u32,
    pub visa_on_arrival: u32,
    /// `e-visa` and `eta` combined.
    pub e_visa: u32,
    pub visa_required: u32,
}

impl PassportStats {
    /// Destinations enterable without a consular visa.
    pub fn access_score(&self) -> u32 {
        StatBucket::ALL
            .into_iter()
            .filter(StatBucket::is_unrestricted)
            .map(|bucket| self.count(bucket))
            .sum()
    }

    /// The count held in one bucket.
    pub fn count(&self, bucket: StatBucket) -> u32 {
        match bucket {
            StatBucket::VisaFree => self.visa_free,
            StatBucket::VisaOnArrival => self.visa_on_arrival,
            StatBucket::EVisa => self.e_visa,
            StatBucket::VisaRequired => self.visa_required,
        }
    }

    fn record(&mut self, requirement: Requirement) {
        self.total += 1;
        match requirement.bucket() {
            StatBucket::VisaFree => self.visa_free += 1,
            StatBucket::VisaOnArrival => self.visa_on_arrival += 1,
            StatBucket::EVisa => self.e_visa += 1,
            StatBucket::VisaRequired => self.visa_required += 1,
        }
    }
}

/// One row of a ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedPassport {
    pub passport: CountryCode,
    pub score: u32,
    pub rank: u32,
}

/// Count effective requirements for `passport` over every other code in `universe`.
pub fn compute_stats(
    matrix: &VisaMatrix,
    groups: &[PowerGroup],
    passport: &CountryCode,
    held: &HeldVisas,
    universe: &BTreeSet<CountryCode>,
) -> PassportStats {
    let unlocked = unlocked_destinations(groups, held);
    let mut stats = PassportStats::default();
    for destination in universe.iter().filter(|d| *d != passport) {
        let effective = resolve_with_unlocked(matrix, passport, destination, &unlocked);
        stats.record(effective.requirement);
    }
    stats
}

/// Assign ranks to `(passport, score)` pairs.
///
/// Output is sorted by descending score, ties broken by passport code so
/// the listing is deterministic. Ties always share a rank regardless of
/// that ordering.
pub fn assign_ranks(scores: impl IntoIterator<Item = (CountryCode, u32)>) -> Vec<RankedPassport> {
    let mut sorted: Vec<(CountryCode, u32)> = scores.into_iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let mut ranked = Vec::with_capacity(sorted.len());
    let mut previous: Option<(u32, u32)> = None;
    for (passport, score) in sorted {
        let rank = match previous {
            None => 1,
            Some((prev_score, prev_rank)) if prev_score == score => prev_rank,
            Some((_, prev_rank)) => prev_rank + 1,
        };
        previous = Some((score, rank));
        ranked.push(RankedPassport {
            passport,
            score,
            rank,
        });
    }
    ranked
}

/// Baseline (no held visas) score for every passport in the universe.
pub fn baseline_scores(
    matrix: &VisaMatrix,
    groups: &[PowerGroup],
    universe: &BTreeSet<CountryCode>,
) -> Vec<(CountryCode, u32)> {
    let none = HeldVisas::new();
    universe
        .iter()
        .map(|p| {
            let score = compute_stats(matrix, groups, p, &none, universe).access_score();
            (p.clone(), score)
        })
        .collect()
}

/// Rank of `passport` (scored with `held`) among every passport in
/// `universe` (scored without held visas).
///
/// The subject is ranked even when it is missing from `universe`.
pub fn compute_global_rank(
    matrix: &VisaMatrix,
    groups: &[PowerGroup],
    passport: &CountryCode,
    held: &HeldVisas,
    universe: &BTreeSet<CountryCode>,
) -> u32 {
    let subject_score = compute_stats(matrix, groups, passport, held, universe).access_score();
    let scores = baseline_scores(matrix, groups, universe)
        .into_iter()
        .filter(|(p, _)| p != passport)
        .chain(std::iter::once((passport.clone(), subject_score)));

    let ranked = assign_ranks(scores);
    let rank = ranked
        .iter()
        .find(|r| &r.passport == passport)
        .map_or(1, |r| r.rank);
    tracing::debug!(passport = %passport, score = subject_score, rank, "computed global rank");
    rank
}
