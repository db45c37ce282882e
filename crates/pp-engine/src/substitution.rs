//! # Held-Visa Substitution
//!
//! Holding a visa can stand in for a visa the passport alone would need.
//! Two mechanisms, flattened into one unlocked set:
//!
//! 1. **Direct hold.** A visa issued by country X always grants access to X,
//!    whether or not X belongs to any group.
//! 2. **Group activation.** A [`PowerGroup`] is activated when any held visa
//!    was issued by one of its members; every member of an activated group
//!    is then unlocked.
//!
//! ## Upgrade-only
//!
//! Substitution is consulted only when the bilateral result is
//! visa-required. Any other bilateral outcome is returned untouched, so
//! holding visas can never make a trip harder. When several groups unlock
//! the same destination the outcome is simply visa-free; no group priority
//! exists.

use std::collections::BTreeSet;

use pp_core::{CountryCode, EffectiveRequirement, GroupId, HeldVisas, PowerGroup, Requirement};

use crate::bilateral::lookup_direct;
use crate::reference::VisaMatrix;

/// Ids of every group activated by the held visas.
pub fn activated_groups(groups: &[PowerGroup], held: &HeldVisas) -> BTreeSet<GroupId> {
    groups
        .iter()
        .filter(|g| g.is_activated_by(held))
        .map(|g| g.id().clone())
        .collect()
}

/// Union of the members of every activated group, plus the held visas themselves.
pub fn unlocked_destinations(groups: &[PowerGroup], held: &HeldVisas) -> BTreeSet<CountryCode> {
    let mut unlocked: BTreeSet<CountryCode> = held.iter().cloned().collect();
    for group in groups.iter().filter(|g| g.is_activated_by(held)) {
        unlocked.extend(group.members().iter().cloned());
    }
    unlocked
}

/// Activated groups that contain `destination`, for "unlocked via ..." labels.
pub fn unlock_sources(
    groups: &[PowerGroup],
    held: &HeldVisas,
    destination: &CountryCode,
) -> Vec<GroupId> {
    groups
        .iter()
        .filter(|g| g.contains(destination) && g.is_activated_by(held))
        .map(|g| g.id().clone())
        .collect()
}

/// Effective requirement for a trip, given held visas.
///
/// # Panics
///
/// In debug builds, panics when `passport == destination`, through
/// [`lookup_direct`]. Self-pairs are outside the contract; see
/// [`VisaEngine::classify`](crate::VisaEngine::classify).
pub fn resolve_effective(
    matrix: &VisaMatrix,
    groups: &[PowerGroup],
    passport: &CountryCode,
    destination: &CountryCode,
    held: &HeldVisas,
) -> EffectiveRequirement {
    let base = lookup_direct(matrix, passport, destination);
    if base.requirement != Requirement::VisaRequired {
        return base;
    }
    let unlocked = held.contains(destination)
        || groups
            .iter()
            .any(|g| g.contains(destination) && g.is_activated_by(held));
    if unlocked {
        tracing::trace!(passport = %passport, destination = %destination, "upgraded by held visa");
        return EffectiveRequirement::unlocked_by_held_visa();
    }
    base
}

/// Resolution against a precomputed unlocked set; used by batch statistics.
pub(crate) fn resolve_with_unlocked(
    matrix: &VisaMatrix,
    passport: &CountryCode,
    destination: &CountryCode,
    unlocked: &BTreeSet<CountryCode>,
) -> EffectiveRequirement {
    let base = lookup_direct(matrix, passport, destination);
    if base.requirement == Requirement::VisaRequired && unlocked.contains(destination) {
        return EffectiveRequirement::unlocked_by_held_visa();
    }
    base
}

#[cfg(test)]
mod tests {
    use super::*;
    use pp_core::{Basis, VisaMatrixEntry, HELD_VISA_NOTE};

    fn code(s: &str) -> CountryCode {
        CountryCode::new(s).unwrap()
    }

    fn held(codes: &[&str]) -> HeldVisas {
        codes.iter().map(|c| code(c)).collect()
    }

    fn group(id: &str, anchor: &str, members: &[&str]) -> PowerGroup {
        PowerGroup::new(
            GroupId::new(id).unwrap(),
            id,
            code(anchor),
            members.iter().map(|c| code(c)).collect(),
        )
        .unwrap()
    }

    fn groups() -> Vec<PowerGroup> {
        vec![
            group("SCHENGEN_VISA", "FR", &["FR", "DE", "IT", "AL"]),
            group("US_VISA", "US", &["US", "MX", "AL"]),
        ]
    }

    fn matrix() -> VisaMatrix {
        let mut m = VisaMatrix::new();
        for dest in ["FR", "DE", "IT", "US", "MX", "AL", "JP"] {
            m.insert(code("XK"), code(dest), VisaMatrixEntry::new(Requirement::VisaRequired))
                .unwrap();
        }
        m.insert(code("XK"), code("TR"), VisaMatrixEntry::new(Requirement::VisaFree))
            .unwrap();
        m.insert(code("XK"), code("IN"), VisaMatrixEntry::new(Requirement::EVisa))
            .unwrap();
        m
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "self-pair lookup is undefined")]
    fn self_pair_panics_in_debug_builds() {
        let schengen = group("SCHENGEN_VISA", "FR", &["FR", "DE"]);
        resolve_effective(&VisaMatrix::new(), &[schengen], &code("FR"), &code("FR"), &held(&["FR"]));
    }

    #[test]
    fn no_held_visas_activates_nothing() {
        assert!(activated_groups(&groups(), &HeldVisas::new()).is_empty());
        assert!(unlocked_destinations(&groups(), &HeldVisas::new()).is_empty());
    }

    #[test]
    fn member_visa_activates_group() {
        let active = activated_groups(&groups(), &held(&["DE"]));
        assert_eq!(active, [GroupId::new("SCHENGEN_VISA").unwrap()].into_iter().collect());
    }

    #[test]
    fn shared_member_activates_both_groups() {
        let active = activated_groups(&groups(), &held(&["AL"]));
        assert_eq!(active.len(), 2);
    }

    #[test]
    fn unlocked_includes_direct_holds_outside_groups() {
        let unlocked = unlocked_destinations(&groups(), &held(&["JP"]));
        assert_eq!(unlocked, [code("JP")].into_iter().collect());
    }

    #[test]
    fn unlocked_is_union_of_activated_members() {
        let unlocked = unlocked_destinations(&groups(), &held(&["DE", "US"]));
        for c in ["FR", "DE", "IT", "AL", "US", "MX"] {
            assert!(unlocked.contains(&code(c)), "{c} should be unlocked");
        }
    }

    #[test]
    fn group_member_unlocks_other_member() {
        let r = resolve_effective(&matrix(), &groups(), &code("XK"), &code("FR"), &held(&["DE"]));
        assert_eq!(r.requirement, Requirement::VisaFree);
        assert_eq!(r.notes.as_deref(), Some(HELD_VISA_NOTE));
        assert_eq!(r.basis, Basis::HeldVisa);
    }

    #[test]
    fn direct_hold_unlocks_non_group_destination() {
        let r = resolve_effective(&matrix(), &groups(), &code("XK"), &code("JP"), &held(&["JP"]));
        assert_eq!(r.requirement, Requirement::VisaFree);
        assert!(r.is_unlocked_by_held_visa());
    }

    #[test]
    fn unrelated_visa_does_not_unlock() {
        let r = resolve_effective(&matrix(), &groups(), &code("XK"), &code("JP"), &held(&["DE"]));
        assert_eq!(r.requirement, Requirement::VisaRequired);
        assert_eq!(r.basis, Basis::Matrix);
    }

    #[test]
    fn never_downgrades_better_outcomes() {
        let r = resolve_effective(&matrix(), &groups(), &code("XK"), &code("IN"), &held(&["IN"]));
        assert_eq!(r.requirement, Requirement::EVisa);
        assert_eq!(r.basis, Basis::Matrix);
        let r = resolve_effective(&matrix(), &groups(), &code("XK"), &code("TR"), &held(&["DE"]));
        assert_eq!(r.requirement, Requirement::VisaFree);
        assert!(r.notes.is_none());
    }

    #[test]
    fn unknown_fallback_can_be_unlocked() {
        let r = resolve_effective(&matrix(), &groups(), &code("XK"), &code("BR"), &held(&["BR"]));
        assert!(r.is_unlocked_by_held_visa());
    }

    #[test]
    fn unlock_sources_lists_all_groups() {
        let sources = unlock_sources(&groups(), &held(&["DE", "US"]), &code("AL"));
        assert_eq!(sources.len(), 2);
        let sources = unlock_sources(&groups(), &held(&["DE"]), &code("MX"));
        assert!(sources.is_empty());
    }

    #[test]
    fn precomputed_path_agrees_with_direct_path() {
        let m = matrix();
        let g = groups();
        for h in [held(&[]), held(&["DE"]), held(&["MX"]), held(&["JP", "AL"])] {
            let unlocked = unlocked_destinations(&g, &h);
            for dest in ["FR", "DE", "IT", "US", "MX", "AL", "JP", "TR", "IN", "BR"] {
                assert_eq!(
                    resolve_effective(&m, &g, &code("XK"), &code(dest), &h),
                    resolve_with_unlocked(&m, &code("XK"), &code(dest), &unlocked),
                    "divergence for {dest}"
                );
            }
        }
    }
}
