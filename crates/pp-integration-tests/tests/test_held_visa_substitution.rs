//! # Held-Visa Substitution
//!
//! A Kosovar passport needs a visa for France, but a held German visa
//! activates the Schengen group and unlocks it.

use std::collections::BTreeSet;

use pp_core::{CountryCode, GroupId, HeldVisas, Requirement, VisaMatrixEntry, HELD_VISA_NOTE};
use pp_engine::{Access, ReferenceData, VisaEngine, VisaMatrix};

fn code(s: &str) -> CountryCode {
    CountryCode::new(s).unwrap()
}

fn held(codes: &[&str]) -> HeldVisas {
    codes.iter().map(|c| code(c)).collect()
}

fn kosovo_engine() -> VisaEngine {
    let mut m = VisaMatrix::new();
    for (dest, req) in [
        ("FR", Requirement::VisaRequired),
        ("DE", Requirement::VisaRequired),
        ("US", Requirement::VisaRequired),
        ("JP", Requirement::VisaRequired),
        ("AL", Requirement::VisaFree),
        ("IN", Requirement::EVisa),
    ] {
        m.insert(code("XK"), code(dest), VisaMatrixEntry::new(req)).unwrap();
    }
    VisaEngine::new(ReferenceData::with_builtin_tables(m).unwrap())
}

#[test]
fn schengen_visa_unlocks_france() {
    let engine = kosovo_engine();
    let r = engine.resolve_effective(&code("XK"), &code("FR"), &held(&["DE"]));
    assert_eq!(r.requirement, Requirement::VisaFree);
    assert_eq!(r.notes.as_deref(), Some(HELD_VISA_NOTE));
    assert!(r.is_unlocked_by_held_visa());
}

#[test]
fn without_held_visas_france_stays_visa_required() {
    let engine = kosovo_engine();
    let r = engine.resolve_effective(&code("XK"), &code("FR"), &HeldVisas::new());
    assert_eq!(r.requirement, Requirement::VisaRequired);
    assert!(!r.is_unlocked_by_held_visa());
}

#[test]
fn unrelated_held_visa_does_not_unlock() {
    let engine = kosovo_engine();
    let r = engine.resolve_effective(&code("XK"), &code("JP"), &held(&["DE"]));
    assert_eq!(r.requirement, Requirement::VisaRequired);
}

#[test]
fn directly_held_destination_is_unlocked() {
    let engine = kosovo_engine();
    let r = engine.resolve_effective(&code("XK"), &code("JP"), &held(&["JP"]));
    assert_eq!(r.requirement, Requirement::VisaFree);
    assert_eq!(r.notes.as_deref(), Some(HELD_VISA_NOTE));
}

#[test]
fn non_visa_required_pairs_are_never_touched() {
    let engine = kosovo_engine();
    let h = held(&["DE", "US", "IN"]);
    let r = engine.resolve_effective(&code("XK"), &code("IN"), &h);
    assert_eq!(r.requirement, Requirement::EVisa);
    assert!(r.notes.is_none());
    let r = engine.resolve_effective(&code("XK"), &code("AL"), &h);
    assert_eq!(r.requirement, Requirement::VisaFree);
    assert!(r.notes.is_none());
}

#[test]
fn unknown_pairs_can_be_unlocked() {
    let engine = kosovo_engine();
    // XK -> IT is absent from the matrix; IT is a Schengen member.
    let r = engine.resolve_effective(&code("XK"), &code("IT"), &held(&["FR"]));
    assert_eq!(r.requirement, Requirement::VisaFree);
    assert_eq!(r.notes.as_deref(), Some(HELD_VISA_NOTE));
}

#[test]
fn activated_groups_and_sources() {
    let engine = kosovo_engine();
    let h = held(&["DE"]);
    let activated = engine.list_activated_groups(&h);
    assert_eq!(
        activated,
        BTreeSet::from([GroupId::new("SCHENGEN_VISA").unwrap()])
    );
    let unlocked = engine.unlocked_destinations(&h);
    assert!(unlocked.contains(&code("FR")));
    assert!(unlocked.contains(&code("DE")));
    assert!(!unlocked.contains(&code("JP")));
}

#[test]
fn us_visa_unlocks_third_countries() {
    let engine = kosovo_engine();
    let h = held(&["US"]);
    let unlocked = engine.unlocked_destinations(&h);
    assert!(unlocked.contains(&code("MX")));
    assert!(unlocked.contains(&code("AL")));
}

#[test]
fn classify_marks_home_and_unlocks_foreign() {
    let engine = kosovo_engine();
    let h = held(&["DE"]);
    assert_eq!(engine.classify(&code("XK"), &code("XK"), &h), Access::Home);
    match engine.classify(&code("XK"), &code("FR"), &h) {
        Access::Foreign(r) => assert!(r.is_unlocked_by_held_visa()),
        Access::Home => panic!("France is not home for a Kosovar passport"),
    }
}

#[test]
fn held_visas_raise_stats_but_not_baseline_leaderboard() {
    let engine = kosovo_engine();
    let universe = engine.universe();
    let dests: BTreeSet<CountryCode> = ["FR", "DE", "US", "JP", "AL", "IN"].iter().map(|c| code(c)).collect();

    let baseline = engine.compute_stats(&code("XK"), &HeldVisas::new(), &dests);
    let boosted = engine.compute_stats(&code("XK"), &held(&["DE"]), &dests);
    assert_eq!(baseline.visa_required, 4);
    assert_eq!(boosted.visa_required, 2);
    assert_eq!(boosted.visa_free, baseline.visa_free + 2);

    let board = engine.leaderboard(&universe);
    assert_eq!(board.len(), 1);
    assert_eq!(board[0].rank, 1);
}
