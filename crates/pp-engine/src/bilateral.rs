//! # Bilateral Lookup
//!
//! The direct passport → destination rule, ignoring any held visas.
//!
//! A stored entry is returned verbatim. A missing entry is *not* an error:
//! it degrades to visa-required carrying [`UNKNOWN_REQUIREMENT_NOTE`](pp_core::UNKNOWN_REQUIREMENT_NOTE) and
//! [`Basis::Unknown`](pp_core::Basis::Unknown), so callers can show a
//! caution marker instead of asserting certainty.
//!
//! Self-pairs are outside the contract. Callers treat a passport's own
//! country as "home"; see [`VisaEngine::classify`](crate::VisaEngine::classify).

use pp_core::{CountryCode, EffectiveRequirement};

use crate::reference::VisaMatrix;

/// Direct requirement for `passport` entering `destination`.
///
/// # Panics
///
/// In debug builds, panics when `passport == destination`. Release builds
/// return whatever the matrix holds for the pair (normally the unknown
/// fallback). Use [`VisaEngine::classify`](crate::VisaEngine::classify)
/// when the destination may be the passport's own country.
pub fn lookup_direct(
    matrix: &VisaMatrix,
    passport: &CountryCode,
    destination: &CountryCode,
) -> EffectiveRequirement {
    debug_assert_ne!(passport, destination, "self-pair lookup is undefined; treat as home");
    match matrix.get(passport, destination) {
        Some(entry) => EffectiveRequirement::from(entry),
        None => EffectiveRequirement::unknown(),
    }
}
