//! Cell normalization: one dataset cell to at most one matrix entry.

use pp_core::{Requirement, VisaMatrixEntry};

/// Parse a single requirement cell.
///
/// Matching is on the trimmed, lower-cased text. A bare non-negative
/// integer is a visa-free stay of that many days. Empty cells, `-1` (the
/// dataset's self-pair marker), and anything unrecognised yield `None`;
/// the pair then falls back to "unknown" at query time.
pub fn parse_cell(raw: &str) -> Option<VisaMatrixEntry> {
    let value = raw.trim().to_lowercase();
    let requirement = match value.as_str() {
        "" | "-1" => return None,
        "visa required" => Requirement::VisaRequired,
        "visa on arrival" | "voa" => Requirement::VisaOnArrival,
        "e-visa" | "evisa" => Requirement::EVisa,
        "eta" => Requirement::Eta,
        "visa free" | "visa-free" => Requirement::VisaFree,
        other => {
            if !other.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            let days: u32 = other.parse().ok()?;
            return Some(VisaMatrixEntry::new(Requirement::VisaFree).with_duration(days));
        }
    };
    Some(VisaMatrixEntry::new(requirement))
}
