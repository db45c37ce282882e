//! # Country Name Normalization
//!
//! Datasets name countries the way their authors like: "Korea, South",
//! "Czechia", "The Gambia". [`CountryNameIndex`] maps those spellings to
//! ISO codes in three steps:
//!
//! 1. the manual alias table ([`MANUAL_ALIASES`]), which wins on conflict;
//! 2. the lower-cased names from the reference country table;
//! 3. failing both, a leading `"the "` is stripped and both are retried.
//!
//! A name that still does not resolve yields `None`. The pipeline skips
//! such rows and columns rather than failing.

use std::collections::HashMap;

use pp_core::{Country, CountryCode};

use crate::error::DatagenResult;

/// Dataset-specific spellings that differ from the reference table names.
pub const MANUAL_ALIASES: &[(&str, &str)] = &[
    ("korea, south", "KR"),
    ("korea, north", "KP"),
    ("republic of korea", "KR"),
    ("czechia", "CZ"),
    ("cote d'ivoire", "CI"),
    ("côte d'ivoire", "CI"),
    ("united states of america", "US"),
    ("usa", "US"),
    ("uk", "GB"),
    ("great britain", "GB"),
    ("uae", "AE"),
    ("russian federation", "RU"),
    ("viet nam", "VN"),
    ("dr congo", "CD"),
    ("congo (dem. rep.)", "CD"),
    ("congo, democratic republic of the", "CD"),
    ("congo (rep.)", "CG"),
    ("republic of the congo", "CG"),
    ("cape verde", "CV"),
    ("swaziland", "SZ"),
    ("burma", "MM"),
    ("macedonia", "MK"),
    ("east timor", "TL"),
    ("holy see", "VA"),
    ("vatican", "VA"),
    ("micronesia, federated states of", "FM"),
    ("gambia, the", "GM"),
    ("bahamas, the", "BS"),
    ("palestinian territories", "PS"),
    ("state of palestine", "PS"),
    ("hong kong sar", "HK"),
    ("macau", "MO"),
    ("lao pdr", "LA"),
    ("iran, islamic republic of", "IR"),
    ("syrian arab republic", "SY"),
    ("republic of moldova", "MD"),
    ("united republic of tanzania", "TZ"),
    ("bolivia (plurinational state of)", "BO"),
    ("venezuela (bolivarian republic of)", "VE"),
    ("brunei darussalam", "BN"),
    ("turkiye", "TR"),
    ("türkiye", "TR"),
    ("sao tome & principe", "ST"),
    ("são tomé and príncipe", "ST"),
    ("st. kitts and nevis", "KN"),
    ("st. lucia", "LC"),
    ("st. vincent and the grenadines", "VC"),
    ("chinese taipei", "TW"),
    ("kyrgyz republic", "KG"),
    ("slovak republic", "SK"),
    ("cabo verde", "CV"),
    ("timor leste", "TL"),
];

/// Lower-case, unify apostrophes, and collapse internal whitespace.
pub fn normalize_name(name: &str) -> String {
    name.replace(['\u{2019}', '\u{2018}', '`'], "'")
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Name → code lookup built from the reference table plus aliases.
#[derive(Debug, Clone)]
pub struct CountryNameIndex {
    by_name: HashMap<String, CountryCode>,
    aliases: HashMap<String, CountryCode>,
}

impl CountryNameIndex {
    /// Index the reference countries together with [`MANUAL_ALIASES`].
    pub fn new(countries: &[Country]) -> DatagenResult<Self> {
        Self::with_aliases(countries, MANUAL_ALIASES)
    }

    /// Index the reference countries with a caller-provided alias table.
    pub fn with_aliases(countries: &[Country], aliases: &[(&str, &str)]) -> DatagenResult<Self> {
        let by_name = countries
            .iter()
            .map(|c| (normalize_name(&c.name), c.code.clone()))
            .collect();
        let aliases = aliases
            .iter()
            .map(|(name, code)| Ok((normalize_name(name), CountryCode::new(*code)?)))
            .collect::<DatagenResult<HashMap<_, _>>>()?;
        Ok(Self { by_name, aliases })
    }

    fn lookup(&self, key: &str) -> Option<CountryCode> {
        self.aliases
            .get(key)
            .or_else(|| self.by_name.get(key))
            .cloned()
    }

    /// Resolve a dataset country name to its code.
    pub fn resolve(&self, name: &str) -> Option<CountryCode> {
        let key = normalize_name(name);
        if key.is_empty() {
            return None;
        }
        self.lookup(&key)
            .or_else(|| key.strip_prefix("the ").and_then(|rest| self.lookup(rest)))
    }

    /// Number of distinct spellings known.
    pub fn len(&self) -> usize {
        self.by_name.len() + self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty() && self.aliases.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pp_core::Continent;

    fn code(s: &str) -> CountryCode {
        CountryCode::new(s).unwrap()
    }

    fn index() -> CountryNameIndex {
        let countries = vec![
            Country::new(code("CZ"), "Czech Republic", Continent::Europe),
            Country::new(code("KR"), "South Korea", Continent::Asia),
            Country::new(code("GM"), "Gambia", Continent::Africa),
            Country::new(code("NL"), "Netherlands", Continent::Europe),
            Country::new(code("CI"), "Ivory Coast", Continent::Africa),
        ];
        CountryNameIndex::new(&countries).unwrap()
    }

    #[test]
    fn resolves_reference_names_case_insensitively() {
        let idx = index();
        assert_eq!(idx.resolve("Czech Republic"), Some(code("CZ")));
        assert_eq!(idx.resolve("  SOUTH   korea "), Some(code("KR")));
    }

    #[test]
    fn resolves_manual_aliases() {
        let idx = index();
        assert_eq!(idx.resolve("Czechia"), Some(code("CZ")));
        assert_eq!(idx.resolve("Korea, South"), Some(code("KR")));
        assert_eq!(idx.resolve("Cote d'Ivoire"), Some(code("CI")));
        assert_eq!(idx.resolve("Cote d\u{2019}Ivoire"), Some(code("CI")));
    }

    #[test]
    fn strips_leading_the() {
        let idx = index();
        assert_eq!(idx.resolve("The Gambia"), Some(code("GM")));
        assert_eq!(idx.resolve("the Netherlands"), Some(code("NL")));
    }

    #[test]
    fn unknown_names_do_not_resolve() {
        let idx = index();
        assert_eq!(idx.resolve("Atlantis"), None);
        assert_eq!(idx.resolve(""), None);
        assert_eq!(idx.resolve("The"), None);
    }

    #[test]
    fn alias_wins_over_reference_name() {
        let countries = vec![Country::new(code("GB"), "UK", Continent::Europe)];
        let idx = CountryNameIndex::with_aliases(&countries, &[("uk", "UA")]).unwrap();
        assert_eq!(idx.resolve("UK"), Some(code("UA")));
    }

    #[test]
    fn invalid_alias_code_is_an_error() {
        assert!(CountryNameIndex::with_aliases(&[], &[("somewhere", "XYZ")]).is_err());
    }

    #[test]
    fn builtin_aliases_are_valid_codes() {
        for (name, c) in MANUAL_ALIASES {
            assert!(CountryCode::new(*c).is_ok(), "alias {name} has invalid code {c}");
            assert_eq!(normalize_name(name), *name, "alias {name} must be stored normalized");
        }
    }
}
