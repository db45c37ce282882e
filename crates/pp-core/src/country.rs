//! # Countries & Country Codes
//!
//! [`CountryCode`] is the addressing primitive for everything in the
//! system: a passport is identified by its issuing country's code, a
//! destination by the code of the country being entered, and a held visa
//! by the code of the country that issued it.
//!
//! ## Validation
//!
//! [`CountryCode`] is validated to be exactly two ASCII letters at
//! construction and deserialization time, and is stored upper-cased.
//! User-assigned codes such as `XK` (Kosovo) are accepted.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

// -- Validating Deserialize for CountryCode -----------------------------------

impl<'de> Deserialize<'de> for CountryCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

/// An ISO 3166-1 alpha-2 country code, e.g. `DE`, `US`, `XK`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CountryCode(String);

impl CountryCode {
    /// Create a country code, trimming whitespace and upper-casing.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidCountryCode`] unless the trimmed
    /// input is exactly two ASCII letters.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.len() != 2 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ValidationError::InvalidCountryCode(raw));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// Access the code string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The flag emoji for this code, built from regional indicator symbols.
    pub fn flag_glyph(&self) -> String {
        self.0
            .bytes()
            .filter_map(|b| char::from_u32(0x1F1E6 + u32::from(b - b'A')))
            .collect()
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CountryCode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for CountryCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Continents used to group countries in reference data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Continent {
    Africa,
    Asia,
    Europe,
    #[serde(rename = "North America")]
    NorthAmerica,
    #[serde(rename = "South America")]
    SouthAmerica,
    Oceania,
    Antarctica,
}

impl Continent {
    /// All continents in canonical order.
    pub fn all() -> &'static [Continent] {
        &[
            Self::Africa,
            Self::Asia,
            Self::Europe,
            Self::NorthAmerica,
            Self::SouthAmerica,
            Self::Oceania,
            Self::Antarctica,
        ]
    }

    /// The display name, matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Africa => "Africa",
            Self::Asia => "Asia",
            Self::Europe => "Europe",
            Self::NorthAmerica => "North America",
            Self::SouthAmerica => "South America",
            Self::Oceania => "Oceania",
            Self::Antarctica => "Antarctica",
        }
    }
}

impl fmt::Display for Continent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Continent {
    type Err = ValidationError;

    /// Case-insensitive parse of the display name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::all()
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ValidationError::UnknownContinent(s.to_string()))
    }
}

/// A country in the reference table. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub code: CountryCode,
    pub name: String,
    pub continent: Continent,
    /// Flag glyph. Empty in source files means "derive from the code".
    #[serde(default)]
    pub flag: String,
    /// Global passport rank, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passport_rank: Option<u32>,
    /// Number of destinations whose baseline requirement is visa-free.
    /// Visa-on-arrival and e-visa destinations are not counted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visa_free_destinations_count: Option<u32>,
}

impl Country {
    /// Create a country with a derived flag and no ranking data.
    pub fn new(code: CountryCode, name: impl Into<String>, continent: Continent) -> Self {
        let flag = code.flag_glyph();
        Self {
            code,
            name: name.into(),
            continent,
            flag,
            passport_rank: None,
            visa_free_destinations_count: None,
        }
    }

    /// Fill in the flag glyph if the source record left it empty.
    pub fn with_default_flag(mut self) -> Self {
        if self.flag.trim().is_empty() {
            self.flag = self.code.flag_glyph();
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn country_code_valid() {
        let code = CountryCode::new("DE").unwrap();
        assert_eq!(code.as_str(), "DE");
    }

    #[test]
    fn country_code_normalizes_case_and_whitespace() {
        let code = CountryCode::new("  xk ").unwrap();
        assert_eq!(code.as_str(), "XK");
    }

    #[test]
    fn country_code_rejects_bad_input() {
        assert!(CountryCode::new("").is_err());
        assert!(CountryCode::new("D").is_err());
        assert!(CountryCode::new("DEU").is_err());
        assert!(CountryCode::new("1A").is_err());
        assert!(CountryCode::new("É1").is_err());
    }

    #[test]
    fn country_code_deserialize_validates() {
        let ok: CountryCode = serde_json::from_str("\"fr\"").unwrap();
        assert_eq!(ok.as_str(), "FR");
        assert!(serde_json::from_str::<CountryCode>("\"France\"").is_err());
    }

    #[test]
    fn flag_glyph_uses_regional_indicators() {
        let code = CountryCode::new("FR").unwrap();
        assert_eq!(code.flag_glyph(), "\u{1F1EB}\u{1F1F7}");
    }

    #[test]
    fn continent_parse_is_case_insensitive() {
        assert_eq!("north america".parse::<Continent>().unwrap(), Continent::NorthAmerica);
        assert_eq!("Europe".parse::<Continent>().unwrap(), Continent::Europe);
        assert!("Atlantis".parse::<Continent>().is_err());
    }

    #[test]
    fn continent_serde_uses_display_names() {
        let json = serde_json::to_string(&Continent::SouthAmerica).unwrap();
        assert_eq!(json, "\"South America\"");
        for c in Continent::all() {
            let json = serde_json::to_string(c).unwrap();
            assert_eq!(json, format!("\"{}\"", c.as_str()));
        }
    }

    #[test]
    fn country_without_flag_gets_derived_glyph() {
        let json = r#"{"code":"JP","name":"Japan","continent":"Asia"}"#;
        let country: Country = serde_json::from_str(json).unwrap();
        assert!(country.flag.is_empty());
        let country = country.with_default_flag();
        assert_eq!(country.flag, CountryCode::new("JP").unwrap().flag_glyph());
        assert!(country.passport_rank.is_none());
    }

    #[test]
    fn country_new_sets_flag() {
        let country = Country::new(CountryCode::new("BR").unwrap(), "Brazil", Continent::SouthAmerica);
        assert_eq!(country.flag, "\u{1F1E7}\u{1F1F7}");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn any_two_letters_are_accepted_upper_cased(s in "[a-zA-Z]{2}") {
            let code = CountryCode::new(s.clone()).unwrap();
            prop_assert_eq!(code.as_str(), s.to_ascii_uppercase());
            prop_assert_eq!(code.flag_glyph().chars().count(), 2);
        }

        #[test]
        fn other_lengths_are_rejected(s in "[A-Z]{0,1}|[A-Z]{3,6}") {
            prop_assert!(CountryCode::new(s).is_err());
        }

        #[test]
        fn serde_agrees_with_constructor(s in "[ a-zA-Z0-9]{0,4}") {
            let json = serde_json::to_string(&s).unwrap();
            let parsed: Result<CountryCode, _> = serde_json::from_str(&json);
            prop_assert_eq!(parsed.ok(), CountryCode::new(s).ok());
        }
    }
}
