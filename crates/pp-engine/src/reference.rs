//! # Reference Data Store
//!
//! Immutable tables loaded once at startup:
//!
//! - the country table (code, name, continent, flag, optional ranking data),
//! - the bilateral [`VisaMatrix`] (passport → destination → entry),
//! - the [`PowerGroup`] definitions.
//!
//! Nothing here is mutated after construction. The only mutable state in
//! the system, the traveler profile, lives with the caller.
//!
//! ## Validation
//!
//! Construction rejects self-pair matrix entries, duplicate country codes,
//! and duplicate group ids. Matrix codes that do not appear in the country
//! table are kept (the matrix is authoritative for resolution) but logged.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use pp_core::{Country, CountryCode, GroupId, PowerGroup, VisaMatrixEntry};

use crate::error::{EngineError, EngineResult};

/// The country catalogue shipped with the repository.
const BUILTIN_COUNTRIES_JSON: &str = include_str!("../../../data/countries.json");

// ---------------------------------------------------------------------------
// VisaMatrix
// ---------------------------------------------------------------------------

/// Bilateral requirements keyed by passport, then destination.
///
/// Invariant: no row contains its own passport code as a destination.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<CountryCode, BTreeMap<CountryCode, VisaMatrixEntry>>",
    into = "BTreeMap<CountryCode, BTreeMap<CountryCode, VisaMatrixEntry>>"
)]
pub struct VisaMatrix {
    rows: BTreeMap<CountryCode, BTreeMap<CountryCode, VisaMatrixEntry>>,
}

impl TryFrom<BTreeMap<CountryCode, BTreeMap<CountryCode, VisaMatrixEntry>>> for VisaMatrix {
    type Error = EngineError;

    fn try_from(
        rows: BTreeMap<CountryCode, BTreeMap<CountryCode, VisaMatrixEntry>>,
    ) -> Result<Self, Self::Error> {
        if let Some((passport, _)) = rows.iter().find(|(p, row)| row.contains_key(*p)) {
            return Err(EngineError::SelfPair(passport.clone()));
        }
        Ok(Self { rows })
    }
}

impl From<VisaMatrix> for BTreeMap<CountryCode, BTreeMap<CountryCode, VisaMatrixEntry>> {
    fn from(matrix: VisaMatrix) -> Self {
        matrix.rows
    }
}

impl VisaMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the entry for a pair.
    ///
    /// # Errors
    ///
    /// [`EngineError::SelfPair`] when `passport == destination`.
    pub fn insert(
        &mut self,
        passport: CountryCode,
        destination: CountryCode,
        entry: VisaMatrixEntry,
    ) -> EngineResult<Option<VisaMatrixEntry>> {
        if passport == destination {
            return Err(EngineError::SelfPair(passport));
        }
        Ok(self.rows.entry(passport).or_default().insert(destination, entry))
    }

    pub fn get(&self, passport: &CountryCode, destination: &CountryCode) -> Option<&VisaMatrixEntry> {
        self.rows.get(passport).and_then(|row| row.get(destination))
    }

    /// Passports with at least one entry.
    pub fn passports(&self) -> BTreeSet<CountryCode> {
        self.rows
            .iter()
            .filter(|(_, row)| !row.is_empty())
            .map(|(p, _)| p.clone())
            .collect()
    }

    /// Every code mentioned as passport or destination.
    pub fn codes(&self) -> BTreeSet<CountryCode> {
        let mut codes = BTreeSet::new();
        for (passport, row) in &self.rows {
            codes.insert(passport.clone());
            codes.extend(row.keys().cloned());
        }
        codes
    }

    /// Total number of stored entries.
    pub fn len(&self) -> usize {
        self.rows.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ---------------------------------------------------------------------------
// MatrixDocument
// ---------------------------------------------------------------------------

/// The on-disk form of a generated matrix, as written by the dataset pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatrixDocument {
    /// When the document was generated (RFC 3339).
    pub generated_at: String,
    /// SHA-256 hex digest of the source dataset bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_digest: Option<String>,
    /// Passports with at least one successfully parsed row.
    pub passports: Vec<CountryCode>,
    pub matrix: VisaMatrix,
}

// ---------------------------------------------------------------------------
// Built-in tables
// ---------------------------------------------------------------------------

/// The embedded country catalogue, with flags filled in.
pub fn builtin_countries() -> EngineResult<Vec<Country>> {
    let countries: Vec<Country> = serde_json::from_str(BUILTIN_COUNTRIES_JSON)?;
    Ok(countries.into_iter().map(Country::with_default_flag).collect())
}

const SCHENGEN_MEMBERS: &[&str] = &[
    "AT", "BE", "BG", "CH", "CZ", "DE", "DK", "EE", "ES", "FI", "FR", "GR", "HR", "HU", "IS", "IT",
    "LI", "LT", "LU", "LV", "MT", "NL", "NO", "PL", "PT", "RO", "SE", "SI", "SK",
    // Third countries admitting Schengen visa holders.
    "AL", "BA", "CO", "CR", "CY", "DO", "GE", "MD", "ME", "MK", "MX", "PA", "RS",
];

const US_VISA_MEMBERS: &[&str] = &[
    "US", "AL", "BZ", "CO", "CR", "DO", "GE", "GT", "HN", "ME", "MX", "PA", "PE", "RS", "SV",
];

const UK_VISA_MEMBERS: &[&str] = &[
    "GB", "AL", "BA", "CR", "DO", "GE", "ME", "MX", "PA", "PE", "RS",
];

const CANADA_VISA_MEMBERS: &[&str] = &["CA", "CR", "DO", "MX", "PA", "PE"];

fn builtin_group(id: &str, label: &str, anchor: &str, members: &[&str]) -> EngineResult<PowerGroup> {
    let members = members
        .iter()
        .map(|c| CountryCode::new(*c))
        .collect::<Result<BTreeSet<_>, _>>()?;
    Ok(PowerGroup::new(
        GroupId::new(id)?,
        label,
        CountryCode::new(anchor)?,
        members,
    )?)
}

/// The power groups shipped with the engine.
pub fn builtin_power_groups() -> EngineResult<Vec<PowerGroup>> {
    Ok(vec![
        builtin_group("SCHENGEN_VISA", "Schengen visa", "FR", SCHENGEN_MEMBERS)?,
        builtin_group("US_VISA", "US visa", "US", US_VISA_MEMBERS)?,
        builtin_group("UK_VISA", "UK visa", "GB", UK_VISA_MEMBERS)?,
        builtin_group("CANADA_VISA", "Canadian visa", "CA", CANADA_VISA_MEMBERS)?,
    ])
}

// ---------------------------------------------------------------------------
// File loading
// ---------------------------------------------------------------------------

fn read_json<T: DeserializeOwned>(path: &Path) -> EngineResult<T> {
    let bytes = std::fs::read(path).map_err(|source| EngineError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| EngineError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a country-definitions file (a JSON array of country records).
pub fn load_countries(path: &Path) -> EngineResult<Vec<Country>> {
    let countries: Vec<Country> = read_json(path)?;
    tracing::debug!(path = %path.display(), count = countries.len(), "loaded countries");
    Ok(countries.into_iter().map(Country::with_default_flag).collect())
}

/// Load a generated matrix document.
pub fn load_matrix_document(path: &Path) -> EngineResult<MatrixDocument> {
    let doc: MatrixDocument = read_json(path)?;
    tracing::debug!(
        path = %path.display(),
        passports = doc.passports.len(),
        entries = doc.matrix.len(),
        "loaded visa matrix"
    );
    Ok(doc)
}

/// Load power-group definitions (a JSON array of groups).
pub fn load_power_groups(path: &Path) -> EngineResult<Vec<PowerGroup>> {
    read_json(path)
}

// ---------------------------------------------------------------------------
// ReferenceData
// ---------------------------------------------------------------------------

/// The immutable tables every resolution reads from.
#[derive(Debug, Clone)]
pub struct ReferenceData {
    countries: BTreeMap<CountryCode, Country>,
    matrix: VisaMatrix,
    groups: Vec<PowerGroup>,
}

impl ReferenceData {
    /// Assemble and validate the reference tables.
    ///
    /// # Errors
    ///
    /// [`EngineError::DuplicateCountry`] or [`EngineError::DuplicateGroup`]
    /// when an identifier repeats.
    pub fn new(
        countries: Vec<Country>,
        matrix: VisaMatrix,
        groups: Vec<PowerGroup>,
    ) -> EngineResult<Self> {
        let mut table = BTreeMap::new();
        for country in countries {
            let code = country.code.clone();
            if table.insert(code.clone(), country).is_some() {
                return Err(EngineError::DuplicateCountry(code));
            }
        }

        let mut seen = BTreeSet::new();
        for group in &groups {
            if !seen.insert(group.id().clone()) {
                return Err(EngineError::DuplicateGroup(group.id().to_string()));
            }
        }

        if !table.is_empty() {
            for code in matrix.codes() {
                if !table.contains_key(&code) {
                    tracing::warn!(code = %code, "visa matrix references a code missing from the country table");
                }
            }
        }

        Ok(Self {
            countries: table,
            matrix,
            groups,
        })
    }

    /// Load countries and matrix from disk; groups from disk when a path is
    /// given, otherwise the built-in set.
    pub fn load(
        countries_path: &Path,
        matrix_path: &Path,
        groups_path: Option<&Path>,
    ) -> EngineResult<Self> {
        let countries = load_countries(countries_path)?;
        let doc = load_matrix_document(matrix_path)?;
        let groups = match groups_path {
            Some(path) => load_power_groups(path)?,
            None => builtin_power_groups()?,
        };
        Self::new(countries, doc.matrix, groups)
    }

    /// Built-in countries and groups around a caller-supplied matrix.
    pub fn with_builtin_tables(matrix: VisaMatrix) -> EngineResult<Self> {
        Self::new(builtin_countries()?, matrix, builtin_power_groups()?)
    }

    pub fn country(&self, code: &CountryCode) -> Option<&Country> {
        self.countries.get(code)
    }

    pub fn countries(&self) -> impl Iterator<Item = &Country> {
        self.countries.values()
    }

    pub fn matrix(&self) -> &VisaMatrix {
        &self.matrix
    }

    pub fn groups(&self) -> &[PowerGroup] {
        &self.groups
    }

    /// Passports with a matrix row; the default statistics universe.
    pub fn passport_universe(&self) -> BTreeSet<CountryCode> {
        self.matrix.passports()
    }

    pub(crate) fn set_passport_ranking(&mut self, code: &CountryCode, rank: u32, visa_free: u32) {
        if let Some(country) = self.countries.get_mut(code) {
            country.passport_rank = Some(rank);
            country.visa_free_destinations_count = Some(visa_free);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pp_core::{Continent, Requirement};

    fn code(s: &str) -> CountryCode {
        CountryCode::new(s).unwrap()
    }

    #[test]
    fn builtin_countries_parse_and_are_unique() {
        let countries = builtin_countries().unwrap();
        assert!(countries.len() > 190);
        let unique: BTreeSet<_> = countries.iter().map(|c| c.code.clone()).collect();
        assert_eq!(unique.len(), countries.len());
        assert!(countries.iter().all(|c| !c.flag.is_empty()));
    }

    #[test]
    fn builtin_groups_are_valid() {
        let groups = builtin_power_groups().unwrap();
        assert_eq!(groups.len(), 4);
        let schengen = groups.iter().find(|g| g.id().as_str() == "SCHENGEN_VISA").unwrap();
        assert!(schengen.contains(&code("FR")));
        assert!(schengen.contains(&code("DE")));
        assert!(schengen.contains(&code("AL")));
    }

    #[test]
    fn builtin_group_members_exist_in_country_table() {
        let data = ReferenceData::with_builtin_tables(VisaMatrix::new()).unwrap();
        for group in data.groups() {
            for member in group.members() {
                assert!(data.country(member).is_some(), "{member} in {} has no country", group.id());
            }
        }
    }

    #[test]
    fn matrix_insert_rejects_self_pair() {
        let mut matrix = VisaMatrix::new();
        let err = matrix.insert(code("DE"), code("DE"), VisaMatrixEntry::new(Requirement::VisaFree));
        assert!(matches!(err, Err(EngineError::SelfPair(_))));
        assert!(matrix.is_empty());
    }

    #[test]
    fn matrix_deserialize_rejects_self_pair() {
        let json = r#"{"DE":{"DE":{"requirement":"visa-free"}}}"#;
        assert!(serde_json::from_str::<VisaMatrix>(json).is_err());

        let json = r#"{"DE":{"FR":{"requirement":"visa-free","duration_days":90}}}"#;
        let matrix: VisaMatrix = serde_json::from_str(json).unwrap();
        assert_eq!(matrix.get(&code("DE"), &code("FR")).unwrap().duration_days, Some(90));
    }

    #[test]
    fn passports_excludes_empty_rows() {
        let mut matrix = VisaMatrix::new();
        matrix
            .insert(code("DE"), code("FR"), VisaMatrixEntry::new(Requirement::VisaFree))
            .unwrap();
        let json = serde_json::to_value(&matrix).unwrap();
        let mut raw: BTreeMap<CountryCode, BTreeMap<CountryCode, VisaMatrixEntry>> =
            serde_json::from_value(json).unwrap();
        raw.insert(code("XK"), BTreeMap::new());
        let matrix = VisaMatrix::try_from(raw).unwrap();
        assert_eq!(matrix.passports(), [code("DE")].into_iter().collect());
        assert_eq!(matrix.len(), 1);
    }

    #[test]
    fn duplicate_country_rejected() {
        let c = Country::new(code("FR"), "France", Continent::Europe);
        let err = ReferenceData::new(vec![c.clone(), c], VisaMatrix::new(), Vec::new());
        assert!(matches!(err, Err(EngineError::DuplicateCountry(_))));
    }

    #[test]
    fn load_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let countries = dir.path().join("countries.json");
        let matrix = dir.path().join("matrix.json");
        std::fs::write(
            &countries,
            r#"[{"code":"DE","name":"Germany","continent":"Europe"},
                {"code":"FR","name":"France","continent":"Europe"}]"#,
        )
        .unwrap();
        std::fs::write(
            &matrix,
            r#"{"generated_at":"2026-01-01T00:00:00+00:00","passports":["DE"],
                "matrix":{"DE":{"FR":{"requirement":"visa-free"}}}}"#,
        )
        .unwrap();

        let data = ReferenceData::load(&countries, &matrix, None).unwrap();
        assert_eq!(data.countries().count(), 2);
        assert_eq!(data.passport_universe().len(), 1);
        assert_eq!(data.groups().len(), 4);
    }

    #[test]
    fn load_missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        let err = load_countries(&missing).unwrap_err();
        assert!(err.to_string().contains("nope.json"));
    }
}
