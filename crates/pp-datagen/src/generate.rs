//! # Matrix Generation
//!
//! Reads the passport-index CSV (header row of destination names, one row
//! per passport) and produces the bilateral [`VisaMatrix`].
//!
//! No single row, column, or cell can fail the batch. Unresolvable names
//! are skipped with a warning, unparseable cells are left out so the pair
//! reads as unknown, and self-pairs are never written. Everything skipped
//! is tallied in the [`GenerationReport`].

use std::collections::BTreeSet;
use std::ffi::OsString;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};

use pp_core::CountryCode;
use pp_engine::{MatrixDocument, VisaMatrix};

use crate::cell::parse_cell;
use crate::error::{DatagenError, DatagenResult};
use crate::names::CountryNameIndex;

/// Tally of one generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    /// Data rows read, excluding the header and blank rows.
    pub rows_read: usize,
    /// Passports that ended up with at least one entry.
    pub passports: usize,
    /// Header names that did not resolve to a code.
    pub skipped_columns: Vec<String>,
    /// Row names that did not resolve to a code, or rows the reader rejected.
    pub skipped_rows: Vec<String>,
    /// Cells under resolved columns that did not parse.
    pub skipped_cells: usize,
    /// Parsed cells dropped because passport and destination coincide.
    pub self_pairs_dropped: usize,
    /// Rows whose passport had already appeared; later values win.
    pub duplicate_rows: usize,
    /// Entries in the final matrix.
    pub entries_written: usize,
}

/// The matrix produced from one dataset, with its report.
#[derive(Debug, Clone)]
pub struct GeneratedMatrix {
    pub matrix: VisaMatrix,
    pub report: GenerationReport,
}

impl GeneratedMatrix {
    /// Passports with at least one successfully parsed entry, sorted.
    pub fn passports(&self) -> Vec<CountryCode> {
        self.matrix.passports().into_iter().collect()
    }

    pub fn into_document(self, generated_at: DateTime<Utc>, source_digest: Option<String>) -> MatrixDocument {
        MatrixDocument {
            generated_at: generated_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            source_digest,
            passports: self.passports(),
            matrix: self.matrix,
        }
    }
}

fn is_blank(record: &csv::StringRecord) -> bool {
    record.iter().all(|field| field.trim().is_empty())
}

/// Parse a dataset into a matrix.
///
/// # Errors
///
/// [`DatagenError::MissingHeader`] when the input has no rows at all, or
/// [`DatagenError::Csv`] when the header itself cannot be read.
pub fn generate_matrix<R: Read>(input: R, index: &CountryNameIndex) -> DatagenResult<GeneratedMatrix> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(input);
    let mut records = reader.records();

    let header = records.next().ok_or(DatagenError::MissingHeader)??;
    let mut report = GenerationReport::default();

    // Column 0 labels the passport names.
    let columns: Vec<Option<CountryCode>> = header
        .iter()
        .skip(1)
        .map(|name| {
            let code = index.resolve(name);
            if code.is_none() {
                tracing::warn!(column = name, "skipping unmapped destination column");
                report.skipped_columns.push(name.to_string());
            }
            code
        })
        .collect();

    let mut matrix = VisaMatrix::new();
    let mut seen: BTreeSet<CountryCode> = BTreeSet::new();

    for (line, result) in records.enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(line = line + 2, error = %e, "skipping unreadable row");
                report.skipped_rows.push(format!("line {}", line + 2));
                continue;
            }
        };
        if is_blank(&record) {
            continue;
        }
        report.rows_read += 1;

        let name = record.get(0).unwrap_or_default();
        let Some(passport) = index.resolve(name) else {
            tracing::warn!(row = name, "skipping unmapped passport row");
            report.skipped_rows.push(name.to_string());
            continue;
        };
        if !seen.insert(passport.clone()) {
            tracing::debug!(passport = %passport, "passport row repeats; merging");
            report.duplicate_rows += 1;
        }

        for (cell, destination) in record.iter().skip(1).zip(&columns) {
            let Some(destination) = destination else {
                continue;
            };
            let Some(entry) = parse_cell(cell) else {
                if destination != &passport {
                    report.skipped_cells += 1;
                }
                continue;
            };
            if destination == &passport {
                report.self_pairs_dropped += 1;
                continue;
            }
            matrix.insert(passport.clone(), destination.clone(), entry)?;
        }
    }

    report.passports = matrix.passports().len();
    report.entries_written = matrix.len();
    Ok(GeneratedMatrix { matrix, report })
}

/// Lower-case hex SHA-256 of `bytes`.
pub fn sha256_hex(bytes: &[u8]) -> String {
    Sha256::digest(bytes).iter().map(|b| format!("{b:02x}")).collect()
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Write a document as pretty JSON, replacing `path` atomically.
///
/// The bytes land in a sibling `.tmp` file first and are renamed over the
/// target, so readers never observe a half-written matrix. If the rename
/// fails the temporary file is removed.
pub fn write_document(path: &Path, doc: &MatrixDocument) -> DatagenResult<()> {
    let io_err = |source| DatagenError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let mut bytes = serde_json::to_vec_pretty(doc)?;
    bytes.push(b'\n');
    let tmp = temp_sibling(path);
    fs::write(&tmp, &bytes).map_err(io_err)?;
    fs::rename(&tmp, path).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        io_err(e)
    })
}

/// Full batch: country table + dataset in, matrix document out.
pub fn run_pipeline(countries: &Path, dataset: &Path, output: &Path) -> DatagenResult<GenerationReport> {
    let table = pp_engine::load_countries(countries)?;
    let index = CountryNameIndex::new(&table)?;

    let bytes = fs::read(dataset).map_err(|source| DatagenError::Io {
        path: dataset.to_path_buf(),
        source,
    })?;
    let digest = sha256_hex(&bytes);
    let generated = generate_matrix(bytes.as_slice(), &index)?;
    let report = generated.report.clone();

    write_document(output, &generated.into_document(Utc::now(), Some(digest)))?;
    tracing::info!(
        output = %output.display(),
        passports = report.passports,
        entries = report.entries_written,
        skipped_rows = report.skipped_rows.len(),
        skipped_columns = report.skipped_columns.len(),
        "wrote visa matrix"
    );
    Ok(report)
}
