//! # pp-cli: the `ppower` command
//!
//! ## Subcommands
//!
//! - `ppower generate`: CSV dataset to `visa_matrix.json`.
//! - `ppower country | lookup | resolve | stats | groups | leaderboard`:
//!   read-only queries against the loaded engine.
//! - `ppower profile`: maintain a traveler profile file.
//!
//! ```bash
//! ppower generate
//! ppower resolve XK FR --held US
//! ppower resolve XK --all --profile me.json
//! ppower stats IN --profile me.json --format json
//! ppower profile me.json toggle-visa US
//! ```

pub mod config;
pub mod generate;
pub mod profile;
pub mod query;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ValueEnum;

use pp_core::CountryCode;

/// Output format for query commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// Resolve a path that may be relative to the repository root.
///
/// Absolute paths are returned as-is. A relative path is taken from the
/// repository root when it exists there, otherwise from the current
/// directory.
pub fn resolve_path(path: &Path, repo_root: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    let repo_relative = repo_root.join(path);
    if repo_relative.exists() {
        repo_relative
    } else {
        path.to_path_buf()
    }
}

/// Parse a country code given on the command line.
pub fn parse_code(raw: &str) -> Result<CountryCode> {
    CountryCode::new(raw).with_context(|| format!("invalid country code '{raw}'"))
}

/// Print a value as pretty JSON on stdout.
pub(crate) fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_path_absolute_path_returned_as_is() {
        let result = resolve_path(Path::new("/abs/visa_matrix.json"), Path::new("/some/repo"));
        assert_eq!(result, PathBuf::from("/abs/visa_matrix.json"));
    }

    #[test]
    fn resolve_path_prefers_repo_root_when_present() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("me.json"), b"{}").unwrap();
        let result = resolve_path(Path::new("me.json"), dir.path());
        assert_eq!(result, dir.path().join("me.json"));
    }

    #[test]
    fn resolve_path_falls_back_to_cwd_relative() {
        let dir = tempfile::tempdir().unwrap();
        let result = resolve_path(Path::new("missing.json"), dir.path());
        assert_eq!(result, PathBuf::from("missing.json"));
    }

    #[test]
    fn parse_code_normalizes_case() {
        assert_eq!(parse_code("fr").unwrap().as_str(), "FR");
    }

    #[test]
    fn parse_code_rejects_garbage() {
        let err = parse_code("FRA").unwrap_err();
        assert!(format!("{err:#}").contains("FRA"));
    }
}
