//! # CLI Configuration
//!
//! Optional `ppower.yaml` naming the input and output files. Every field has
//! a default, so an absent file is the same as an empty one. Relative paths
//! are anchored at the repository root.
//!
//! ```yaml
//! countries: data/countries.json
//! dataset: data/passport-index.csv
//! matrix: data/visa_matrix.json
//! groups: data/power_groups.json   # omit for the built-in groups
//! profile: me.json                 # default profile for held visas
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use pp_engine::{ReferenceData, VisaEngine};

/// Looked up in the repository root when `--config` is not given.
pub const CONFIG_FILE_NAME: &str = "ppower.yaml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Country reference table (JSON).
    pub countries: PathBuf,
    /// Passport-index CSV read by `generate`.
    pub dataset: PathBuf,
    /// Generated matrix document.
    pub matrix: PathBuf,
    /// Power-group definitions; built-in groups when absent.
    pub groups: Option<PathBuf>,
    /// Traveler profile supplying held visas to queries.
    pub profile: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            countries: PathBuf::from("data/countries.json"),
            dataset: PathBuf::from("data/passport-index.csv"),
            matrix: PathBuf::from("data/visa_matrix.json"),
            groups: None,
            profile: None,
        }
    }
}

impl Config {
    pub fn from_yaml(content: &str) -> Result<Self> {
        // An empty document parses as null rather than an empty mapping.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).context("parsing ppower configuration YAML")
    }

    /// Load the configuration for this invocation.
    ///
    /// An explicit path must exist. Without one, `ppower.yaml` in the
    /// repository root is used when present, otherwise the defaults.
    pub fn load(explicit: Option<&Path>, repo_root: &Path) -> Result<Self> {
        let path = match explicit {
            Some(path) => Some(crate::resolve_path(path, repo_root)),
            None => Some(repo_root.join(CONFIG_FILE_NAME)).filter(|p| p.is_file()),
        };
        let config = match path {
            Some(path) => {
                let content = std::fs::read_to_string(&path)
                    .with_context(|| format!("reading configuration: {}", path.display()))?;
                tracing::debug!(path = %path.display(), "loaded configuration");
                Self::from_yaml(&content)?
            }
            None => Self::default(),
        };
        Ok(config.anchored(repo_root))
    }

    /// Join every relative path onto `repo_root`.
    pub fn anchored(self, repo_root: &Path) -> Self {
        Self {
            countries: repo_root.join(self.countries),
            dataset: repo_root.join(self.dataset),
            matrix: repo_root.join(self.matrix),
            groups: self.groups.map(|p| repo_root.join(p)),
            profile: self.profile.map(|p| repo_root.join(p)),
        }
    }

    /// Load reference data and build the engine.
    pub fn load_engine(&self) -> Result<VisaEngine> {
        let data = ReferenceData::load(&self.countries, &self.matrix, self.groups.as_deref())
            .with_context(|| {
                format!(
                    "loading reference data (countries: {}, matrix: {}); run `ppower generate` first if the matrix is missing",
                    self.countries.display(),
                    self.matrix.display()
                )
            })?;
        Ok(VisaEngine::new(data))
    }
}
