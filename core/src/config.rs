//! Run configuration threaded through codecs, validator and pipeline

use crate::error::{OntologyError, Result};
use crate::types::Root;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration of one conversion run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// Ontology root metadata
    pub root: RootConfig,

    /// Identity written as `saved-by` in OBO headers
    pub user: Option<String>,

    /// Restrict variables to this institution
    pub institution: Option<String>,

    /// Skip required-field and uniqueness checks
    pub force: bool,

    /// Output locations
    pub output: OutputConfig,

    /// OBO header settings
    pub obo: OboConfig,

    /// Remote dictionary retrieval
    pub fetch: FetchConfig,

    /// Workbook presentation
    pub workbook: WorkbookConfig,
}

/// Root record supplied on the command line or in the config file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RootConfig {
    /// Ontology root id, e.g. `CO_360`
    pub id: Option<String>,
    /// Display name of the ontology
    pub name: Option<String>,
    /// Default OBO namespace
    pub namespace: Option<String>,
}

impl RootConfig {
    /// Overlay the configured values onto `root`, keeping its values where
    /// nothing is configured
    #[must_use]
    pub fn apply(&self, mut root: Root) -> Root {
        if let Some(id) = &self.id {
            root.id.clone_from(id);
        }
        if let Some(name) = &self.name {
            root.name.clone_from(name);
        }
        if let Some(namespace) = &self.namespace {
            root.namespace.clone_from(namespace);
        }
        if root.namespace.is_empty() && !root.id.is_empty() {
            root.namespace = root.id.clone();
        }
        root
    }
}

/// Output file locations
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub workbook: Option<PathBuf>,
    pub dictionary: Option<PathBuf>,
    pub obo: Option<PathBuf>,
}

/// OBO header settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OboConfig {
    /// `auto-generated-by` value
    pub generator: String,
    /// Free-text `remark`
    pub remark: Option<String>,
}

impl Default for OboConfig {
    fn default() -> Self {
        Self {
            generator: format!("trait-ontology {}", env!("CARGO_PKG_VERSION")),
            remark: None,
        }
    }
}

/// Remote Trait Dictionary retrieval settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// URL with an `{id}` placeholder for the ontology root id
    pub url_template: String,

    /// Request timeout
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            url_template: "https://cropontology.org/ontology/{id}/TD".to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

/// Workbook presentation switches
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkbookConfig {
    /// Colour duplicate and dangling cells
    pub highlight: bool,
    /// Freeze the header row
    pub freeze_headers: bool,
    /// Add an autofilter over each table
    pub autofilter: bool,
}

impl Default for WorkbookConfig {
    fn default() -> Self {
        Self {
            highlight: true,
            freeze_headers: true,
            autofilter: false,
        }
    }
}

impl ConverterConfig {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML for
    /// this structure.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            OntologyError::config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&text)
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML for this structure.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Root id, required by every command that emits identifiers
    ///
    /// # Errors
    ///
    /// Returns `MissingInput` when no root id is configured.
    pub fn require_root_id(&self) -> Result<&str> {
        self.root
            .id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| OntologyError::missing_input("ontology root id"))
    }
}
