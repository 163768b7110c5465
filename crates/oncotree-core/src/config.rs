//! Reconciliation configuration
//!
//! Every field has a default matching the upstream OncoTree conventions, so
//! an empty TOML file (or no file at all) yields a working configuration.

use crate::errors::{ReconcileError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Upstream reference table of `subject hasCode object` triples
pub const DEFAULT_MAPPING_URL: &str = "https://raw.githubusercontent.com/cBioPortal/oncotree/refs/heads/master/resources/resource_uri_to_oncocode_mapping.txt";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileConfig {
    /// Oncotree code of the taxonomy root
    pub root_code: String,
    /// Only rows with this status take part in reconciliation
    pub published_status: String,
    /// Predicate token selecting rows of the code mapping table
    pub has_code_predicate: String,
    /// Where the code mapping table is fetched from
    pub mapping_url: String,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            root_code: "TISSUE".to_string(),
            published_status: "Published".to_string(),
            has_code_predicate: "hasCode".to_string(),
            mapping_url: DEFAULT_MAPPING_URL.to_string(),
        }
    }
}

impl ReconcileConfig {
    /// Parse a configuration from TOML text
    ///
    /// # Errors
    /// Returns `Config` if the text is not valid TOML for this structure.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|e| ReconcileError::Config {
            reason: e.to_string(),
        })?;
        if config.root_code.trim().is_empty() {
            return Err(ReconcileError::Config {
                reason: "root_code must not be empty".to_string(),
            });
        }
        Ok(config)
    }

    /// Load a configuration file
    ///
    /// # Errors
    /// Returns `Io` if the file cannot be read, `Config` if it does not parse.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| ReconcileError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&text)
    }
}
