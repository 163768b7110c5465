//! Code mapping sources backed by the network or a local file

use oncotree_core::errors::{ReconcileError, Result};
use oncotree_core::mapping::{parse_code_mapping, CodeMapping, CodeMappingSource};
use std::path::PathBuf;

/// GET the mapping table; anything but a 200 response is fatal
pub struct HttpCodeMappingSource {
    url: String,
    predicate: String,
}

impl HttpCodeMappingSource {
    pub fn new(url: String, predicate: String) -> Self {
        Self { url, predicate }
    }
}

impl CodeMappingSource for HttpCodeMappingSource {
    fn fetch(&self) -> Result<CodeMapping> {
        let fetch_error = |reason: String| ReconcileError::MappingFetch {
            source_name: self.url.clone(),
            reason,
        };
        let response = reqwest::blocking::get(&self.url).map_err(|e| fetch_error(e.to_string()))?;
        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(ReconcileError::MappingStatus {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }
        let text = response.text().map_err(|e| fetch_error(e.to_string()))?;
        tracing::debug!(url = %self.url, bytes = text.len(), "Downloaded code mapping");
        Ok(parse_code_mapping(&text, &self.predicate))
    }
}

/// Read the mapping table from disk, for offline runs
pub struct FileCodeMappingSource {
    path: PathBuf,
    predicate: String,
}

impl FileCodeMappingSource {
    pub fn new(path: PathBuf, predicate: String) -> Self {
        Self { path, predicate }
    }
}

impl CodeMappingSource for FileCodeMappingSource {
    fn fetch(&self) -> Result<CodeMapping> {
        let text =
            std::fs::read_to_string(&self.path).map_err(|e| ReconcileError::MappingFetch {
                source_name: self.path.display().to_string(),
                reason: e.to_string(),
            })?;
        Ok(parse_code_mapping(&text, &self.predicate))
    }
}
