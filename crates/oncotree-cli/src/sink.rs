//! JSON hand-off of accepted snapshots

use oncotree_core::errors::{ReconcileError, Result};
use oncotree_core::report::ChangeReport;
use oncotree_core::{AcceptedSink, Snapshot, TaxonomyNode};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Serialize)]
struct AcceptedDocument<'a> {
    source: &'a str,
    digest: &'a str,
    nodes: Vec<&'a TaxonomyNode>,
}

/// Writes the accepted working nodes as a JSON document
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl AcceptedSink for JsonFileSink {
    fn accept(&self, modified: &Snapshot, _: &ChangeReport) -> Result<()> {
        let document = AcceptedDocument {
            source: modified.path(),
            digest: modified.digest(),
            nodes: modified.working_nodes().collect(),
        };
        let json = serde_json::to_string_pretty(&document).map_err(|e| ReconcileError::Sink {
            reason: e.to_string(),
        })?;
        std::fs::write(&self.path, json).map_err(|e| ReconcileError::Sink {
            reason: format!("{}: {}", self.path.display(), e),
        })?;
        tracing::info!(
            path = %self.path.display(),
            node_count = document.nodes.len(),
            "Wrote accepted snapshot"
        );
        Ok(())
    }
}
