//! Validated, immutable snapshots
//!
//! A [`Snapshot`] is only built from rows that passed
//! [`crate::rules::validation::validate_snapshot`], so ids are unique and
//! every lookup index is well formed.

pub mod loader;

use crate::config::ReconcileConfig;
use crate::model::{SnapshotSchema, TaxonomyNode};
use crate::resolve::ParentResolver;
use std::collections::{BTreeMap, BTreeSet};

pub use loader::{parse_snapshot_bytes, read_snapshot, RawSnapshot};

#[derive(Debug, Clone)]
pub struct Snapshot {
    path: String,
    schema: SnapshotSchema,
    digest: String,
    nodes: BTreeMap<String, TaxonomyNode>,
    /// Ids whose status is not the published status
    excluded: BTreeSet<String>,
    resolver: ParentResolver,
}

impl Snapshot {
    /// Build from validated rows
    ///
    /// Every row stays addressable (an unpublished row is still a current
    /// record), but unpublished rows are left out of [`Snapshot::working_ids`].
    pub fn from_validated(raw: RawSnapshot, config: &ReconcileConfig) -> Self {
        let resolver = ParentResolver::build(&raw.rows);
        let excluded = raw
            .rows
            .iter()
            .filter(|n| n.status != config.published_status)
            .map(|n| n.internal_id.clone())
            .collect();
        let nodes = raw
            .rows
            .into_iter()
            .map(|n| (n.internal_id.clone(), n))
            .collect();
        Self {
            path: raw.path,
            schema: raw.schema,
            digest: raw.digest,
            nodes,
            excluded,
            resolver,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn schema(&self) -> SnapshotSchema {
        self.schema
    }

    pub fn digest(&self) -> &str {
        &self.digest
    }

    pub fn get(&self, internal_id: &str) -> Option<&TaxonomyNode> {
        self.nodes.get(internal_id)
    }

    /// Every row, keyed by internal id
    pub fn nodes(&self) -> &BTreeMap<String, TaxonomyNode> {
        &self.nodes
    }

    /// Every internal id present in the file
    pub fn all_ids(&self) -> BTreeSet<&str> {
        self.nodes.keys().map(String::as_str).collect()
    }

    /// Ids taking part in reconciliation
    pub fn working_ids(&self) -> BTreeSet<&str> {
        self.nodes
            .keys()
            .filter(|id| !self.excluded.contains(*id))
            .map(String::as_str)
            .collect()
    }

    /// Rows dropped from reconciliation, in id order
    pub fn excluded_nodes(&self) -> impl Iterator<Item = &TaxonomyNode> {
        self.excluded.iter().filter_map(|id| self.nodes.get(id))
    }

    /// The validated working set handed on once changes are accepted
    pub fn working_nodes(&self) -> impl Iterator<Item = &TaxonomyNode> {
        self.nodes
            .values()
            .filter(|n| !self.excluded.contains(&n.internal_id))
    }

    pub fn resolver(&self) -> &ParentResolver {
        &self.resolver
    }
}
