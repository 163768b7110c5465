//! Change report output types.
//!
//! All types implement `Debug, Clone, Serialize, Deserialize, PartialEq`.
//! Every list is in internal id order so serialization is deterministic.

use serde::{Deserialize, Serialize};

use crate::model::{SnapshotSchema, TaxonomyNode};

/// What a curator confirms before the modified snapshot is accepted
///
/// `report_schema_version` is always 1 for this implementation. Sections are
/// present even when empty.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChangeReport {
    pub report_schema_version: u32,
    pub identity: ReportIdentity,
    /// Unpublished rows left out of reconciliation
    pub excluded: Vec<ExcludedNode>,
    pub removed: Vec<NodeSummary>,
    pub added: Vec<AddedNode>,
    pub identity_candidates: Vec<IdentityCandidateEntry>,
    pub precursors: Vec<LineageEntry>,
    pub revocations: Vec<LineageEntry>,
    pub code_changes: Vec<CodeChangeEntry>,
    pub parent_changes: Vec<ParentChangeEntry>,
}

impl ChangeReport {
    /// Whether nothing at all differs between the two snapshots
    pub fn is_unchanged(&self) -> bool {
        self.removed.is_empty()
            && self.added.is_empty()
            && self.identity_candidates.is_empty()
            && self.precursors.is_empty()
            && self.revocations.is_empty()
            && self.code_changes.is_empty()
            && self.parent_changes.is_empty()
    }
}

/// Paths and SHA-256 digests of both input files
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReportIdentity {
    pub original_path: String,
    pub original_digest: String,
    pub modified_path: String,
    pub modified_digest: String,
}

/// The three values a curator recognises a node by
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct NodeSummary {
    pub internal_id: String,
    pub oncotree_code: String,
    pub label: String,
}

impl From<&TaxonomyNode> for NodeSummary {
    fn from(node: &TaxonomyNode) -> Self {
        Self {
            internal_id: node.internal_id.clone(),
            oncotree_code: node.oncotree_code.clone(),
            label: node.label.clone(),
        }
    }
}

impl std::fmt::Display for NodeSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} ({})", self.internal_id, self.label, self.oncotree_code)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExcludedNode {
    pub snapshot: SnapshotSchema,
    pub node: NodeSummary,
    pub status: String,
}

/// A new node and the parent it resolved to (none for a new root)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AddedNode {
    pub node: NodeSummary,
    pub parent: Option<NodeSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IdentityCandidateEntry {
    pub removed: NodeSummary,
    pub added: NodeSummary,
}

/// One `retired id -> successor` edge of a precursor or revocation
///
/// The retired id is no longer a row, so its code comes from the reference
/// table and may be `unknown`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LineageEntry {
    pub source_id: String,
    pub source_code: String,
    pub successor: NodeSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CodeChangeEntry {
    pub original: NodeSummary,
    pub modified: NodeSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParentChangeEntry {
    pub original: NodeSummary,
    pub original_parent_code: String,
    pub modified: NodeSummary,
    pub modified_parent_code: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_summary_display_uses_pretty_label_form() {
        let node = TaxonomyNode {
            internal_id: "ONC2".to_string(),
            oncotree_code: "BREAST".to_string(),
            label: "Breast".to_string(),
            ..Default::default()
        };
        let summary = NodeSummary::from(&node);
        assert_eq!(summary.to_string(), node.pretty_label());
    }
}
