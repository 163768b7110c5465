use crate::errors::{ReconcileError, Result};
use crate::lineage::{Lineage, LineageIndex};
use crate::mapping::CodeMapping;
use crate::model::TaxonomyNode;
use crate::reconcile::ChangeSet;
use crate::snapshot::Snapshot;

use super::model::{
    AddedNode, ChangeReport, CodeChangeEntry, ExcludedNode, IdentityCandidateEntry, LineageEntry,
    NodeSummary, ParentChangeEntry, ReportIdentity,
};

pub const REPORT_SCHEMA_VERSION: u32 = 1;

/// Assemble the read-only report from reconciliation results
///
/// # Errors
/// `CodeNotFoundForId` if an id in `changes` or `lineage` is not a row of the
/// snapshot it was derived from.
pub fn build_report(
    original: &Snapshot,
    modified: &Snapshot,
    changes: &ChangeSet,
    lineage: &Lineage,
    mapping: &CodeMapping,
) -> Result<ChangeReport> {
    let excluded = original
        .excluded_nodes()
        .map(|n| (original, n))
        .chain(modified.excluded_nodes().map(|n| (modified, n)))
        .map(|(snapshot, node)| ExcludedNode {
            snapshot: snapshot.schema(),
            node: node.into(),
            status: node.status.clone(),
        })
        .collect();

    let removed = changes
        .removed
        .iter()
        .map(|id| summary(original, id))
        .collect::<Result<Vec<_>>>()?;

    let added = changes
        .added
        .iter()
        .map(|id| {
            let parent = match changes.added_parents.get(id) {
                Some(parent_id) => Some(summary(modified, parent_id)?),
                None => None,
            };
            Ok(AddedNode {
                node: summary(modified, id)?,
                parent,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let identity_candidates = changes
        .identity_candidates
        .iter()
        .map(|c| {
            Ok(IdentityCandidateEntry {
                removed: summary(original, &c.removed_id)?,
                added: summary(modified, &c.added_id)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let code_changes = changes
        .code_changes
        .iter()
        .map(|c| {
            Ok(CodeChangeEntry {
                original: summary(original, &c.internal_id)?,
                modified: summary(modified, &c.internal_id)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let parent_changes = changes
        .parent_changes
        .iter()
        .map(|c| {
            Ok(ParentChangeEntry {
                original: summary(original, &c.internal_id)?,
                original_parent_code: c.original_parent_code.clone(),
                modified: summary(modified, &c.internal_id)?,
                modified_parent_code: c.modified_parent_code.clone(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ChangeReport {
        report_schema_version: REPORT_SCHEMA_VERSION,
        identity: ReportIdentity {
            original_path: original.path().to_string(),
            original_digest: original.digest().to_string(),
            modified_path: modified.path().to_string(),
            modified_digest: modified.digest().to_string(),
        },
        excluded,
        removed,
        added,
        identity_candidates,
        precursors: lineage_entries(modified, &lineage.precursors, mapping)?,
        revocations: lineage_entries(modified, &lineage.revocations, mapping)?,
        code_changes,
        parent_changes,
    })
}

fn lineage_entries(
    modified: &Snapshot,
    index: &LineageIndex,
    mapping: &CodeMapping,
) -> Result<Vec<LineageEntry>> {
    let mut entries = Vec::new();
    for (source_id, successors) in index {
        for successor_id in successors {
            entries.push(LineageEntry {
                source_id: source_id.clone(),
                source_code: mapping.code_for(source_id).to_string(),
                successor: summary(modified, successor_id)?,
            });
        }
    }
    Ok(entries)
}

fn summary(snapshot: &Snapshot, id: &str) -> Result<NodeSummary> {
    snapshot
        .get(id)
        .map(|n: &TaxonomyNode| NodeSummary::from(n))
        .ok_or_else(|| ReconcileError::CodeNotFoundForId {
            internal_id: id.to_string(),
        })
}
