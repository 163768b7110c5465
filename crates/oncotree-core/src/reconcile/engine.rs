use std::collections::BTreeSet;
use std::time::Instant;

use crate::config::ReconcileConfig;
use crate::errors::{ReconcileError, Result};
use crate::model::TaxonomyNode;
use crate::snapshot::Snapshot;
use crate::{log_op_end, log_op_error, log_op_start};

use super::identity::is_identity_candidate;
use super::{ChangeSet, CodeChange, IdentityCandidate, ParentChange};

/// Reconcile two validated snapshots
///
/// Only working ids (published rows) take part. Added ids are checked before
/// retained ids, each in id order, and the first violation is returned.
///
/// # Errors
/// - `NewNodeHasResourceUri` for an added node that already claims a URI
/// - `ResourceUriMissing` / `ResourceUriChanged` for a retained node
/// - any parent resolution error while recording parents
pub fn reconcile(
    original: &Snapshot,
    modified: &Snapshot,
    config: &ReconcileConfig,
) -> Result<ChangeSet> {
    log_op_start!("reconcile");
    let start = Instant::now();
    match reconcile_impl(original, modified, config) {
        Ok(changes) => {
            log_op_end!(
                "reconcile",
                duration_ms = start.elapsed().as_millis() as u64,
                removed_count = changes.removed.len(),
                added_count = changes.added.len(),
                retained_count = changes.retained.len()
            );
            Ok(changes)
        }
        Err(e) => {
            log_op_error!(
                "reconcile",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            Err(e)
        }
    }
}

fn reconcile_impl(
    original: &Snapshot,
    modified: &Snapshot,
    config: &ReconcileConfig,
) -> Result<ChangeSet> {
    let original_ids = original.working_ids();
    let modified_ids = modified.working_ids();

    let mut changes = ChangeSet {
        removed: owned_ids(original_ids.difference(&modified_ids)),
        added: owned_ids(modified_ids.difference(&original_ids)),
        retained: owned_ids(original_ids.intersection(&modified_ids)),
        ..Default::default()
    };

    for id in &changes.added {
        let node = require(modified, id)?;
        if !node.resource_uri.is_empty() {
            return Err(ReconcileError::NewNodeHasResourceUri {
                internal_id: id.clone(),
                node: node.pretty_label(),
            });
        }
        if node.is_root(&config.root_code) {
            continue;
        }
        let parent_id = modified.resolver().resolve_parent_of(node)?;
        changes
            .added_parents
            .insert(id.clone(), parent_id.to_string());
    }

    for id in &changes.retained {
        let before = require(original, id)?;
        let after = require(modified, id)?;

        if before.resource_uri.is_empty() {
            return Err(ReconcileError::ResourceUriMissing {
                internal_id: id.clone(),
                node: before.pretty_label(),
            });
        }
        if before.resource_uri != after.resource_uri {
            return Err(ReconcileError::ResourceUriChanged {
                internal_id: id.clone(),
                node: after.pretty_label(),
                original: before.resource_uri.clone(),
                modified: after.resource_uri.clone(),
            });
        }

        if before.oncotree_code != after.oncotree_code {
            changes.code_changes.push(CodeChange {
                internal_id: id.clone(),
                original_code: before.oncotree_code.clone(),
                modified_code: after.oncotree_code.clone(),
            });
        }

        if before.is_root(&config.root_code) || after.is_root(&config.root_code) {
            continue;
        }
        let original_parent_code = original_parent_code(original, modified, before)?;
        let modified_parent_code = modified_parent_code(modified, after)?;
        if original_parent_code != modified_parent_code {
            changes.parent_changes.push(ParentChange {
                internal_id: id.clone(),
                original_parent_code,
                modified_parent_code,
            });
        }
    }

    for removed_id in &changes.removed {
        let removed = require(original, removed_id)?;
        for added_id in &changes.added {
            let added = require(modified, added_id)?;
            if is_identity_candidate(removed, added) {
                changes.identity_candidates.push(IdentityCandidate {
                    removed_id: removed_id.clone(),
                    added_id: added_id.clone(),
                });
            }
        }
    }

    Ok(changes)
}

/// Parent of an original node expressed as a code comparable with the modified side
///
/// The original schema has no parent code, so the parent is found by URI and
/// its id translated to the code that id carries in the modified snapshot.
/// A parent missing from the modified snapshot keeps its original code.
fn original_parent_code(
    original: &Snapshot,
    modified: &Snapshot,
    node: &TaxonomyNode,
) -> Result<String> {
    let parent_id =
        original
            .resolver()
            .resolve_parent_id(&node.internal_id, &node.parent_resource_uri, "")?;
    let code = match modified.resolver().code_for_id(parent_id) {
        Ok(code) => code,
        Err(_) => original.resolver().code_for_id(parent_id)?,
    };
    Ok(code.to_string())
}

fn modified_parent_code(modified: &Snapshot, node: &TaxonomyNode) -> Result<String> {
    if !node.parent_oncotree_code.is_empty() {
        return Ok(node.parent_oncotree_code.clone());
    }
    let parent_id = modified.resolver().resolve_parent_of(node)?;
    Ok(modified.resolver().code_for_id(parent_id)?.to_string())
}

fn require<'a>(snapshot: &'a Snapshot, id: &str) -> Result<&'a TaxonomyNode> {
    snapshot
        .get(id)
        .ok_or_else(|| ReconcileError::CodeNotFoundForId {
            internal_id: id.to_string(),
        })
}

fn owned_ids<'a, 'b: 'a>(ids: impl Iterator<Item = &'a &'b str>) -> BTreeSet<String> {
    ids.map(|id| id.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SnapshotSchema;
    use crate::snapshot::RawSnapshot;

    fn node(id: &str, code: &str, uri: &str, parent_uri: &str, parent_label: &str) -> TaxonomyNode {
        TaxonomyNode {
            internal_id: id.to_string(),
            oncotree_code: code.to_string(),
            resource_uri: uri.to_string(),
            label: code.to_string(),
            preferred_label: code.to_string(),
            status: "Published".to_string(),
            parent_resource_uri: parent_uri.to_string(),
            parent_label: parent_label.to_string(),
            ..Default::default()
        }
    }

    fn snapshot(schema: SnapshotSchema, rows: Vec<TaxonomyNode>) -> Snapshot {
        let raw = RawSnapshot {
            path: format!("{}.csv", schema),
            schema,
            header: Vec::new(),
            rows,
            digest: String::new(),
        };
        Snapshot::from_validated(raw, &ReconcileConfig::default())
    }

    fn base() -> Vec<TaxonomyNode> {
        vec![
            node("T", "TISSUE", "uri:t", "", ""),
            node("A", "A1", "uri:a", "uri:t", "TISSUE"),
            node("B", "B1", "uri:b", "uri:a", "A1"),
        ]
    }

    #[test]
    fn test_code_change_is_recorded_without_parent_change() {
        let original = snapshot(SnapshotSchema::Original, base());
        let mut rows = base();
        rows[2].oncotree_code = "B2".to_string();
        let modified = snapshot(SnapshotSchema::Modified, rows);

        let changes = reconcile(&original, &modified, &ReconcileConfig::default()).unwrap();
        assert!(changes.removed.is_empty());
        assert!(changes.added.is_empty());
        assert_eq!(changes.retained.len(), 3);
        assert_eq!(
            changes.code_changes,
            vec![CodeChange {
                internal_id: "B".to_string(),
                original_code: "B1".to_string(),
                modified_code: "B2".to_string(),
            }]
        );
        assert!(changes.parent_changes.is_empty());
    }

    #[test]
    fn test_renamed_parent_is_not_a_parent_change() {
        let original = snapshot(SnapshotSchema::Original, base());
        let mut rows = base();
        rows[1].oncotree_code = "A2".to_string();
        rows[2].parent_oncotree_code = "A2".to_string();
        let modified = snapshot(SnapshotSchema::Modified, rows);

        let changes = reconcile(&original, &modified, &ReconcileConfig::default()).unwrap();
        assert_eq!(changes.code_changes.len(), 1);
        assert!(changes.parent_changes.is_empty());
    }

    #[test]
    fn test_reparenting_is_recorded() {
        let original = snapshot(SnapshotSchema::Original, base());
        let mut rows = base();
        rows[2].parent_oncotree_code = "TISSUE".to_string();
        let modified = snapshot(SnapshotSchema::Modified, rows);

        let changes = reconcile(&original, &modified, &ReconcileConfig::default()).unwrap();
        assert_eq!(
            changes.parent_changes,
            vec![ParentChange {
                internal_id: "B".to_string(),
                original_parent_code: "A1".to_string(),
                modified_parent_code: "TISSUE".to_string(),
            }]
        );
    }

    #[test]
    fn test_new_node_with_uri_is_fatal() {
        let original = snapshot(SnapshotSchema::Original, base());
        let mut rows = base();
        rows.push(node("C", "C1", "uri:c", "uri:a", "A1"));
        let modified = snapshot(SnapshotSchema::Modified, rows);

        let err = reconcile(&original, &modified, &ReconcileConfig::default()).unwrap_err();
        assert!(matches!(err, ReconcileError::NewNodeHasResourceUri { ref internal_id, .. } if internal_id == "C"));
    }

    #[test]
    fn test_changed_uri_is_fatal() {
        let original = snapshot(SnapshotSchema::Original, base());
        let mut rows = base();
        rows[1].resource_uri = "uri:a2".to_string();
        rows[2].parent_resource_uri = "uri:a2".to_string();
        let modified = snapshot(SnapshotSchema::Modified, rows);

        let err = reconcile(&original, &modified, &ReconcileConfig::default()).unwrap_err();
        assert!(matches!(err, ReconcileError::ResourceUriChanged { ref internal_id, .. } if internal_id == "A"));
    }

    #[test]
    fn test_added_parent_is_resolved() {
        let original = snapshot(SnapshotSchema::Original, base());
        let mut rows = base();
        let mut c = node("C", "C1", "", "", "");
        c.parent_oncotree_code = "A1".to_string();
        rows.push(c);
        let modified = snapshot(SnapshotSchema::Modified, rows);

        let changes = reconcile(&original, &modified, &ReconcileConfig::default()).unwrap();
        assert_eq!(changes.added_parents.get("C").map(String::as_str), Some("A"));
    }

    #[test]
    fn test_unpublished_node_counts_as_removed() {
        let original = snapshot(SnapshotSchema::Original, base());
        let mut rows = base();
        rows[2].status = "Deprecated".to_string();
        let modified = snapshot(SnapshotSchema::Modified, rows);

        let changes = reconcile(&original, &modified, &ReconcileConfig::default()).unwrap();
        assert!(changes.removed.contains("B"));
        assert!(!changes.retained.contains("B"));
    }
}
