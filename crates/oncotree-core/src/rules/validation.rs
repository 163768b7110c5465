use std::path::Path;
use std::time::Instant;

use crate::config::ReconcileConfig;
use crate::errors::{ReconcileError, Result};
use crate::model::SnapshotSchema;
use crate::snapshot::{read_snapshot, RawSnapshot, Snapshot};
use crate::{log_op_end, log_op_error, log_op_start};

use super::invariants::{self, KeyTracker, ParentTargets};

/// Validate a parsed snapshot and freeze it
///
/// Checks run in this order:
///
/// 1. Header is a superset of the schema's columns (all missing columns in one error)
/// 2. Per row, required fields are set (first gap is fatal)
/// 3. Per row, `resource_uri`, `internal_id` and `oncotree_code` are unique (first duplicate is fatal)
/// 4. Across the file, label mismatches and unresolvable parents are collected;
///    a root row with any parent field is fatal on the spot
///
/// Step 4 fails with `SnapshotInvalid` carrying both lists if either is non-empty.
///
/// # Errors
/// The first fail-fast violation, or the accumulated `SnapshotInvalid`.
pub fn validate_snapshot(raw: RawSnapshot, config: &ReconcileConfig) -> Result<Snapshot> {
    let missing = invariants::find_missing_columns(&raw.header, raw.schema);
    if !missing.is_empty() {
        return Err(ReconcileError::MissingColumns {
            path: raw.path,
            columns: missing,
        });
    }

    let mut keys = KeyTracker::default();
    for row in &raw.rows {
        if let Some(field) =
            invariants::first_missing_required_field(row, raw.schema, &config.root_code)
        {
            return Err(ReconcileError::MissingRequiredField {
                path: raw.path.clone(),
                internal_id: row.internal_id.clone(),
                field: field.header().to_string(),
            });
        }
        if let Some((field, value)) = keys.observe(row) {
            return Err(ReconcileError::DuplicateKey {
                path: raw.path.clone(),
                field: field.header().to_string(),
                value,
            });
        }
    }

    let targets = ParentTargets::build(&raw.rows);
    let mut label_mismatches = Vec::new();
    let mut invalid_parents = Vec::new();
    for row in &raw.rows {
        if let Some(mismatch) = invariants::label_mismatch(row) {
            label_mismatches.push(mismatch);
        }
        if row.is_root(&config.root_code) {
            if row.has_parent_fields() {
                return Err(ReconcileError::RootHasParent {
                    path: raw.path.clone(),
                    internal_id: row.internal_id.clone(),
                });
            }
        } else if !targets.resolves(row, raw.schema) {
            invalid_parents.push(invariants::invalid_parent(row));
        }
    }

    if !label_mismatches.is_empty() || !invalid_parents.is_empty() {
        for m in &label_mismatches {
            tracing::warn!(snapshot_path = %raw.path, "label mismatch {}", m);
        }
        for p in &invalid_parents {
            tracing::warn!(snapshot_path = %raw.path, "invalid parent {}", p);
        }
        return Err(ReconcileError::SnapshotInvalid {
            path: raw.path,
            label_mismatches,
            invalid_parents,
        });
    }

    let snapshot = Snapshot::from_validated(raw, config);
    for node in snapshot.excluded_nodes() {
        tracing::warn!(
            snapshot_path = snapshot.path(),
            internal_id = %node.internal_id,
            "Excluding '{}' because its status is '{}' rather than '{}'",
            node.pretty_label(),
            node.status,
            config.published_status
        );
    }
    Ok(snapshot)
}

/// Read and validate a snapshot file, logging both stages
///
/// # Errors
/// Any error from [`read_snapshot`] or [`validate_snapshot`].
pub fn load_and_validate(
    path: &Path,
    schema: SnapshotSchema,
    config: &ReconcileConfig,
) -> Result<Snapshot> {
    let shown = path.display().to_string();

    log_op_start!("load_snapshot", snapshot_path = %shown, schema = %schema);
    let start = Instant::now();
    let raw = match read_snapshot(path, schema) {
        Ok(raw) => raw,
        Err(e) => {
            log_op_error!(
                "load_snapshot",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            return Err(e);
        }
    };
    log_op_end!(
        "load_snapshot",
        duration_ms = start.elapsed().as_millis() as u64,
        node_count = raw.rows.len()
    );

    log_op_start!("validate_snapshot", snapshot_path = %shown, schema = %schema);
    let start = Instant::now();
    match validate_snapshot(raw, config) {
        Ok(snapshot) => {
            log_op_end!(
                "validate_snapshot",
                duration_ms = start.elapsed().as_millis() as u64,
                node_count = snapshot.nodes().len()
            );
            Ok(snapshot)
        }
        Err(e) => {
            log_op_error!(
                "validate_snapshot",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            Err(e)
        }
    }
}
