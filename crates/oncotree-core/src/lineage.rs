//! Precursor and revocation history
//!
//! Modified rows may declare ids whose lineage they continue (precursors) or
//! replace outright (revocations). Both are indexed as
//! `declared id -> declaring ids` and checked for exclusivity.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;

use crate::errors::{ReconcileError, Result};
use crate::snapshot::Snapshot;
use crate::{log_op_end, log_op_error, log_op_start};

pub type LineageIndex = BTreeMap<String, BTreeSet<String>>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lineage {
    /// Retired id -> ids declaring it as a precursor
    pub precursors: LineageIndex,
    /// Revoked id -> ids declaring the revocation
    pub revocations: LineageIndex,
}

impl Lineage {
    /// Index the declarations of every modified row
    pub fn build(modified: &Snapshot) -> Self {
        let mut lineage = Self::default();
        for node in modified.nodes().values() {
            for id in node.precursor_ids() {
                lineage
                    .precursors
                    .entry(id.to_string())
                    .or_default()
                    .insert(node.internal_id.clone());
            }
            for id in node.revocation_ids() {
                lineage
                    .revocations
                    .entry(id.to_string())
                    .or_default()
                    .insert(node.internal_id.clone());
            }
        }
        lineage
    }

    pub fn is_empty(&self) -> bool {
        self.precursors.is_empty() && self.revocations.is_empty()
    }
}

/// Build and check the lineage indices of the modified snapshot
///
/// Any row of the modified file, published or not, is a current record.
///
/// # Errors
/// - `PrecursorStillCurrent` if a precursor id is still a row
/// - `RevocationStillCurrent` if a revoked id is still a row
/// - `RevocationIsPrecursor` if an id is declared both ways
/// - `RevokedByNewNode` if a revoking id is in `added`
pub fn validate_lineage(modified: &Snapshot, added: &BTreeSet<String>) -> Result<Lineage> {
    log_op_start!("validate_lineage");
    let start = Instant::now();
    match validate_lineage_impl(modified, added) {
        Ok(lineage) => {
            log_op_end!(
                "validate_lineage",
                duration_ms = start.elapsed().as_millis() as u64,
                precursor_count = lineage.precursors.len(),
                revocation_count = lineage.revocations.len()
            );
            Ok(lineage)
        }
        Err(e) => {
            log_op_error!(
                "validate_lineage",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            Err(e)
        }
    }
}

fn validate_lineage_impl(modified: &Snapshot, added: &BTreeSet<String>) -> Result<Lineage> {
    let lineage = Lineage::build(modified);

    for (precursor_id, successors) in &lineage.precursors {
        if modified.get(precursor_id).is_some() {
            return Err(ReconcileError::PrecursorStillCurrent {
                precursor_id: precursor_id.clone(),
                successors: successors.iter().cloned().collect(),
            });
        }
    }

    for (revoked_id, revokers) in &lineage.revocations {
        if modified.get(revoked_id).is_some() {
            return Err(ReconcileError::RevocationStillCurrent {
                revoked_id: revoked_id.clone(),
                revokers: revokers.iter().cloned().collect(),
            });
        }
        if lineage.precursors.contains_key(revoked_id) {
            return Err(ReconcileError::RevocationIsPrecursor {
                revoked_id: revoked_id.clone(),
            });
        }
        if let Some(revoker_id) = revokers.iter().find(|id| added.contains(*id)) {
            return Err(ReconcileError::RevokedByNewNode {
                revoked_id: revoked_id.clone(),
                revoker_id: revoker_id.clone(),
            });
        }
    }

    Ok(lineage)
}
