//! Cross-snapshot reconciliation
//!
//! [`reconcile`] partitions internal ids into removed, added and retained,
//! enforces resource URI immutability and records the advisory changes a
//! curator has to see before accepting.

pub mod engine;
pub mod identity;

pub use engine::reconcile;
pub use identity::attribute_diff;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Everything reconciliation derives from one (original, modified) pair
///
/// Sets are sorted and lists are in internal id order, so two runs over the
/// same inputs compare equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet {
    pub removed: BTreeSet<String>,
    pub added: BTreeSet<String>,
    pub retained: BTreeSet<String>,
    /// Added id -> resolved parent internal id (the root has no entry)
    pub added_parents: BTreeMap<String, String>,
    pub code_changes: Vec<CodeChange>,
    pub parent_changes: Vec<ParentChange>,
    pub identity_candidates: Vec<IdentityCandidate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeChange {
    pub internal_id: String,
    pub original_code: String,
    pub modified_code: String,
}

/// A retained node whose parent, compared by oncotree code, differs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentChange {
    pub internal_id: String,
    pub original_parent_code: String,
    pub modified_parent_code: String,
}

/// A removed and an added node that differ only by internal id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityCandidate {
    pub removed_id: String,
    pub added_id: String,
}
