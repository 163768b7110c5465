//! The two export schemas a snapshot can be read with

use super::node::{Column, TaxonomyNode};
use serde::{Deserialize, Serialize};

/// Schema a snapshot file is validated against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SnapshotSchema {
    /// Export straight from the authoring tool
    Original,
    /// Curator-edited copy with the extra parent oncotree code column
    Modified,
}

const ORIGINAL_HEADER: [Column; 13] = [
    Column::ResourceUri,
    Column::Label,
    Column::SchemeUri,
    Column::Status,
    Column::InternalId,
    Column::Color,
    Column::MainType,
    Column::OncotreeCode,
    Column::Precursors,
    Column::PreferredLabel,
    Column::Revocations,
    Column::ParentResourceUri,
    Column::ParentLabel,
];

const REQUIRED: [Column; 10] = [
    Column::Label,
    Column::SchemeUri,
    Column::Status,
    Column::InternalId,
    Column::Color,
    Column::MainType,
    Column::OncotreeCode,
    Column::PreferredLabel,
    Column::ParentResourceUri,
    Column::ParentLabel,
];

const ROOT_REQUIRED: [Column; 7] = [
    Column::ResourceUri,
    Column::Label,
    Column::SchemeUri,
    Column::Status,
    Column::InternalId,
    Column::OncotreeCode,
    Column::PreferredLabel,
];

impl SnapshotSchema {
    /// Columns the file header must contain
    pub fn expected_header(&self) -> Vec<Column> {
        let mut columns = ORIGINAL_HEADER.to_vec();
        if *self == SnapshotSchema::Modified {
            columns.push(Column::ParentOncotreeCode);
        }
        columns
    }

    pub fn has_parent_code(&self) -> bool {
        *self == SnapshotSchema::Modified
    }

    /// Required fields for a row
    ///
    /// The root uses a reduced set. In the modified schema a row addressing
    /// its parent by oncotree code does not need the legacy parent URI and
    /// label.
    pub fn required_fields(&self, node: &TaxonomyNode, root_code: &str) -> Vec<Column> {
        if node.is_root(root_code) {
            return ROOT_REQUIRED.to_vec();
        }
        if self.has_parent_code() && !node.parent_oncotree_code.is_empty() {
            return REQUIRED
                .iter()
                .copied()
                .filter(|c| !matches!(c, Column::ParentResourceUri | Column::ParentLabel))
                .collect();
        }
        REQUIRED.to_vec()
    }
}

impl std::fmt::Display for SnapshotSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SnapshotSchema::Original => f.write_str("original"),
            SnapshotSchema::Modified => f.write_str("modified"),
        }
    }
}
