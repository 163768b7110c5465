use std::collections::{BTreeSet, HashMap, HashSet};

use crate::errors::{InvalidParentLink, LabelMismatch};
use crate::model::{Column, SnapshotSchema, TaxonomyNode};

/// Expected columns absent from a file header, in schema order
pub fn find_missing_columns(header: &[String], schema: SnapshotSchema) -> Vec<String> {
    let present: HashSet<&str> = header.iter().map(String::as_str).collect();
    schema
        .expected_header()
        .iter()
        .map(|c| c.header())
        .filter(|h| !present.contains(h))
        .map(str::to_string)
        .collect()
}

/// First required field left empty on a row, in schema order
pub fn first_missing_required_field(
    node: &TaxonomyNode,
    schema: SnapshotSchema,
    root_code: &str,
) -> Option<Column> {
    schema
        .required_fields(node, root_code)
        .into_iter()
        .find(|c| node.value(*c).is_empty())
}

/// Tracks key values seen so far while scanning a file row by row
///
/// Empty values are never recorded: they are the required-field check's
/// concern, not a duplicate.
#[derive(Debug, Default)]
pub struct KeyTracker {
    resource_uris: HashSet<String>,
    internal_ids: HashSet<String>,
    oncotree_codes: HashSet<String>,
}

impl KeyTracker {
    /// Record a row's keys, returning the first key already seen
    pub fn observe(&mut self, node: &TaxonomyNode) -> Option<(Column, String)> {
        let checks = [
            (Column::ResourceUri, &node.resource_uri),
            (Column::InternalId, &node.internal_id),
            (Column::OncotreeCode, &node.oncotree_code),
        ];
        for (column, value) in checks {
            if value.is_empty() {
                continue;
            }
            if self.seen(column).contains(value.as_str()) {
                return Some((column, value.clone()));
            }
        }
        for (column, value) in checks {
            if !value.is_empty() {
                self.seen_mut(column).insert(value.clone());
            }
        }
        None
    }

    fn seen(&self, column: Column) -> &HashSet<String> {
        match column {
            Column::ResourceUri => &self.resource_uris,
            Column::InternalId => &self.internal_ids,
            _ => &self.oncotree_codes,
        }
    }

    fn seen_mut(&mut self, column: Column) -> &mut HashSet<String> {
        match column {
            Column::ResourceUri => &mut self.resource_uris,
            Column::InternalId => &mut self.internal_ids,
            _ => &mut self.oncotree_codes,
        }
    }
}

pub fn label_mismatch(node: &TaxonomyNode) -> Option<LabelMismatch> {
    (node.label != node.preferred_label).then(|| LabelMismatch {
        internal_id: node.internal_id.clone(),
        label: node.label.clone(),
        preferred_label: node.preferred_label.clone(),
    })
}

/// Every row a parent reference could point at
pub struct ParentTargets<'a> {
    by_uri_and_label: HashMap<(&'a str, &'a str), BTreeSet<&'a str>>,
    by_code: HashMap<&'a str, BTreeSet<&'a str>>,
}

impl<'a> ParentTargets<'a> {
    pub fn build(rows: &'a [TaxonomyNode]) -> Self {
        let mut by_uri_and_label: HashMap<(&str, &str), BTreeSet<&str>> = HashMap::new();
        let mut by_code: HashMap<&str, BTreeSet<&str>> = HashMap::new();
        for row in rows {
            if !row.resource_uri.is_empty() {
                by_uri_and_label
                    .entry((row.resource_uri.as_str(), row.label.as_str()))
                    .or_default()
                    .insert(row.internal_id.as_str());
            }
            if !row.oncotree_code.is_empty() {
                by_code
                    .entry(row.oncotree_code.as_str())
                    .or_default()
                    .insert(row.internal_id.as_str());
            }
        }
        Self {
            by_uri_and_label,
            by_code,
        }
    }

    /// Whether a non-root row's parent reference names some other row
    ///
    /// In the modified schema a parent oncotree code, when given, is the
    /// reference that must resolve; otherwise the `(parent URI, parent
    /// label)` pair must equal some other row's `(URI, label)`.
    pub fn resolves(&self, node: &TaxonomyNode, schema: SnapshotSchema) -> bool {
        let candidates = if schema.has_parent_code() && !node.parent_oncotree_code.is_empty() {
            self.by_code.get(node.parent_oncotree_code.as_str())
        } else {
            self.by_uri_and_label
                .get(&(node.parent_resource_uri.as_str(), node.parent_label.as_str()))
        };
        candidates
            .map(|ids| ids.iter().any(|id| *id != node.internal_id))
            .unwrap_or(false)
    }
}

pub fn invalid_parent(node: &TaxonomyNode) -> InvalidParentLink {
    InvalidParentLink {
        internal_id: node.internal_id.clone(),
        parent_resource_uri: node.parent_resource_uri.clone(),
        parent_label: node.parent_label.clone(),
        parent_oncotree_code: node.parent_oncotree_code.clone(),
    }
}
