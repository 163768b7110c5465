//! Parent resolution across the two addressing schemes
//!
//! A child names its parent either by oncotree code (modified schema only)
//! or by the legacy resource URI. Both resolve to the parent's internal id.

use crate::errors::{ReconcileError, Result};
use crate::model::TaxonomyNode;
use std::collections::BTreeMap;

/// Lookup maps built once per snapshot
///
/// `id_to_code` is the inverse of `code_to_id`, filled alongside it. Codes
/// and ids are unique in a validated snapshot so the inverse is exact; should
/// that ever not hold, the first row inserted wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParentResolver {
    code_to_id: BTreeMap<String, String>,
    uri_to_id: BTreeMap<String, String>,
    id_to_code: BTreeMap<String, String>,
}

impl ParentResolver {
    pub fn build<'a>(rows: impl IntoIterator<Item = &'a TaxonomyNode>) -> Self {
        let mut resolver = Self::default();
        for row in rows {
            if !row.oncotree_code.is_empty() {
                resolver
                    .code_to_id
                    .entry(row.oncotree_code.clone())
                    .or_insert_with(|| row.internal_id.clone());
                resolver
                    .id_to_code
                    .entry(row.internal_id.clone())
                    .or_insert_with(|| row.oncotree_code.clone());
            }
            // new nodes have no URI yet and cannot be addressed by it
            if !row.resource_uri.is_empty() {
                resolver
                    .uri_to_id
                    .entry(row.resource_uri.clone())
                    .or_insert_with(|| row.internal_id.clone());
            }
        }
        resolver
    }

    /// Resolve a child's declared parent to the parent's internal id
    ///
    /// A non-empty `parent_oncotree_code` is authoritative and must exist;
    /// otherwise the parent URI is required and must exist.
    ///
    /// # Errors
    /// `UnknownParentCode`, `ParentReferenceMissing` or `UnknownParentUri`.
    pub fn resolve_parent_id(
        &self,
        child_id: &str,
        parent_resource_uri: &str,
        parent_oncotree_code: &str,
    ) -> Result<&str> {
        if !parent_oncotree_code.is_empty() {
            return self
                .code_to_id
                .get(parent_oncotree_code)
                .map(String::as_str)
                .ok_or_else(|| ReconcileError::UnknownParentCode {
                    child_id: child_id.to_string(),
                    parent_code: parent_oncotree_code.to_string(),
                });
        }
        if parent_resource_uri.is_empty() {
            return Err(ReconcileError::ParentReferenceMissing {
                child_id: child_id.to_string(),
            });
        }
        self.uri_to_id
            .get(parent_resource_uri)
            .map(String::as_str)
            .ok_or_else(|| ReconcileError::UnknownParentUri {
                child_id: child_id.to_string(),
                parent_uri: parent_resource_uri.to_string(),
            })
    }

    /// Resolve the parent declared on a node
    ///
    /// # Errors
    /// As [`ParentResolver::resolve_parent_id`].
    pub fn resolve_parent_of(&self, node: &TaxonomyNode) -> Result<&str> {
        self.resolve_parent_id(
            &node.internal_id,
            &node.parent_resource_uri,
            &node.parent_oncotree_code,
        )
    }

    /// Oncotree code of an internal id
    ///
    /// # Errors
    /// `CodeNotFoundForId` if no row carries that id.
    pub fn code_for_id(&self, internal_id: &str) -> Result<&str> {
        self.id_to_code
            .get(internal_id)
            .map(String::as_str)
            .ok_or_else(|| ReconcileError::CodeNotFoundForId {
                internal_id: internal_id.to_string(),
            })
    }

    pub fn id_for_code(&self, code: &str) -> Option<&str> {
        self.code_to_id.get(code).map(String::as_str)
    }

    pub fn id_for_uri(&self, uri: &str) -> Option<&str> {
        self.uri_to_id.get(uri).map(String::as_str)
    }
}
