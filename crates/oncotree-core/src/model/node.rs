//! One row of a taxonomy snapshot

use serde::{Deserialize, Serialize};

/// Columns of the curator export, in export order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Column {
    ResourceUri,
    Label,
    SchemeUri,
    Status,
    InternalId,
    Color,
    MainType,
    OncotreeCode,
    Precursors,
    PreferredLabel,
    Revocations,
    ParentResourceUri,
    ParentLabel,
    /// Present in the modified schema only
    ParentOncotreeCode,
}

impl Column {
    pub const ALL: [Column; 14] = [
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
        Column::ParentOncotreeCode,
    ];

    /// Header text as written by the export tool
    pub fn header(&self) -> &'static str {
        match self {
            Column::ResourceUri => "Resource URI",
            Column::Label => "Primary Concept",
            Column::SchemeUri => "skos:inScheme URI",
            Column::Status => "Status",
            Column::InternalId => "clinicalCasesSubset (OncoTree Tumor Type)",
            Column::Color => "color (OncoTree Tumor Type)",
            Column::MainType => "mainType (OncoTree Tumor Type)",
            Column::OncotreeCode => "notation (SKOS)",
            Column::Precursors => "precursors (OncoTree Tumor Type)",
            Column::PreferredLabel => "preferred label (SKOS)",
            Column::Revocations => "revocations (OncoTree Tumor Type)",
            Column::ParentResourceUri => "has broader (SKOS) URI",
            Column::ParentLabel => "has broader (SKOS)",
            Column::ParentOncotreeCode => "parent oncotree code",
        }
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.header())
    }
}

/// A taxonomy node as exported, one per CSV row
///
/// All fields hold the raw cell text; an empty string means "not set".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyNode {
    pub resource_uri: String,
    pub label: String,
    pub scheme_uri: String,
    pub status: String,
    pub internal_id: String,
    pub color: String,
    pub main_type: String,
    pub oncotree_code: String,
    pub precursors: String,
    pub preferred_label: String,
    pub revocations: String,
    pub parent_resource_uri: String,
    pub parent_label: String,
    pub parent_oncotree_code: String,
}

impl TaxonomyNode {
    pub fn value(&self, column: Column) -> &str {
        match column {
            Column::ResourceUri => &self.resource_uri,
            Column::Label => &self.label,
            Column::SchemeUri => &self.scheme_uri,
            Column::Status => &self.status,
            Column::InternalId => &self.internal_id,
            Column::Color => &self.color,
            Column::MainType => &self.main_type,
            Column::OncotreeCode => &self.oncotree_code,
            Column::Precursors => &self.precursors,
            Column::PreferredLabel => &self.preferred_label,
            Column::Revocations => &self.revocations,
            Column::ParentResourceUri => &self.parent_resource_uri,
            Column::ParentLabel => &self.parent_label,
            Column::ParentOncotreeCode => &self.parent_oncotree_code,
        }
    }

    pub fn set(&mut self, column: Column, value: String) {
        let slot = match column {
            Column::ResourceUri => &mut self.resource_uri,
            Column::Label => &mut self.label,
            Column::SchemeUri => &mut self.scheme_uri,
            Column::Status => &mut self.status,
            Column::InternalId => &mut self.internal_id,
            Column::Color => &mut self.color,
            Column::MainType => &mut self.main_type,
            Column::OncotreeCode => &mut self.oncotree_code,
            Column::Precursors => &mut self.precursors,
            Column::PreferredLabel => &mut self.preferred_label,
            Column::Revocations => &mut self.revocations,
            Column::ParentResourceUri => &mut self.parent_resource_uri,
            Column::ParentLabel => &mut self.parent_label,
            Column::ParentOncotreeCode => &mut self.parent_oncotree_code,
        };
        *slot = value;
    }

    /// Ids declared in the whitespace-delimited precursors cell
    pub fn precursor_ids(&self) -> impl Iterator<Item = &str> {
        self.precursors.split_whitespace()
    }

    /// Ids declared in the whitespace-delimited revocations cell
    pub fn revocation_ids(&self) -> impl Iterator<Item = &str> {
        self.revocations.split_whitespace()
    }

    pub fn is_root(&self, root_code: &str) -> bool {
        self.oncotree_code == root_code
    }

    pub fn has_parent_fields(&self) -> bool {
        !self.parent_resource_uri.is_empty()
            || !self.parent_label.is_empty()
            || !self.parent_oncotree_code.is_empty()
    }

    /// `internal_id: label (code)`, the form curators search for
    pub fn pretty_label(&self) -> String {
        format!("{}: {} ({})", self.internal_id, self.label, self.oncotree_code)
    }
}
