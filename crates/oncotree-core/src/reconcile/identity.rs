use crate::model::{Column, TaxonomyNode};

/// Columns that never count as a difference between a removed and an added node
///
/// The original schema has no parent code column, so that column says
/// nothing about identity. A resource URI still counts.
pub const IDENTITY_EXCLUDED: [Column; 2] = [Column::InternalId, Column::ParentOncotreeCode];

/// Columns whose values differ between two nodes, in column order
pub fn attribute_diff(a: &TaxonomyNode, b: &TaxonomyNode, excluded: &[Column]) -> Vec<Column> {
    Column::ALL
        .iter()
        .copied()
        .filter(|c| !excluded.contains(c))
        .filter(|c| a.value(*c) != b.value(*c))
        .collect()
}

pub fn is_identity_candidate(removed: &TaxonomyNode, added: &TaxonomyNode) -> bool {
    attribute_diff(removed, added, &IDENTITY_EXCLUDED).is_empty()
}
