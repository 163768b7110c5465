use oncotree_core::pipeline::ReconcileRequest;
use oncotree_core::{ReconcileConfig, SnapshotSchema, TaxonomyNode};
use std::path::PathBuf;
use tempfile::TempDir;

pub const ROOT_ID: &str = "ONC000001";

/// Temporary directory holding one original / modified CSV pair
#[allow(dead_code)]
pub struct Fixture {
    pub dir: TempDir,
}

#[allow(dead_code)]
impl Fixture {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    /// Write rows as a CSV file with the schema's full header
    pub fn write(&self, name: &str, schema: SnapshotSchema, rows: &[TaxonomyNode]) -> PathBuf {
        let columns = schema.expected_header();
        let path = self.dir.path().join(name);
        let mut writer = csv::Writer::from_path(&path).unwrap();
        writer
            .write_record(columns.iter().map(|c| c.header()))
            .unwrap();
        for row in rows {
            writer
                .write_record(columns.iter().map(|c| row.value(*c)))
                .unwrap();
        }
        writer.flush().unwrap();
        path
    }

    /// Write raw text as-is, for malformed headers and similar
    pub fn write_text(&self, name: &str, text: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, text).unwrap();
        path
    }

    pub fn request(&self, original: &[TaxonomyNode], modified: &[TaxonomyNode]) -> ReconcileRequest {
        ReconcileRequest {
            original_path: self.write("original.csv", SnapshotSchema::Original, original),
            modified_path: self.write("modified.csv", SnapshotSchema::Modified, modified),
            config: ReconcileConfig::default(),
        }
    }
}

/// A published node with every descriptive field filled
#[allow(dead_code)]
pub fn node(internal_id: &str, code: &str, label: &str, uri: &str) -> TaxonomyNode {
    TaxonomyNode {
        resource_uri: uri.to_string(),
        label: label.to_string(),
        scheme_uri: "https://example.org/oncotree".to_string(),
        status: "Published".to_string(),
        internal_id: internal_id.to_string(),
        color: "LightBlue".to_string(),
        main_type: format!("{} Cancer", label),
        oncotree_code: code.to_string(),
        preferred_label: label.to_string(),
        ..Default::default()
    }
}

#[allow(dead_code)]
pub fn root() -> TaxonomyNode {
    let mut root = node(ROOT_ID, "TISSUE", "Tissue", "https://example.org/onc/tissue");
    root.color.clear();
    root.main_type.clear();
    root
}

/// Point `child` at `parent` through the legacy URI / label pair
#[allow(dead_code)]
pub fn under(mut child: TaxonomyNode, parent: &TaxonomyNode) -> TaxonomyNode {
    child.parent_resource_uri = parent.resource_uri.clone();
    child.parent_label = parent.label.clone();
    child
}

/// A node that is new in the modified file: no URI, parent by code
#[allow(dead_code)]
pub fn new_node(internal_id: &str, code: &str, label: &str, parent_code: &str) -> TaxonomyNode {
    let mut n = node(internal_id, code, label, "");
    n.parent_oncotree_code = parent_code.to_string();
    n
}

/// Root, two organs and one subtype, as exported
#[allow(dead_code)]
pub fn base_tree() -> Vec<TaxonomyNode> {
    let tissue = root();
    let breast = under(
        node("ONC000002", "BREAST", "Breast", "https://example.org/onc/breast"),
        &tissue,
    );
    let lung = under(
        node("ONC000003", "LUNG", "Lung", "https://example.org/onc/lung"),
        &tissue,
    );
    let idc = under(
        node(
            "ONC000004",
            "IDC",
            "Invasive Ductal Carcinoma",
            "https://example.org/onc/idc",
        ),
        &breast,
    );
    vec![tissue, breast, lung, idc]
}

/// Change one row of a tree by internal id
#[allow(dead_code)]
pub fn edit(
    rows: &mut [TaxonomyNode],
    internal_id: &str,
    f: impl FnOnce(&mut TaxonomyNode),
) {
    let row = rows
        .iter_mut()
        .find(|r| r.internal_id == internal_id)
        .unwrap();
    f(row);
}
