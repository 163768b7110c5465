//! CSV snapshot reader
//!
//! Reads a curator export into raw rows without judging them; structural
//! checks belong to [`crate::rules::validation`].

use crate::errors::{ReconcileError, Result};
use crate::model::{Column, SnapshotSchema, TaxonomyNode};
use sha2::{Digest as _, Sha256};
use std::collections::HashMap;
use std::path::Path;

/// A parsed but unvalidated snapshot file
#[derive(Debug, Clone, PartialEq)]
pub struct RawSnapshot {
    pub path: String,
    pub schema: SnapshotSchema,
    /// Column names exactly as found in the file header
    pub header: Vec<String>,
    /// Rows in file order
    pub rows: Vec<TaxonomyNode>,
    /// SHA-256 of the file bytes, hex encoded
    pub digest: String,
}

/// Read a snapshot file from disk
///
/// # Errors
/// `Io` if the file cannot be read, `MalformedCsv` if it is not UTF-8 CSV.
pub fn read_snapshot(path: &Path, schema: SnapshotSchema) -> Result<RawSnapshot> {
    let display = path.display().to_string();
    let bytes = std::fs::read(path).map_err(|e| ReconcileError::Io {
        path: display.clone(),
        reason: e.to_string(),
    })?;
    parse_snapshot_bytes(&display, &bytes, schema)
}

/// Parse snapshot bytes already in memory
///
/// A leading UTF-8 byte order mark is ignored. Columns the schema does not
/// know are skipped; schema columns absent from the file read as empty so
/// that the header check can report all of them at once.
///
/// # Errors
/// `MalformedCsv` if the bytes are not UTF-8 or not parseable CSV.
pub fn parse_snapshot_bytes(
    path: &str,
    bytes: &[u8],
    schema: SnapshotSchema,
) -> Result<RawSnapshot> {
    let malformed = |reason: String| ReconcileError::MalformedCsv {
        path: path.to_string(),
        reason,
    };

    let text = std::str::from_utf8(bytes).map_err(|e| malformed(format!("not UTF-8: {}", e)))?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let header: Vec<String> = reader
        .headers()
        .map_err(|e| malformed(e.to_string()))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let positions: HashMap<&str, usize> = header
        .iter()
        .enumerate()
        .map(|(i, h)| (h.as_str(), i))
        .collect();
    let columns: Vec<(Column, usize)> = schema
        .expected_header()
        .into_iter()
        .filter_map(|c| positions.get(c.header()).map(|&i| (c, i)))
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| malformed(e.to_string()))?;
        let mut node = TaxonomyNode::default();
        for (column, index) in &columns {
            node.set(*column, record.get(*index).unwrap_or_default().to_string());
        }
        rows.push(node);
    }

    let mut hasher = Sha256::new();
    hasher.update(bytes);

    Ok(RawSnapshot {
        path: path.to_string(),
        schema,
        header,
        rows,
        digest: hex::encode(hasher.finalize()),
    })
}
