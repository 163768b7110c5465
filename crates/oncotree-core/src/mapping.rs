//! Resource URI to oncotree code reference table
//!
//! The upstream table is plain text, one `subject predicate object` triple
//! per line. Only triples with the has-code predicate are kept.

use std::collections::BTreeMap;

use crate::errors::Result;

/// Shown when an id has no entry in the table
pub const UNKNOWN_CODE: &str = "unknown";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeMapping {
    codes: BTreeMap<String, String>,
}

impl CodeMapping {
    pub fn new(codes: BTreeMap<String, String>) -> Self {
        Self { codes }
    }

    pub fn get(&self, subject: &str) -> Option<&str> {
        self.codes.get(subject).map(String::as_str)
    }

    /// Code for a subject, or [`UNKNOWN_CODE`]
    pub fn code_for(&self, subject: &str) -> &str {
        self.get(subject).unwrap_or(UNKNOWN_CODE)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

/// Parse the triple table
///
/// Lines with fewer than three tokens are skipped with a warning. A repeated
/// subject keeps its last object.
pub fn parse_code_mapping(text: &str, predicate: &str) -> CodeMapping {
    let mut codes = BTreeMap::new();
    for (number, line) in text.lines().enumerate() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.is_empty() {
            continue;
        }
        if fields.len() < 3 {
            tracing::warn!(line = number + 1, "Skipping malformed code mapping line '{}'", line);
            continue;
        }
        if fields[1] == predicate {
            codes.insert(fields[0].to_string(), fields[2].to_string());
        }
    }
    CodeMapping::new(codes)
}

/// Where the reference table comes from
pub trait CodeMappingSource {
    /// Fetch and parse the table
    ///
    /// # Errors
    /// `MappingFetch` or `MappingStatus` when the table cannot be obtained.
    fn fetch(&self) -> Result<CodeMapping>;
}

/// A fixed table, for tests and offline runs
#[derive(Debug, Clone, Default)]
pub struct StaticCodeMapping {
    mapping: CodeMapping,
}

impl StaticCodeMapping {
    pub fn new(mapping: CodeMapping) -> Self {
        Self { mapping }
    }

    pub fn from_text(text: &str, predicate: &str) -> Self {
        Self::new(parse_code_mapping(text, predicate))
    }
}

impl CodeMappingSource for StaticCodeMapping {
    fn fetch(&self) -> Result<CodeMapping> {
        Ok(self.mapping.clone())
    }
}
