use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using ReconcileError
pub type Result<T> = std::result::Result<T, ReconcileError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code used by the CLI, the logging
/// facility and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Input
    InvalidInput,
    Io,
    Config,

    // Per-snapshot structure
    MissingColumns,
    MissingField,
    DuplicateKey,
    RootHasParent,
    /// Accumulated label / parent-link violations for one snapshot
    SnapshotInvalid,

    // Parent resolution
    ParentNotFound,
    CodeNotFound,

    // Cross-snapshot identity
    ResourceUriViolation,

    // Precursor / revocation history
    LineageViolation,

    // Collaborators
    ExternalService,
    Confirmation,
    Sink,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Config => "ERR_CONFIG",
            ExErrorKind::MissingColumns => "ERR_MISSING_COLUMNS",
            ExErrorKind::MissingField => "ERR_MISSING_FIELD",
            ExErrorKind::DuplicateKey => "ERR_DUPLICATE_KEY",
            ExErrorKind::RootHasParent => "ERR_ROOT_HAS_PARENT",
            ExErrorKind::SnapshotInvalid => "ERR_SNAPSHOT_INVALID",
            ExErrorKind::ParentNotFound => "ERR_PARENT_NOT_FOUND",
            ExErrorKind::CodeNotFound => "ERR_CODE_NOT_FOUND",
            ExErrorKind::ResourceUriViolation => "ERR_RESOURCE_URI_VIOLATION",
            ExErrorKind::LineageViolation => "ERR_LINEAGE_VIOLATION",
            ExErrorKind::ExternalService => "ERR_EXTERNAL_SERVICE",
            ExErrorKind::Confirmation => "ERR_CONFIRMATION",
            ExErrorKind::Sink => "ERR_SINK",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification for programmatic handling plus the context a
/// curator needs to find the offending record. `details` holds one line per
/// accumulated violation.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    snapshot: Option<String>,
    message: String,
    details: Vec<String>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            snapshot: None,
            message: String::new(),
            details: Vec::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity (internal id) context
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add snapshot path context
    pub fn with_snapshot(mut self, path: impl Into<String>) -> Self {
        self.snapshot = Some(path.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add accumulated violation lines
    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = details;
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the entity ID context, if any
    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    /// Get the snapshot path context, if any
    pub fn snapshot(&self) -> Option<&str> {
        self.snapshot.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get accumulated violation lines (empty for fail-fast errors)
    pub fn details(&self) -> &[String] {
        &self.details
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (internal_id: {})", entity_id)?;
        }
        if let Some(snapshot) = &self.snapshot {
            write!(f, " (snapshot: {})", snapshot)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// A row whose label and preferred label disagree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelMismatch {
    pub internal_id: String,
    pub label: String,
    pub preferred_label: String,
}

impl std::fmt::Display for LabelMismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: '{}' != '{}'",
            self.internal_id, self.label, self.preferred_label
        )
    }
}

/// A non-root row whose declared parent does not resolve to another row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidParentLink {
    pub internal_id: String,
    pub parent_resource_uri: String,
    pub parent_label: String,
    pub parent_oncotree_code: String,
}

impl std::fmt::Display for InvalidParentLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.parent_oncotree_code.is_empty() {
            write!(
                f,
                "{}: URI '{}' and label '{}'",
                self.internal_id, self.parent_resource_uri, self.parent_label
            )
        } else {
            write!(
                f,
                "{}: parent oncotree code '{}'",
                self.internal_id, self.parent_oncotree_code
            )
        }
    }
}

/// Error taxonomy for reconciliation operations
///
/// Node descriptions use the `internal_id: label (code)` form shown to
/// curators by the report.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReconcileError {
    // ===== Input =====
    #[error("Cannot read '{path}': {reason}")]
    Io { path: String, reason: String },

    #[error("Malformed CSV in '{path}': {reason}")]
    MalformedCsv { path: String, reason: String },

    #[error("Invalid configuration: {reason}")]
    Config { reason: String },

    // ===== Per-snapshot structure (fail-fast) =====
    #[error("Missing the following expected fields from input file '{path}': {}", .columns.join(", "))]
    MissingColumns { path: String, columns: Vec<String> },

    #[error("{field} is a required field, it is empty for the '{internal_id}' record in '{path}'")]
    MissingRequiredField {
        path: String,
        internal_id: String,
        field: String,
    },

    #[error("{field} must be unique. There is more than one record with '{value}' in '{path}'")]
    DuplicateKey {
        path: String,
        field: String,
        value: String,
    },

    #[error("The root node '{internal_id}' must not have any parent fields set in '{path}'")]
    RootHasParent { path: String, internal_id: String },

    // ===== Per-snapshot structure (accumulated) =====
    #[error(
        "Snapshot '{path}' is invalid: {} label mismatch(es), {} invalid parent(s)",
        .label_mismatches.len(),
        .invalid_parents.len()
    )]
    SnapshotInvalid {
        path: String,
        label_mismatches: Vec<LabelMismatch>,
        invalid_parents: Vec<InvalidParentLink>,
    },

    // ===== Parent resolution =====
    #[error("Parent oncotree code '{parent_code}' of '{child_id}' not found in snapshot")]
    UnknownParentCode {
        child_id: String,
        parent_code: String,
    },

    #[error("Parent resource URI '{parent_uri}' of '{child_id}' not found in snapshot")]
    UnknownParentUri {
        child_id: String,
        parent_uri: String,
    },

    #[error("Either the parent oncotree code or the parent resource URI is required, missing for '{child_id}'")]
    ParentReferenceMissing { child_id: String },

    #[error("Could not find an oncotree code for internal id {internal_id}")]
    CodeNotFoundForId { internal_id: String },

    // ===== Cross-snapshot identity =====
    #[error("You cannot have a resource URI for a new oncotree node '{node}'")]
    NewNodeHasResourceUri { internal_id: String, node: String },

    #[error("Resource URI is required for all records in the original file but is missing for '{node}'")]
    ResourceUriMissing { internal_id: String, node: String },

    #[error("Resource URI has changed for '{node}' ('{original}' -> '{modified}'), this is not allowed")]
    ResourceUriChanged {
        internal_id: String,
        node: String,
        original: String,
        modified: String,
    },

    // ===== Lineage =====
    #[error("'{precursor_id}' is a precursor to '{}' but '{precursor_id}' is still in this file as a current record", .successors.join(","))]
    PrecursorStillCurrent {
        precursor_id: String,
        successors: Vec<String>,
    },

    #[error("'{revoked_id}' has been revoked by '{}' but '{revoked_id}' is still in this file as a current record", .revokers.join(","))]
    RevocationStillCurrent {
        revoked_id: String,
        revokers: Vec<String>,
    },

    #[error("Revocation '{revoked_id}' cannot also be a precursor")]
    RevocationIsPrecursor { revoked_id: String },

    #[error("'{revoked_id}' is revoked by '{revoker_id}' but '{revoker_id}' is a new concept. Only a pre-existing concept can revoke something")]
    RevokedByNewNode {
        revoked_id: String,
        revoker_id: String,
    },

    // ===== Collaborators =====
    #[error("Failed to fetch code mapping from '{source_name}': {reason}")]
    MappingFetch { source_name: String, reason: String },

    #[error("Failed to download code mapping from '{url}': status code was '{status}'")]
    MappingStatus { url: String, status: u16 },

    #[error("Confirmation failed: {reason}")]
    Confirmation { reason: String },

    #[error("Hand-off of accepted changes failed: {reason}")]
    Sink { reason: String },
}

impl ReconcileError {
    /// Snapshot path the error refers to, for errors raised by per-file stages
    pub fn snapshot_path(&self) -> Option<&str> {
        match self {
            ReconcileError::Io { path, .. }
            | ReconcileError::MalformedCsv { path, .. }
            | ReconcileError::MissingColumns { path, .. }
            | ReconcileError::MissingRequiredField { path, .. }
            | ReconcileError::DuplicateKey { path, .. }
            | ReconcileError::RootHasParent { path, .. }
            | ReconcileError::SnapshotInvalid { path, .. } => Some(path),
            _ => None,
        }
    }
}

impl From<ReconcileError> for ExError {
    fn from(err: ReconcileError) -> Self {
        let message = err.to_string();
        let base = match &err {
            ReconcileError::Io { .. } => ExError::new(ExErrorKind::Io).with_op("load_snapshot"),
            ReconcileError::MalformedCsv { .. } => {
                ExError::new(ExErrorKind::InvalidInput).with_op("load_snapshot")
            }
            ReconcileError::Config { .. } => ExError::new(ExErrorKind::Config),
            ReconcileError::MissingColumns { .. } => {
                ExError::new(ExErrorKind::MissingColumns).with_op("validate_snapshot")
            }
            ReconcileError::MissingRequiredField { internal_id, .. } => {
                ExError::new(ExErrorKind::MissingField)
                    .with_op("validate_snapshot")
                    .with_entity_id(internal_id.clone())
            }
            ReconcileError::DuplicateKey { .. } => {
                ExError::new(ExErrorKind::DuplicateKey).with_op("validate_snapshot")
            }
            ReconcileError::RootHasParent { internal_id, .. } => {
                ExError::new(ExErrorKind::RootHasParent)
                    .with_op("validate_snapshot")
                    .with_entity_id(internal_id.clone())
            }
            ReconcileError::SnapshotInvalid {
                label_mismatches,
                invalid_parents,
                ..
            } => {
                let details = label_mismatches
                    .iter()
                    .map(|m| format!("label mismatch {}", m))
                    .chain(invalid_parents.iter().map(|p| format!("invalid parent {}", p)))
                    .collect();
                ExError::new(ExErrorKind::SnapshotInvalid)
                    .with_op("validate_snapshot")
                    .with_details(details)
            }
            ReconcileError::UnknownParentCode { child_id, .. }
            | ReconcileError::UnknownParentUri { child_id, .. }
            | ReconcileError::ParentReferenceMissing { child_id } => {
                ExError::new(ExErrorKind::ParentNotFound)
                    .with_op("resolve_parent_id")
                    .with_entity_id(child_id.clone())
            }
            ReconcileError::CodeNotFoundForId { internal_id } => {
                ExError::new(ExErrorKind::CodeNotFound)
                    .with_op("code_for_id")
                    .with_entity_id(internal_id.clone())
            }
            ReconcileError::NewNodeHasResourceUri { internal_id, .. }
            | ReconcileError::ResourceUriMissing { internal_id, .. }
            | ReconcileError::ResourceUriChanged { internal_id, .. } => {
                ExError::new(ExErrorKind::ResourceUriViolation)
                    .with_op("reconcile")
                    .with_entity_id(internal_id.clone())
            }
            ReconcileError::PrecursorStillCurrent { precursor_id, .. } => {
                ExError::new(ExErrorKind::LineageViolation)
                    .with_op("validate_lineage")
                    .with_entity_id(precursor_id.clone())
            }
            ReconcileError::RevocationStillCurrent { revoked_id, .. }
            | ReconcileError::RevocationIsPrecursor { revoked_id }
            | ReconcileError::RevokedByNewNode { revoked_id, .. } => {
                ExError::new(ExErrorKind::LineageViolation)
                    .with_op("validate_lineage")
                    .with_entity_id(revoked_id.clone())
            }
            ReconcileError::MappingFetch { .. } | ReconcileError::MappingStatus { .. } => {
                ExError::new(ExErrorKind::ExternalService).with_op("fetch_code_mapping")
            }
            ReconcileError::Confirmation { .. } => {
                ExError::new(ExErrorKind::Confirmation).with_op("confirm")
            }
            ReconcileError::Sink { .. } => ExError::new(ExErrorKind::Sink).with_op("hand_off"),
        };
        let base = match err.snapshot_path() {
            Some(path) => base.with_snapshot(path),
            None => base,
        };
        base.with_message(message)
    }
}
