//! End-to-end reconciliation run
//!
//! Load → ValidateOriginal → ValidateModified → Reconcile → ValidateLineage
//! → Present → Confirm → Accept (hand off) or Decline.
//!
//! The first fatal stage ends the run with an [`ExError`]. Exit behaviour is
//! left to the caller.

use std::path::PathBuf;
use std::time::Instant;

use oncotree_core_types::RunId;

use crate::config::ReconcileConfig;
use crate::confirm::ChangeConfirmer;
use crate::errors::{ExError, Result};
use crate::lineage::{validate_lineage, Lineage};
use crate::mapping::{CodeMapping, CodeMappingSource};
use crate::model::SnapshotSchema;
use crate::reconcile::{reconcile, ChangeSet};
use crate::report::{build_report, ChangeReport};
use crate::rules::validation::load_and_validate;
use crate::sink::AcceptedSink;
use crate::snapshot::Snapshot;
use crate::{log_op_end, log_op_error, log_op_start};

#[derive(Debug, Clone)]
pub struct ReconcileRequest {
    pub original_path: PathBuf,
    pub modified_path: PathBuf,
    pub config: ReconcileConfig,
}

/// Everything derived for one (original, modified) pair, before confirmation
#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub original: Snapshot,
    pub modified: Snapshot,
    pub changes: ChangeSet,
    pub lineage: Lineage,
    pub report: ChangeReport,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Confirmed and handed to the sink
    Accepted(ChangeReport),
    /// The confirmer said the changes were not intentional
    Declined(ChangeReport),
}

impl Outcome {
    pub fn report(&self) -> &ChangeReport {
        match self {
            Outcome::Accepted(report) | Outcome::Declined(report) => report,
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Outcome::Accepted(_))
    }
}

/// Run every stage up to and including the report
///
/// # Errors
/// The first fatal violation of any stage.
pub fn prepare(
    request: &ReconcileRequest,
    mapping: &dyn CodeMappingSource,
) -> Result<Reconciliation> {
    let config = &request.config;
    let original = load_and_validate(&request.original_path, SnapshotSchema::Original, config)?;
    let modified = load_and_validate(&request.modified_path, SnapshotSchema::Modified, config)?;
    let codes = fetch_code_mapping(mapping)?;
    let changes = reconcile(&original, &modified, config)?;
    let lineage = validate_lineage(&modified, &changes.added)?;
    let report = build_report(&original, &modified, &changes, &lineage, &codes)?;
    Ok(Reconciliation {
        original,
        modified,
        changes,
        lineage,
        report,
    })
}

/// Run the whole pipeline, asking `confirmer` before handing off to `sink`
///
/// # Errors
/// Any fatal stage error, converted to the canonical [`ExError`].
pub fn run(
    request: &ReconcileRequest,
    mapping: &dyn CodeMappingSource,
    confirmer: &dyn ChangeConfirmer,
    sink: &dyn AcceptedSink,
) -> std::result::Result<Outcome, ExError> {
    let run_id = RunId::new();
    let span = tracing::info_span!("run_pipeline", run_id = %run_id);
    let _guard = span.enter();

    log_op_start!(
        "run_pipeline",
        run_id = %run_id,
        original_path = %request.original_path.display(),
        modified_path = %request.modified_path.display()
    );
    let start = Instant::now();
    match run_impl(request, mapping, confirmer, sink) {
        Ok(outcome) => {
            log_op_end!(
                "run_pipeline",
                duration_ms = start.elapsed().as_millis() as u64,
                run_id = %run_id,
                accepted = outcome.is_accepted()
            );
            Ok(outcome)
        }
        Err(e) => {
            log_op_error!(
                "run_pipeline",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                run_id = %run_id
            );
            Err(e)
        }
    }
}

fn run_impl(
    request: &ReconcileRequest,
    mapping: &dyn CodeMappingSource,
    confirmer: &dyn ChangeConfirmer,
    sink: &dyn AcceptedSink,
) -> std::result::Result<Outcome, ExError> {
    let reconciliation = prepare(request, mapping)?;
    if !confirmer.confirm(&reconciliation.report)? {
        tracing::warn!("Changes were not confirmed as intentional");
        return Ok(Outcome::Declined(reconciliation.report));
    }
    sink.accept(&reconciliation.modified, &reconciliation.report)?;
    Ok(Outcome::Accepted(reconciliation.report))
}

fn fetch_code_mapping(source: &dyn CodeMappingSource) -> Result<CodeMapping> {
    log_op_start!("fetch_code_mapping");
    let start = Instant::now();
    match source.fetch() {
        Ok(mapping) => {
            log_op_end!(
                "fetch_code_mapping",
                duration_ms = start.elapsed().as_millis() as u64,
                mapping_count = mapping.len()
            );
            Ok(mapping)
        }
        Err(e) => {
            log_op_error!(
                "fetch_code_mapping",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            Err(e)
        }
    }
}
