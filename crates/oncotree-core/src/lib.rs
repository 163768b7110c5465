//! OncoTree Core - snapshot reconciliation and validation engine
//!
//! This crate checks a curator-edited OncoTree export against the export it
//! was derived from, including:
//! - Per-snapshot structural validation (headers, required fields, unique keys)
//! - Label and parent-link integrity, reported in full
//! - Internal id reconciliation with resource URI immutability
//! - Precursor and revocation lineage checks
//! - A deterministic change report for human confirmation
//!
//! Nothing is persisted; accepted snapshots are handed to an [`sink::AcceptedSink`].

pub use oncotree_core_types;

pub mod config;
pub mod confirm;
pub mod errors;
pub mod lineage;
pub mod logging_facility;
pub mod mapping;
pub mod model;
pub mod pipeline;
pub mod reconcile;
pub mod report;
pub mod resolve;
pub mod rules;
pub mod sink;
pub mod snapshot;

// Re-export commonly used types
pub use config::ReconcileConfig;
pub use confirm::{AlwaysAccept, AlwaysDecline, ChangeConfirmer};
pub use errors::{ExError, ExErrorKind, ReconcileError, Result};
pub use mapping::{CodeMapping, CodeMappingSource, StaticCodeMapping};
pub use model::{Column, SnapshotSchema, TaxonomyNode};
pub use pipeline::{prepare, run, Outcome, ReconcileRequest, Reconciliation};
pub use report::{render_human_summary, ChangeReport};
pub use sink::{AcceptedSink, NoopSink};
pub use snapshot::Snapshot;
