//! Change report presented for confirmation
//!
//! ```ignore
//! let report = build_report(&original, &modified, &changes, &lineage, &mapping)?;
//! println!("{}", render_human_summary(&report));
//! ```
//!
//! The report is a pure read view: building it never mutates either
//! snapshot, and identical inputs give an identical report.

pub mod builder;
pub mod human_summary;
pub mod model;

pub use builder::{build_report, REPORT_SCHEMA_VERSION};
pub use human_summary::render_human_summary;
pub use model::{ChangeReport, NodeSummary};
