//! Core types shared across the OncoTree reconciliation facilities
//!
//! - **Correlation types**: RunId tags every log event of one invocation
//! - **Schema constants**: Canonical field keys and event names

pub mod correlation;
pub mod schema;

pub use correlation::RunId;
