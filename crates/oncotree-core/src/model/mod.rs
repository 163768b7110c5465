//! Taxonomy node model and snapshot schemas

pub mod node;
pub mod schema;

pub use node::{Column, TaxonomyNode};
pub use schema::SnapshotSchema;
