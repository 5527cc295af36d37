//! Typed metadata relations between data files/data sets and external
//! resources (gating definitions, compensation matrices, transformations).

pub mod store;
pub mod types;

pub use store::RelationsStore;
pub use types::{Relation, RelationKind};
