//! flowgate_core: the gating engine for flow-cytometry event data.
//!
//! The crate evaluates user-defined region predicates ("gates") against
//! populations of measured events, resolves symbolic channel/derived-value
//! references across independently-defined parameter collections, and
//! associates metadata relations (gating files, compensation matrices,
//! transformations) with data sets under override rules.
//!
//! File parsing lives outside this crate: loaders hand over populations,
//! parameter collections and already-parsed descriptor records, and read
//! analysis results back out.

pub mod analysis;
pub mod error;
pub mod gates;
pub mod model;
pub mod relations;
pub mod resolver;

// Re-export the surface consumed by the batch driver.
pub use analysis::{AnalysisResult, Analyzer, Failure};
pub use error::EngineError;
pub use gates::{Gate, GateDescriptor, GateSet};
pub use model::{Event, Population};
pub use relations::{Relation, RelationsStore};
pub use resolver::{Parameter, ParameterCollection, ParameterReference, Resolver};
