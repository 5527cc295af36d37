//! Batch analysis: applying a gate set to populations with per-gate failure
//! isolation.

pub mod analyzer;
pub mod result;

pub use analyzer::Analyzer;
pub use result::{AnalysisResult, Failure};
