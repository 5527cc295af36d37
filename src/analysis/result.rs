//! result.rs
//! The immutable outcome of applying one gate set to one population.

use crate::error::EngineError;
use crate::model::Population;

/// A failure recorded during analysis.
#[derive(Debug, Clone, PartialEq)]
pub enum Failure {
    /// Resolver construction failed; the whole population was abandoned and
    /// no gate was evaluated.
    Analysis(EngineError),
    /// One gate failed; sibling gates were still evaluated.
    Gate { gate_id: String, error: EngineError },
}

/// One sub-population per succeeded gate, plus an enumerable set of
/// failures. Produced once per (gate set, population) pair and read-only to
/// all consumers; a batch analysis always completes and returns one of these
/// even when individual gates fail.
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    source: String,
    total_events: usize,
    gated: Vec<(String, Population)>,
    failures: Vec<Failure>,
}

impl AnalysisResult {
    pub(crate) fn new(source: &Population) -> Self {
        Self {
            source: source.name().to_string(),
            total_events: source.len(),
            gated: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub(crate) fn abandoned(source: &Population, error: EngineError) -> Self {
        let mut result = Self::new(source);
        result.failures.push(Failure::Analysis(error));
        result
    }

    pub(crate) fn record_gated(&mut self, gate_id: &str, population: Population) {
        self.gated.push((gate_id.to_string(), population));
    }

    pub(crate) fn record_gate_failure(&mut self, gate_id: &str, error: EngineError) {
        self.failures.push(Failure::Gate { gate_id: gate_id.to_string(), error });
    }

    /// Name of the analyzed population.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Event count of the analyzed population.
    pub fn total_events(&self) -> usize {
        self.total_events
    }

    /// Succeeded gates and their sub-populations, in gate-set iteration
    /// order.
    pub fn subpopulations(&self) -> impl Iterator<Item = (&str, &Population)> {
        self.gated.iter().map(|(id, pop)| (id.as_str(), pop))
    }

    pub fn subpopulation(&self, gate_id: &str) -> Option<&Population> {
        self.gated
            .iter()
            .find(|(id, _)| id == gate_id)
            .map(|(_, pop)| pop)
    }

    /// Number of events the given gate selected, if it succeeded.
    pub fn count(&self, gate_id: &str) -> Option<usize> {
        self.subpopulation(gate_id).map(Population::len)
    }

    /// Fraction of source events the given gate selected. An empty source
    /// population reports 0 for every succeeded gate.
    pub fn frequency(&self, gate_id: &str) -> Option<f64> {
        let count = self.count(gate_id)?;
        if self.total_events == 0 {
            Some(0.0)
        } else {
            Some(count as f64 / self.total_events as f64)
        }
    }

    pub fn failures(&self) -> &[Failure] {
        &self.failures
    }

    pub fn has_errors(&self) -> bool {
        !self.failures.is_empty()
    }
}
