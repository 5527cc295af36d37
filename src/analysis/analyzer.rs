//! analyzer.rs
//! Applies every gate in a gate set to one or more populations, isolating
//! per-gate failures so one bad gate never aborts the batch.

use std::sync::Arc;

use log::{debug, warn};
use rayon::prelude::*;

use crate::analysis::result::AnalysisResult;
use crate::gates::GateSet;
use crate::model::Population;
use crate::resolver::{ParameterCollection, Resolver};

/// Drives gate evaluation over populations.
///
/// The analyzer may carry additional parameter collections (compensated or
/// transformed channels configured by the surrounding application); they are
/// layered on top of each population's own default resolver.
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    collections: Vec<ParameterCollection>,
}

impl Analyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_collections(collections: Vec<ParameterCollection>) -> Self {
        Self { collections }
    }

    /// Analyzes one population.
    ///
    /// Resolver construction combines the population's default resolver with
    /// this analyzer's collections; if that fails, the whole analysis is
    /// abandoned and the result carries exactly one top-level error and no
    /// sub-populations. Otherwise every gate is evaluated in gate-set
    /// iteration order: a failing gate is recorded and its siblings still
    /// run.
    pub fn analyze(&self, gates: &GateSet, population: &Population) -> AnalysisResult {
        let resolver = match Resolver::new(
            self.collections.clone(),
            Some(Arc::clone(population.resolver())),
        ) {
            Ok(resolver) => resolver,
            Err(error) => {
                warn!(
                    "abandoning analysis of '{}': resolver construction failed: {error}",
                    population.name()
                );
                return AnalysisResult::abandoned(population, error);
            }
        };

        let mut result = AnalysisResult::new(population);
        for gate in gates.iter() {
            match gate.evaluate(population, &resolver, gates) {
                Ok(events) => {
                    let sub = population.derive(gate.id(), events);
                    result.record_gated(gate.id(), sub);
                }
                Err(error) => {
                    warn!("gate '{}' failed on '{}': {error}", gate.id(), population.name());
                    result.record_gate_failure(gate.id(), error);
                }
            }
        }
        debug!(
            "analyzed '{}': {} gates, {} failures",
            population.name(),
            gates.len(),
            result.failures().len()
        );
        result
    }

    /// Analyzes a collection of populations. Populations share no mutable
    /// state, so the fan-out runs in parallel; output order matches input
    /// order.
    pub fn analyze_many(&self, gates: &GateSet, populations: &[Population]) -> Vec<AnalysisResult> {
        populations
            .par_iter()
            .map(|population| self.analyze(gates, population))
            .collect()
    }

    /// Batch variant over a list of population collections.
    pub fn analyze_batches(
        &self,
        gates: &GateSet,
        batches: &[Vec<Population>],
    ) -> Vec<Vec<AnalysisResult>> {
        batches
            .iter()
            .map(|populations| self.analyze_many(gates, populations))
            .collect()
    }
}
