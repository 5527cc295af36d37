//! The gate model: a closed set of region predicates over populations.
//!
//! Every variant is a case of the [`Gate`] enum and is routed by exhaustive
//! match, so adding a variant is a compile-time obligation everywhere gates
//! are consumed (no runtime "no handler found" fallback).

pub mod boolean;
pub mod descriptor;
pub mod geometry;
pub mod set;
pub mod tree;

pub use boolean::{AndGate, NotGate, OrGate, ProxyGate};
pub use descriptor::{GateDescriptor, GateKindDescriptor};
pub use geometry::{EllipsoidGate, PolygonGate, PolytopeGate, RectangleGate};
pub use set::GateSet;
pub use tree::{TreeGate, TreeNode};

use smallvec::SmallVec;

use crate::error::EngineError;
use crate::model::{Event, Population};
use crate::resolver::{ParameterReference, Resolver};

/// One event's coordinates along a gate's dimensions. Gates reference 1-4
/// dimensions in practice, so this stays on the stack.
pub(crate) type Coordinates = SmallVec<[f64; 4]>;

/// A named predicate selecting a subset of events from a population.
#[derive(Debug, Clone)]
pub enum Gate {
    Rectangle(RectangleGate),
    Polygon(PolygonGate),
    Polytope(PolytopeGate),
    Ellipsoid(EllipsoidGate),
    Tree(TreeGate),
    And(AndGate),
    Or(OrGate),
    Not(NotGate),
    Proxy(ProxyGate),
}

impl Gate {
    pub fn id(&self) -> &str {
        match self {
            Gate::Rectangle(g) => g.id(),
            Gate::Polygon(g) => g.id(),
            Gate::Polytope(g) => g.id(),
            Gate::Ellipsoid(g) => g.id(),
            Gate::Tree(g) => g.id(),
            Gate::And(g) => g.id(),
            Gate::Or(g) => g.id(),
            Gate::Not(g) => g.id(),
            Gate::Proxy(g) => g.id(),
        }
    }

    /// The parameter references this gate reads per event. Boolean and proxy
    /// gates have none of their own; their operands carry the dimensions.
    pub fn dimensions(&self) -> &[ParameterReference] {
        match self {
            Gate::Rectangle(g) => g.dimensions(),
            Gate::Polygon(g) => g.dimensions(),
            Gate::Polytope(g) => g.dimensions(),
            Gate::Ellipsoid(g) => g.dimensions(),
            Gate::Tree(g) => g.dimensions(),
            Gate::And(_) | Gate::Or(_) | Gate::Not(_) | Gate::Proxy(_) => &[],
        }
    }

    /// Evaluates the predicate, returning the events that satisfy it in
    /// population order.
    ///
    /// A single event's retrieval failure aborts the whole gate: partial
    /// results are discarded and the error surfaces to the caller.
    pub fn evaluate(
        &self,
        population: &Population,
        resolver: &Resolver,
        gates: &GateSet,
    ) -> Result<Vec<Event>, EngineError> {
        let mut active = Vec::new();
        let mask = self.mask(population, resolver, gates, &mut active)?;
        Ok(population
            .events()
            .iter()
            .zip(&mask)
            .filter(|&(_, &inside)| inside)
            .map(|(event, _)| event.clone())
            .collect())
    }

    /// Positional membership mask over `population`'s events. Boolean set
    /// algebra works on masks, so intersection/union/complement are
    /// elementwise and order-independent by construction.
    ///
    /// `active` is the stack of proxy-resolved gate ids currently being
    /// evaluated; it turns mutually-recursive proxies into an error instead
    /// of unbounded recursion.
    pub(crate) fn mask(
        &self,
        population: &Population,
        resolver: &Resolver,
        gates: &GateSet,
        active: &mut Vec<String>,
    ) -> Result<Vec<bool>, EngineError> {
        match self {
            Gate::Rectangle(g) => region_mask(population, resolver, g.dimensions(), |p| g.contains(p)),
            Gate::Polygon(g) => region_mask(population, resolver, g.dimensions(), |p| g.contains(p)),
            Gate::Polytope(g) => region_mask(population, resolver, g.dimensions(), |p| g.contains(p)),
            Gate::Ellipsoid(g) => region_mask(population, resolver, g.dimensions(), |p| g.contains(p)),
            Gate::Tree(g) => region_mask(population, resolver, g.dimensions(), |p| g.contains(p)),
            Gate::And(g) => g.mask(population, resolver, gates, active),
            Gate::Or(g) => g.mask(population, resolver, gates, active),
            Gate::Not(g) => g.mask(population, resolver, gates, active),
            Gate::Proxy(g) => g.mask(population, resolver, gates, active),
        }
    }

    /// Appends every gate id this gate references through proxies,
    /// recursing into boolean operands. Used by `GateSet::validate`.
    pub(crate) fn collect_proxy_targets<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Gate::Rectangle(_)
            | Gate::Polygon(_)
            | Gate::Polytope(_)
            | Gate::Ellipsoid(_)
            | Gate::Tree(_) => {}
            Gate::And(g) => {
                for operand in g.operands() {
                    operand.collect_proxy_targets(out);
                }
            }
            Gate::Or(g) => {
                for operand in g.operands() {
                    operand.collect_proxy_targets(out);
                }
            }
            Gate::Not(g) => g.operand().collect_proxy_targets(out),
            Gate::Proxy(g) => out.push(g.target()),
        }
    }
}

/// Extracts each event's coordinates along `dimensions` and applies a pure
/// point-membership test. Shared by every geometric variant and the decision
/// tree.
fn region_mask(
    population: &Population,
    resolver: &Resolver,
    dimensions: &[ParameterReference],
    contains: impl Fn(&[f64]) -> bool,
) -> Result<Vec<bool>, EngineError> {
    let mut mask = Vec::with_capacity(population.len());
    for event in population.events() {
        let point = coordinates(dimensions, event, resolver)?;
        mask.push(contains(&point));
    }
    Ok(mask)
}

pub(crate) fn coordinates(
    dimensions: &[ParameterReference],
    event: &Event,
    resolver: &Resolver,
) -> Result<Coordinates, EngineError> {
    let mut point = Coordinates::with_capacity(dimensions.len());
    for dimension in dimensions {
        point.push(resolver.value(dimension, event)?);
    }
    Ok(point)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::resolver::{ChannelParameter, Parameter, ParameterCollection};

    fn make_population(rows: Vec<Vec<f64>>) -> Population {
        let collection = ParameterCollection::from_parameters(vec![
            Arc::new(ChannelParameter::new("fsc".into(), 0)) as Arc<dyn Parameter>,
            Arc::new(ChannelParameter::new("ssc".into(), 1)) as Arc<dyn Parameter>,
        ])
        .unwrap();
        let resolver = Arc::new(Resolver::new(vec![collection], None).unwrap());
        let events = rows.into_iter().map(Event::from).collect();
        Population::new("tube-1", events, resolver)
    }

    #[test]
    fn test_evaluate_preserves_population_order() {
        let population = make_population(vec![
            vec![5.0, 0.0],
            vec![50.0, 0.0],
            vec![15.0, 0.0],
            vec![25.0, 0.0],
        ]);
        let gate = Gate::Rectangle(
            RectangleGate::new("mid", vec![("fsc".into(), 10.0, 30.0)]).unwrap(),
        );
        let selected = gate
            .evaluate(&population, population.resolver(), &GateSet::new())
            .unwrap();
        let values: Vec<f64> = selected.iter().map(|e| e.channel(0).unwrap()).collect();
        assert_eq!(values, vec![15.0, 25.0]);
    }

    #[test]
    fn test_one_bad_event_aborts_the_whole_gate() {
        // The third event is missing the ssc channel: no partial result is
        // returned for the events that did evaluate.
        let population = make_population(vec![
            vec![5.0, 5.0],
            vec![6.0, 6.0],
            vec![7.0],
        ]);
        let gate = Gate::Rectangle(
            RectangleGate::new("r", vec![("ssc".into(), 0.0, 10.0)]).unwrap(),
        );
        let err = gate
            .evaluate(&population, population.resolver(), &GateSet::new())
            .unwrap_err();
        assert!(matches!(err, EngineError::DataRetrieval { reference, .. } if reference == "ssc"));
    }

    #[test]
    fn test_or_gate_unions_operands() {
        let population = make_population(vec![
            vec![5.0, 0.0],
            vec![15.0, 0.0],
            vec![25.0, 0.0],
        ]);
        let low = Gate::Rectangle(
            RectangleGate::new("low", vec![("fsc".into(), 0.0, 10.0)]).unwrap(),
        );
        let high = Gate::Rectangle(
            RectangleGate::new("high", vec![("fsc".into(), 20.0, 30.0)]).unwrap(),
        );
        let either = Gate::Or(OrGate::new("either", vec![low, high]).unwrap());
        let selected = either
            .evaluate(&population, population.resolver(), &GateSet::new())
            .unwrap();
        let values: Vec<f64> = selected.iter().map(|e| e.channel(0).unwrap()).collect();
        assert_eq!(values, vec![5.0, 25.0]);
    }
}
