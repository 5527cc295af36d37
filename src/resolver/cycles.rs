//! cycles.rs
//! Eager dependency-cycle analysis over a resolver's parameter universe.

use std::sync::Arc;

use petgraph::graph::{DiGraph, NodeIndex};

use crate::error::EngineError;
use crate::resolver::parameter::Parameter;

/// Proves every parameter cycle-free, or reports the first cycle found.
///
/// Dependency edges are added only where the referenced name resolves within
/// `parameters` (first match in slice order, mirroring the resolver's scan).
/// Dangling references are intentionally ignored here: a gate file may carry
/// references that are invalid only for *other* gates, so a dangling edge is
/// reported at use time as `NoSuchParameter`, not at construction.
///
/// The reported cycle is the minimal repeated subsequence found by
/// depth-first search: its first and last element are the same parameter, so
/// a self-dependency reports `[P, P]`.
pub fn check(parameters: &[Arc<dyn Parameter>]) -> Result<(), EngineError> {
    let mut graph: DiGraph<usize, ()> = DiGraph::with_capacity(parameters.len(), 0);
    let nodes: Vec<NodeIndex> = (0..parameters.len()).map(|i| graph.add_node(i)).collect();

    for (i, parameter) in parameters.iter().enumerate() {
        for dependency in parameter.dependencies() {
            let Some(name) = dependency.name() else { continue };
            let target = parameters
                .iter()
                .position(|p| p.reference().name() == Some(name));
            if let Some(j) = target {
                graph.add_edge(nodes[i], nodes[j], ());
            }
        }
    }

    let mut state = vec![VisitState::None; parameters.len()];
    let mut path: Vec<NodeIndex> = Vec::new();
    for &node in &nodes {
        if state[graph[node]] == VisitState::None {
            if let Some(cycle) = visit(&graph, node, &mut state, &mut path) {
                let names = cycle
                    .iter()
                    .map(|&n| parameters[graph[n]].reference().to_string())
                    .collect();
                return Err(EngineError::CircularDependency { cycle: names });
            }
        }
    }
    Ok(())
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum VisitState {
    None,
    Visiting,
    Visited,
}

fn visit(
    graph: &DiGraph<usize, ()>,
    node: NodeIndex,
    state: &mut Vec<VisitState>,
    path: &mut Vec<NodeIndex>,
) -> Option<Vec<NodeIndex>> {
    let idx = graph[node];
    match state[idx] {
        VisitState::Visited => return None,
        VisitState::Visiting => {
            // Back edge: the cycle is the path suffix from the first visit of
            // `node`, closed by `node` itself.
            let start = path.iter().position(|&n| n == node).unwrap_or(0);
            let mut cycle = path[start..].to_vec();
            cycle.push(node);
            return Some(cycle);
        }
        VisitState::None => state[idx] = VisitState::Visiting,
    }

    path.push(node);
    for successor in graph.neighbors(node) {
        if let Some(cycle) = visit(graph, successor, state, path) {
            return Some(cycle);
        }
    }
    path.pop();

    state[idx] = VisitState::Visited;
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::parameter::{DerivedOp, DerivedParameter};

    fn derived(name: &str, inputs: &[&str]) -> Arc<dyn Parameter> {
        Arc::new(DerivedParameter::new(
            name.into(),
            DerivedOp::Sum,
            inputs.iter().map(|&i| i.into()).collect(),
        ))
    }

    #[test]
    fn test_self_dependency_reports_minimal_pair() {
        let p = derived("p", &["p"]);
        let err = check(&[p]).unwrap_err();
        assert_eq!(
            err,
            EngineError::CircularDependency { cycle: vec!["p".into(), "p".into()] }
        );
    }

    #[test]
    fn test_two_step_cycle_closed_on_first_element() {
        let a = derived("a", &["b"]);
        let b = derived("b", &["a"]);
        let err = check(&[a, b]).unwrap_err();
        match err {
            EngineError::CircularDependency { cycle } => {
                assert_eq!(cycle.len(), 3);
                assert_eq!(cycle.first(), cycle.last());
                assert!(cycle.contains(&"a".to_string()) && cycle.contains(&"b".to_string()));
            }
            other => panic!("expected CircularDependency, got {other:?}"),
        }
    }

    #[test]
    fn test_dangling_dependency_is_not_a_cycle() {
        // "missing" resolves nowhere; the edge is dropped and the check passes.
        let a = derived("a", &["missing"]);
        assert!(check(&[a]).is_ok());
    }

    #[test]
    fn test_diamond_is_cycle_free() {
        let d = derived("d", &["b", "c"]);
        let b = derived("b", &["a"]);
        let c = derived("c", &["a"]);
        let a = derived("a", &[]);
        assert!(check(&[d, b, c, a]).is_ok());
    }
}
