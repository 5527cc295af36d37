//! descriptor.rs
//! Gate descriptor records, as supplied by the external gating-file parser.
//!
//! The parser hands over one record per gate: id, kind tag, dimension
//! reference list and kind-specific geometry/threshold/operand data. Lowering
//! a record to an executable [`Gate`] is where domain rules are enforced.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::gates::{
    AndGate, EllipsoidGate, Gate, NotGate, OrGate, PolygonGate, PolytopeGate, ProxyGate,
    RectangleGate, TreeGate, TreeNode,
};
use crate::resolver::ParameterReference;

/// One already-parsed gate record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateDescriptor {
    pub id: String,
    /// Names of the parameters this gate reads, in dimension order. Empty
    /// for boolean and proxy kinds.
    #[serde(default)]
    pub dimensions: Vec<String>,
    #[serde(flatten)]
    pub kind: GateKindDescriptor,
}

/// Kind tag plus kind-specific payload. Boolean operands are gate ids,
/// resolved lazily, which is how forward references across one descriptor
/// source arise.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GateKindDescriptor {
    Rectangle {
        /// One `[min, max)` pair per dimension.
        ranges: Vec<(f64, f64)>,
    },
    Polygon {
        vertices: Vec<(f64, f64)>,
    },
    Polytope {
        points: Vec<Vec<f64>>,
    },
    Ellipsoid {
        focus: Vec<f64>,
        distance: f64,
        #[serde(default)]
        frame: Option<Vec<Vec<f64>>>,
    },
    Tree {
        root: TreeNode,
    },
    And {
        operands: Vec<String>,
    },
    Or {
        operands: Vec<String>,
    },
    Not {
        operand: String,
    },
    Proxy {
        target: String,
    },
}

impl Gate {
    /// Lowers a descriptor record to an executable gate, enforcing the
    /// per-kind domain rules (`InvalidGateDescription` on violation).
    pub fn from_descriptor(descriptor: &GateDescriptor) -> Result<Gate, EngineError> {
        let id = descriptor.id.clone();
        let invalid = |message: String| EngineError::InvalidGateDescription {
            gate_id: descriptor.id.clone(),
            message,
        };
        let dimensions: Vec<ParameterReference> = descriptor
            .dimensions
            .iter()
            .map(ParameterReference::named)
            .collect();

        match &descriptor.kind {
            GateKindDescriptor::Rectangle { ranges } => {
                if ranges.len() != dimensions.len() {
                    return Err(invalid(format!(
                        "{} ranges for {} dimensions",
                        ranges.len(),
                        dimensions.len()
                    )));
                }
                let bounds = dimensions
                    .into_iter()
                    .zip(ranges)
                    .map(|(d, &(min, max))| (d, min, max))
                    .collect();
                Ok(Gate::Rectangle(RectangleGate::new(id, bounds)?))
            }
            GateKindDescriptor::Polygon { vertices } => {
                let pair: [ParameterReference; 2] = dimensions.try_into().map_err(
                    |wrong: Vec<ParameterReference>| {
                        invalid(format!(
                            "polygon gate requires exactly 2 dimensions, got {}",
                            wrong.len()
                        ))
                    },
                )?;
                Ok(Gate::Polygon(PolygonGate::new(id, pair, vertices.clone())?))
            }
            GateKindDescriptor::Polytope { points } => {
                Ok(Gate::Polytope(PolytopeGate::new(id, dimensions, points.clone())?))
            }
            GateKindDescriptor::Ellipsoid { focus, distance, frame } => Ok(Gate::Ellipsoid(
                EllipsoidGate::new(id, dimensions, focus.clone(), *distance, frame.clone())?,
            )),
            GateKindDescriptor::Tree { root } => {
                Ok(Gate::Tree(TreeGate::new(id, dimensions, root.clone())?))
            }
            GateKindDescriptor::And { operands } => {
                let operands = operands.iter().map(|t| ProxyGate::to_target(t.as_str())).collect();
                Ok(Gate::And(AndGate::new(id, operands)?))
            }
            GateKindDescriptor::Or { operands } => {
                let operands = operands.iter().map(|t| ProxyGate::to_target(t.as_str())).collect();
                Ok(Gate::Or(OrGate::new(id, operands)?))
            }
            GateKindDescriptor::Not { operand } => {
                Ok(Gate::Not(NotGate::new(id, ProxyGate::to_target(operand.as_str()))))
            }
            GateKindDescriptor::Proxy { target } => {
                Ok(Gate::Proxy(ProxyGate::new(id, target)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangle_descriptor_round_trip() {
        let json = r#"{
            "id": "lymphocytes",
            "dimensions": ["fsc", "ssc"],
            "kind": "rectangle",
            "ranges": [[100.0, 400.0], [50.0, 250.0]]
        }"#;
        let descriptor: GateDescriptor = serde_json::from_str(json).unwrap();
        let gate = Gate::from_descriptor(&descriptor).unwrap();
        assert_eq!(gate.id(), "lymphocytes");
        assert_eq!(gate.dimensions().len(), 2);
    }

    #[test]
    fn test_boolean_descriptor_lowers_to_proxies() {
        let json = r#"{
            "id": "live-singlets",
            "kind": "and",
            "operands": ["live", "singlets"]
        }"#;
        let descriptor: GateDescriptor = serde_json::from_str(json).unwrap();
        let gate = Gate::from_descriptor(&descriptor).unwrap();
        match gate {
            Gate::And(and) => {
                let targets: Vec<&str> = and
                    .operands()
                    .iter()
                    .map(|g| match g {
                        Gate::Proxy(p) => p.target(),
                        other => panic!("expected proxy operand, got {other:?}"),
                    })
                    .collect();
                assert_eq!(targets, vec!["live", "singlets"]);
            }
            other => panic!("expected and gate, got {other:?}"),
        }
    }

    #[test]
    fn test_mismatched_rectangle_arity_rejected() {
        let descriptor = GateDescriptor {
            id: "bad".into(),
            dimensions: vec!["fsc".into(), "ssc".into()],
            kind: GateKindDescriptor::Rectangle { ranges: vec![(0.0, 1.0)] },
        };
        let err = Gate::from_descriptor(&descriptor).unwrap_err();
        assert!(matches!(err, EngineError::InvalidGateDescription { gate_id, .. } if gate_id == "bad"));
    }

    #[test]
    fn test_polygon_requires_two_dimensions() {
        let descriptor = GateDescriptor {
            id: "bad".into(),
            dimensions: vec!["fsc".into()],
            kind: GateKindDescriptor::Polygon {
                vertices: vec![(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)],
            },
        };
        assert!(Gate::from_descriptor(&descriptor).is_err());
    }

    #[test]
    fn test_tree_descriptor_deserializes() {
        let json = r#"{
            "id": "debris",
            "dimensions": ["fsc"],
            "kind": "tree",
            "root": {
                "node": "branch",
                "dimension": 0,
                "threshold": 30.0,
                "below": {"node": "leaf", "inside": true},
                "above": {"node": "leaf", "inside": false}
            }
        }"#;
        let descriptor: GateDescriptor = serde_json::from_str(json).unwrap();
        let gate = Gate::from_descriptor(&descriptor).unwrap();
        match gate {
            Gate::Tree(tree) => {
                assert!(tree.contains(&[10.0]));
                assert!(!tree.contains(&[40.0]));
            }
            other => panic!("expected tree gate, got {other:?}"),
        }
    }
}
