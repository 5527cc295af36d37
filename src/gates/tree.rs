//! tree.rs
//! Decision-tree gates: a binary tree of per-dimension threshold tests.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::resolver::ParameterReference;

/// One node of a decision tree.
///
/// Internal nodes test a single dimension (an index into the gate's
/// dimension list) against a threshold: values strictly below the threshold
/// walk the `below` branch, values at or above it walk `above`. Leaves
/// assign inside/outside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum TreeNode {
    Leaf { inside: bool },
    Branch {
        dimension: usize,
        threshold: f64,
        below: Box<TreeNode>,
        above: Box<TreeNode>,
    },
}

impl TreeNode {
    fn max_dimension(&self) -> Option<usize> {
        match self {
            TreeNode::Leaf { .. } => None,
            TreeNode::Branch { dimension, below, above, .. } => {
                let mut max = *dimension;
                if let Some(d) = below.max_dimension() {
                    max = max.max(d);
                }
                if let Some(d) = above.max_dimension() {
                    max = max.max(d);
                }
                Some(max)
            }
        }
    }
}

/// A gate evaluated by walking a decision tree from its root, one event at
/// a time.
#[derive(Debug, Clone)]
pub struct TreeGate {
    id: String,
    dimensions: Vec<ParameterReference>,
    root: TreeNode,
}

impl TreeGate {
    pub fn new(
        id: impl Into<String>,
        dimensions: Vec<ParameterReference>,
        root: TreeNode,
    ) -> Result<Self, EngineError> {
        let id = id.into();
        if dimensions.is_empty() {
            return Err(EngineError::InvalidGateDescription {
                gate_id: id,
                message: "tree gate requires at least one dimension".into(),
            });
        }
        if let Some(max) = root.max_dimension() {
            if max >= dimensions.len() {
                return Err(EngineError::InvalidGateDescription {
                    gate_id: id,
                    message: format!(
                        "tree references dimension index {max}, but only {} dimensions are declared",
                        dimensions.len()
                    ),
                });
            }
        }
        Ok(Self { id, dimensions, root })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn dimensions(&self) -> &[ParameterReference] {
        &self.dimensions
    }

    pub fn contains(&self, point: &[f64]) -> bool {
        let mut node = &self.root;
        loop {
            match node {
                TreeNode::Leaf { inside } => return *inside,
                TreeNode::Branch { dimension, threshold, below, above } => {
                    node = if point[*dimension] < *threshold { below } else { above };
                }
            }
        }
    }
}
