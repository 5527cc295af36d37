//! set.rs
//! An insertion-ordered, id-indexed collection of gates with two-phase
//! construction: add every gate first, then validate forward references.

use std::collections::{HashMap, HashSet};

use log::debug;

use crate::error::EngineError;
use crate::gates::descriptor::GateDescriptor;
use crate::gates::Gate;

/// A mapping from gate id to gate, iterated in insertion order.
///
/// Gates are added once, during construction from a descriptor source, and
/// never removed. Boolean gates may reference gates defined later in the
/// same source, so presence of proxy targets is checked by [`GateSet::validate`]
/// only after every gate has been added.
#[derive(Debug, Clone, Default)]
pub struct GateSet {
    gates: Vec<Gate>,
    index: HashMap<String, usize>,
}

impl GateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a gate set from descriptor records: lowers every descriptor
    /// to a gate, then validates proxy references against the completed set.
    /// All errors are collected, not just the first.
    pub fn from_descriptors(descriptors: &[GateDescriptor]) -> Result<Self, Vec<EngineError>> {
        let mut set = Self::new();
        let mut errors = Vec::new();
        for descriptor in descriptors {
            match Gate::from_descriptor(descriptor) {
                Ok(gate) => {
                    if let Err(e) = set.add(gate) {
                        errors.push(e);
                    }
                }
                Err(e) => errors.push(e),
            }
        }
        if let Err(mut unresolved) = set.validate() {
            errors.append(&mut unresolved);
        }
        if errors.is_empty() {
            debug!("gate set built: {} gates", set.len());
            Ok(set)
        } else {
            Err(errors)
        }
    }

    /// Appends a gate. Ids are unique within the set; a repeated id fails
    /// fast with `DuplicateGateId` rather than silently overwriting.
    pub fn add(&mut self, gate: Gate) -> Result<(), EngineError> {
        let id = gate.id().to_string();
        if self.index.contains_key(&id) {
            return Err(EngineError::DuplicateGateId(id));
        }
        self.index.insert(id, self.gates.len());
        self.gates.push(gate);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Gate> {
        self.index.get(id).map(|&i| &self.gates[i])
    }

    /// Gates in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Gate> {
        self.gates.iter()
    }

    pub fn len(&self) -> usize {
        self.gates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    /// The second phase of construction: walks every gate's proxy references
    /// (recursing through boolean operands) and reports each id that is
    /// absent from the set. Descriptor sources are not topologically sorted,
    /// so this cannot run before every gate has been added.
    pub fn validate(&self) -> Result<(), Vec<EngineError>> {
        let mut targets = Vec::new();
        for gate in &self.gates {
            gate.collect_proxy_targets(&mut targets);
        }

        let mut reported = HashSet::new();
        let mut errors = Vec::new();
        for target in targets {
            if self.index.contains_key(target) || !reported.insert(target) {
                continue;
            }
            errors.push(EngineError::NoSuchGate(target.to_string()));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
