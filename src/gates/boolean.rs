//! boolean.rs
//! Boolean combinations of gates, and the proxy gate that stands in for a
//! gate identified only by id.

use crate::error::EngineError;
use crate::gates::{Gate, GateSet};
use crate::model::Population;
use crate::resolver::Resolver;

fn invalid(gate_id: &str, message: impl Into<String>) -> EngineError {
    EngineError::InvalidGateDescription {
        gate_id: gate_id.to_string(),
        message: message.into(),
    }
}

/// Intersection of its operands' inside-sets.
#[derive(Debug, Clone)]
pub struct AndGate {
    id: String,
    operands: Vec<Gate>,
}

impl AndGate {
    pub fn new(id: impl Into<String>, operands: Vec<Gate>) -> Result<Self, EngineError> {
        let id = id.into();
        if operands.len() < 2 {
            return Err(invalid(&id, format!("and gate requires at least 2 operands, got {}", operands.len())));
        }
        Ok(Self { id, operands })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn operands(&self) -> &[Gate] {
        &self.operands
    }

    pub(crate) fn mask(
        &self,
        population: &Population,
        resolver: &Resolver,
        gates: &GateSet,
        active: &mut Vec<String>,
    ) -> Result<Vec<bool>, EngineError> {
        let mut combined = vec![true; population.len()];
        for operand in &self.operands {
            let mask = operand.mask(population, resolver, gates, active)?;
            for (c, m) in combined.iter_mut().zip(mask) {
                *c = *c && m;
            }
        }
        Ok(combined)
    }
}

/// Union of its operands' inside-sets.
#[derive(Debug, Clone)]
pub struct OrGate {
    id: String,
    operands: Vec<Gate>,
}

impl OrGate {
    pub fn new(id: impl Into<String>, operands: Vec<Gate>) -> Result<Self, EngineError> {
        let id = id.into();
        if operands.len() < 2 {
            return Err(invalid(&id, format!("or gate requires at least 2 operands, got {}", operands.len())));
        }
        Ok(Self { id, operands })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn operands(&self) -> &[Gate] {
        &self.operands
    }

    pub(crate) fn mask(
        &self,
        population: &Population,
        resolver: &Resolver,
        gates: &GateSet,
        active: &mut Vec<String>,
    ) -> Result<Vec<bool>, EngineError> {
        let mut combined = vec![false; population.len()];
        for operand in &self.operands {
            let mask = operand.mask(population, resolver, gates, active)?;
            for (c, m) in combined.iter_mut().zip(mask) {
                *c = *c || m;
            }
        }
        Ok(combined)
    }
}

/// Complement of its operand's inside-set within the evaluated population.
#[derive(Debug, Clone)]
pub struct NotGate {
    id: String,
    operand: Box<Gate>,
}

impl NotGate {
    pub fn new(id: impl Into<String>, operand: Gate) -> Self {
        Self { id: id.into(), operand: Box::new(operand) }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn operand(&self) -> &Gate {
        &self.operand
    }

    pub(crate) fn mask(
        &self,
        population: &Population,
        resolver: &Resolver,
        gates: &GateSet,
        active: &mut Vec<String>,
    ) -> Result<Vec<bool>, EngineError> {
        let mut mask = self.operand.mask(population, resolver, gates, active)?;
        for m in &mut mask {
            *m = !*m;
        }
        Ok(mask)
    }
}

/// Holds only a gate id; evaluation looks the id up in the gate set supplied
/// at evaluation time and delegates to the target.
#[derive(Debug, Clone)]
pub struct ProxyGate {
    id: String,
    target: String,
}

impl ProxyGate {
    pub fn new(id: impl Into<String>, target: impl Into<String>) -> Self {
        Self { id: id.into(), target: target.into() }
    }

    /// A proxy used as a boolean operand, where only the target id matters.
    pub fn to_target(target: impl Into<String>) -> Gate {
        let target = target.into();
        Gate::Proxy(Self { id: target.clone(), target })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub(crate) fn mask(
        &self,
        population: &Population,
        resolver: &Resolver,
        gates: &GateSet,
        active: &mut Vec<String>,
    ) -> Result<Vec<bool>, EngineError> {
        if active.iter().any(|id| id == &self.target) {
            let mut path = active.clone();
            path.push(self.target.clone());
            return Err(EngineError::CircularGateReference { path });
        }
        let target = gates
            .get(&self.target)
            .ok_or_else(|| EngineError::NoSuchGate(self.target.clone()))?;

        active.push(self.target.clone());
        let mask = target.mask(population, resolver, gates, active);
        active.pop();
        mask
    }
}
