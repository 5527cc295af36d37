//! Defines the crate-wide error type for the gating engine.
//!
//! Every error carries enough context (offending reference, gate id, cycle
//! path) to be rendered to a human without re-deriving it from the inputs.

use thiserror::Error;

/// The single error enum shared by the resolver, gate model, analyzer and
/// relations store.
///
/// Errors are `Clone + PartialEq` so analysis results can embed them and
/// tests can assert on exact values rather than matching message strings.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Two parameters across the resolver's collections share a name.
    #[error("duplicate parameter reference '{0}'")]
    DuplicateReference(String),

    /// A parameter transitively depends on itself. The cycle path starts and
    /// ends with the same parameter (a self-dependency reports `[P, P]`).
    #[error("circular parameter dependency: {}", .cycle.join(" -> "))]
    CircularDependency { cycle: Vec<String> },

    /// A reference did not resolve against any contributing collection.
    #[error("no parameter named '{0}'")]
    NoSuchParameter(String),

    /// A proxy gate's target id is absent from the gate set.
    #[error("no gate with id '{0}'")]
    NoSuchGate(String),

    /// Value extraction failed for an event (missing channel, malformed
    /// derived-parameter input, zero denominator, ...).
    #[error("data retrieval failed for '{reference}': {message}")]
    DataRetrieval { reference: String, message: String },

    /// A gate descriptor violated a domain rule (empty range, wrong
    /// dimensionality, and so on).
    #[error("invalid description for gate '{gate_id}': {message}")]
    InvalidGateDescription { gate_id: String, message: String },

    /// A non-duplicate-allowing relation of the same kind is already
    /// registered at this scope. The store is unchanged.
    #[error("duplicate {kind} relation at {scope}")]
    DuplicateRelation { kind: String, scope: String },

    /// A gate with this id is already present in the gate set.
    #[error("duplicate gate id '{0}'")]
    DuplicateGateId(String),

    /// Proxy gates form a reference loop (e.g. a boolean gate that, through
    /// proxies, names itself as an operand).
    #[error("circular gate reference: {}", .path.join(" -> "))]
    CircularGateReference { path: Vec<String> },
}
