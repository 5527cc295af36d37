//! parameter.rs
//! Named scalar extractors over events, and the collections that hold them.

use std::fmt;
use std::sync::Arc;

use crate::error::EngineError;
use crate::model::Event;
use crate::resolver::retriever::Resolver;

/// The symbolic name used to look a [`Parameter`] up inside a collection.
///
/// `Anonymous` is the reserved sentinel for parameters that cannot be
/// referenced by name (synthetic/internal parameters). It is exempt from
/// duplicate checks and never resolves.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParameterReference {
    Named(Arc<str>),
    Anonymous,
}

impl ParameterReference {
    pub fn named(name: impl AsRef<str>) -> Self {
        Self::Named(Arc::from(name.as_ref()))
    }

    /// The name, or `None` for the anonymous sentinel.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Named(name) => Some(name),
            Self::Anonymous => None,
        }
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, Self::Anonymous)
    }
}

impl fmt::Display for ParameterReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.write_str(name),
            Self::Anonymous => f.write_str("<anonymous>"),
        }
    }
}

impl From<&str> for ParameterReference {
    fn from(name: &str) -> Self {
        Self::named(name)
    }
}

/// A named, possibly-derived scalar extractor over an [`Event`].
///
/// Extraction may recursively resolve further references through the *same*
/// resolver that dispatched to it, which is why dependency cycles are
/// rejected eagerly at resolver construction. Identity for cycle reporting
/// and memoization purposes is `Arc` pointer identity, not name equality.
pub trait Parameter: fmt::Debug + Send + Sync {
    /// The reference this parameter can be looked up by.
    fn reference(&self) -> &ParameterReference;

    /// References to other parameters consulted by [`Parameter::value`].
    /// Dangling entries are tolerated here and reported at use time.
    fn dependencies(&self) -> &[ParameterReference] {
        &[]
    }

    /// Extracts this parameter's value from `event`.
    fn value(&self, event: &Event, resolver: &Resolver) -> Result<f64, EngineError>;
}

/// A direct read of one measured channel (0-based index).
#[derive(Debug, Clone)]
pub struct ChannelParameter {
    reference: ParameterReference,
    channel: usize,
}

impl ChannelParameter {
    pub fn new(reference: ParameterReference, channel: usize) -> Self {
        Self { reference, channel }
    }

    pub fn channel(&self) -> usize {
        self.channel
    }
}

impl Parameter for ChannelParameter {
    fn reference(&self) -> &ParameterReference {
        &self.reference
    }

    fn value(&self, event: &Event, _resolver: &Resolver) -> Result<f64, EngineError> {
        event
            .channel(self.channel)
            .ok_or_else(|| EngineError::DataRetrieval {
                reference: self.reference.to_string(),
                message: format!(
                    "event has {} channels, channel {} requested",
                    event.len(),
                    self.channel
                ),
            })
    }
}

/// The combination applied by a [`DerivedParameter`] to its resolved inputs.
#[derive(Debug, Clone, PartialEq)]
pub enum DerivedOp {
    /// Sum of all inputs.
    Sum,
    /// First input minus the remaining ones.
    Difference,
    /// Product of all inputs.
    Product,
    /// First input divided by the second (exactly two inputs).
    Ratio,
    /// Single input multiplied by a constant factor.
    Scale(f64),
}

/// A derived parameter: a tagged operation over named input references,
/// resolved recursively through the resolver at extraction time (ratio and
/// compensated channels in the source domain).
#[derive(Debug, Clone)]
pub struct DerivedParameter {
    reference: ParameterReference,
    op: DerivedOp,
    inputs: Vec<ParameterReference>,
}

impl DerivedParameter {
    pub fn new(
        reference: ParameterReference,
        op: DerivedOp,
        inputs: Vec<ParameterReference>,
    ) -> Self {
        Self { reference, op, inputs }
    }

    fn retrieval_error(&self, message: impl Into<String>) -> EngineError {
        EngineError::DataRetrieval {
            reference: self.reference.to_string(),
            message: message.into(),
        }
    }
}

impl Parameter for DerivedParameter {
    fn reference(&self) -> &ParameterReference {
        &self.reference
    }

    fn dependencies(&self) -> &[ParameterReference] {
        &self.inputs
    }

    fn value(&self, event: &Event, resolver: &Resolver) -> Result<f64, EngineError> {
        let mut values = Vec::with_capacity(self.inputs.len());
        for input in &self.inputs {
            values.push(resolver.value(input, event)?);
        }

        match &self.op {
            DerivedOp::Sum => Ok(values.iter().sum()),
            DerivedOp::Product => Ok(values.iter().product()),
            DerivedOp::Difference => {
                let (first, rest) = values
                    .split_first()
                    .ok_or_else(|| self.retrieval_error("difference requires at least one input"))?;
                Ok(rest.iter().fold(*first, |acc, v| acc - v))
            }
            DerivedOp::Ratio => {
                if values.len() != 2 {
                    return Err(self.retrieval_error(format!(
                        "ratio requires exactly 2 inputs, got {}",
                        values.len()
                    )));
                }
                if values[1] == 0.0 {
                    return Err(self.retrieval_error("ratio denominator is zero"));
                }
                Ok(values[0] / values[1])
            }
            DerivedOp::Scale(factor) => {
                if values.len() != 1 {
                    return Err(self.retrieval_error(format!(
                        "scale requires exactly 1 input, got {}",
                        values.len()
                    )));
                }
                Ok(values[0] * factor)
            }
        }
    }
}

/// A set of parameters with at most one per non-sentinel reference.
///
/// Anonymous parameters may appear any number of times; named ones are
/// rejected on `push` if the name is already taken within this collection.
/// Cross-collection uniqueness is enforced later, at resolver construction.
#[derive(Debug, Clone, Default)]
pub struct ParameterCollection {
    parameters: Vec<Arc<dyn Parameter>>,
}

impl ParameterCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parameters(
        parameters: Vec<Arc<dyn Parameter>>,
    ) -> Result<Self, EngineError> {
        let mut collection = Self::new();
        for parameter in parameters {
            collection.push(parameter)?;
        }
        Ok(collection)
    }

    pub fn push(&mut self, parameter: Arc<dyn Parameter>) -> Result<(), EngineError> {
        if let Some(name) = parameter.reference().name() {
            let taken = self
                .parameters
                .iter()
                .any(|p| p.reference().name() == Some(name));
            if taken {
                return Err(EngineError::DuplicateReference(name.to_string()));
            }
        }
        self.parameters.push(parameter);
        Ok(())
    }

    /// Parameters in insertion order. This ordering is load-bearing for the
    /// resolver's deterministic parameter listing.
    pub fn parameters(&self) -> &[Arc<dyn Parameter>] {
        &self.parameters
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }
}
