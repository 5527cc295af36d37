//! retriever.rs
//! The resolver: maps references to parameters and values across an ordered
//! list of collections, on top of an optional base resolver.

use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use crate::error::EngineError;
use crate::model::Event;
use crate::resolver::cycles;
use crate::resolver::parameter::{Parameter, ParameterCollection, ParameterReference};

/// Resolves symbolic references to concrete parameters and values.
///
/// The reference universe is the base resolver's parameters (if any) followed
/// by each collection's parameters in list order. Both invariants are checked
/// eagerly at construction: no duplicate non-sentinel reference anywhere in
/// the universe, and no parameter transitively depending on itself.
///
/// Resolution results are memoized per instance. The cache is the only
/// internal mutation and is purely memoizing, guarded by a mutex so a
/// resolver may be shared across the analyzer's parallel fan-out.
#[derive(Debug)]
pub struct Resolver {
    base: Option<Arc<Resolver>>,
    collections: Vec<ParameterCollection>,
    cache: Mutex<HashMap<ParameterReference, Arc<dyn Parameter>>>,
}

impl Resolver {
    /// Builds a resolver over `collections`, layered on `base` if given.
    ///
    /// # Errors
    /// - `DuplicateReference` if any non-sentinel reference appears more than
    ///   once across the whole universe.
    /// - `CircularDependency` if any parameter transitively depends on
    ///   itself. Dangling dependency references are ignored here and surface
    ///   later as `NoSuchParameter`, at use time.
    pub fn new(
        collections: Vec<ParameterCollection>,
        base: Option<Arc<Resolver>>,
    ) -> Result<Self, EngineError> {
        let resolver = Self {
            base,
            collections,
            cache: Mutex::new(HashMap::new()),
        };

        let universe = resolver.all_parameters();
        let mut seen: HashSet<&str> = HashSet::new();
        for parameter in &universe {
            if let Some(name) = parameter.reference().name() {
                if !seen.insert(name) {
                    return Err(EngineError::DuplicateReference(name.to_string()));
                }
            }
        }
        cycles::check(&universe)?;

        Ok(resolver)
    }

    /// A resolver with no parameters at all. Useful as the default for
    /// populations whose channels are read directly by channel parameters
    /// supplied later, and in tests.
    pub fn empty() -> Arc<Resolver> {
        Arc::new(Self {
            base: None,
            collections: Vec::new(),
            cache: Mutex::new(HashMap::new()),
        })
    }

    /// Looks `reference` up: first match scanning the base resolver's
    /// parameters, then each collection in order. Memoized, so repeated
    /// calls return the identical `Arc`.
    pub fn resolve(
        &self,
        reference: &ParameterReference,
    ) -> Result<Arc<dyn Parameter>, EngineError> {
        let Some(name) = reference.name() else {
            return Err(EngineError::NoSuchParameter(reference.to_string()));
        };

        if let Some(hit) = self.cache.lock().expect("resolver cache poisoned").get(reference) {
            return Ok(Arc::clone(hit));
        }

        let found = self
            .iter_parameters()
            .find(|p| p.reference().name() == Some(name))
            .cloned();
        match found {
            Some(parameter) => {
                self.cache
                    .lock()
                    .expect("resolver cache poisoned")
                    .insert(reference.clone(), Arc::clone(&parameter));
                Ok(parameter)
            }
            None => Err(EngineError::NoSuchParameter(name.to_string())),
        }
    }

    /// Resolves `reference` and extracts its value from `event`. The
    /// parameter's own logic may recursively resolve further references
    /// through this same resolver.
    pub fn value(
        &self,
        reference: &ParameterReference,
        event: &Event,
    ) -> Result<f64, EngineError> {
        let parameter = self.resolve(reference)?;
        parameter.value(event, self)
    }

    /// Extracts `parameter`'s value from `event` through this resolver.
    pub fn value_of(
        &self,
        parameter: &Arc<dyn Parameter>,
        event: &Event,
    ) -> Result<f64, EngineError> {
        parameter.value(event, self)
    }

    /// Every parameter in the universe: base's list first, then each
    /// collection in order. This ordering is load-bearing for deterministic
    /// output tables and is preserved exactly.
    pub fn all_parameters(&self) -> Vec<Arc<dyn Parameter>> {
        self.iter_parameters().cloned().collect()
    }

    fn iter_parameters(&self) -> impl Iterator<Item = &Arc<dyn Parameter>> {
        let mut out = Vec::new();
        self.collect_parameters(&mut out);
        out.into_iter()
    }

    fn collect_parameters<'a>(&'a self, out: &mut Vec<&'a Arc<dyn Parameter>>) {
        if let Some(base) = &self.base {
            base.collect_parameters(out);
        }
        out.extend(self.collections.iter().flat_map(|c| c.parameters().iter()));
    }
}
