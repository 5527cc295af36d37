//! population.rs
//! An ordered collection of events with an optional parent and a default
//! resolver for interpreting its channels.

use std::sync::Arc;

use super::event::Event;
use crate::resolver::Resolver;

/// An ordered, possibly-empty collection of [`Event`]s.
///
/// A population never mutates its parent: derived populations are views over
/// the same event storage, produced by [`Population::derive`]. The
/// accumulated name of a derivation chain is threaded as a plain string
/// (`"sample-1/lymphocytes/cd4+"`), not reconstructed from the parent chain.
#[derive(Debug, Clone)]
pub struct Population {
    name: String,
    events: Arc<[Event]>,
    parent: Option<Arc<Population>>,
    resolver: Arc<Resolver>,
}

impl Population {
    /// A root population, as supplied by the event-file loader together with
    /// the resolver describing its channels.
    pub fn new(name: impl Into<String>, events: Vec<Event>, resolver: Arc<Resolver>) -> Self {
        Self {
            name: name.into(),
            events: events.into(),
            parent: None,
            resolver,
        }
    }

    /// A child view holding `events` (typically a subset of this
    /// population's events), named `<self>/<label>` and pointing back at
    /// this population as its parent. Event storage is shared, never copied.
    pub fn derive(&self, label: &str, events: Vec<Event>) -> Population {
        Population {
            name: format!("{}/{}", self.name, label),
            events: events.into(),
            parent: Some(Arc::new(self.clone())),
            resolver: Arc::clone(&self.resolver),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn parent(&self) -> Option<&Population> {
        self.parent.as_deref()
    }

    /// The resolver used to interpret this population's events when the
    /// analyzer supplies no additional collections.
    pub fn resolver(&self) -> &Arc<Resolver> {
        &self.resolver
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root(events: Vec<Event>) -> Population {
        Population::new("sample", events, Resolver::empty())
    }

    #[test]
    fn test_derive_threads_name_and_parent() {
        let pop = root(vec![
            Event::from(vec![1.0]),
            Event::from(vec![2.0]),
            Event::from(vec![3.0]),
        ]);
        let child = pop.derive("singlets", vec![pop.events()[1].clone()]);
        let grandchild = child.derive("live", vec![]);

        assert_eq!(child.name(), "sample/singlets");
        assert_eq!(grandchild.name(), "sample/singlets/live");
        assert_eq!(child.len(), 1);
        assert_eq!(child.parent().unwrap().name(), "sample");
        assert!(pop.parent().is_none());
    }

    #[test]
    fn test_derive_shares_event_storage() {
        let pop = root(vec![Event::from(vec![7.0, 8.0])]);
        let child = pop.derive("all", pop.events().to_vec());
        assert!(child.events()[0].same_storage(&pop.events()[0]));
    }
}
