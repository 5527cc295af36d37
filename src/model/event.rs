//! event.rs
//! One row of per-channel measurements, shared between populations.

use std::sync::Arc;

/// An immutable fixed-length vector of channel values.
///
/// The payload lives behind an `Arc` so derived sub-populations share event
/// storage instead of deep-copying it. An event has no identity beyond its
/// data; for tests, equality is "same values within epsilon"
/// (see [`Event::approx_eq`]).
#[derive(Debug, Clone)]
pub struct Event {
    values: Arc<[f64]>,
}

impl Event {
    pub fn new(values: impl Into<Arc<[f64]>>) -> Self {
        Self { values: values.into() }
    }

    /// The value measured on `channel` (0-based), if the event has one.
    #[inline(always)]
    pub fn channel(&self, channel: usize) -> Option<f64> {
        self.values.get(channel).copied()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of channels in this event.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Same channel count and every value within `epsilon` of its
    /// counterpart.
    pub fn approx_eq(&self, other: &Event, epsilon: f64) -> bool {
        self.values.len() == other.values.len()
            && self
                .values
                .iter()
                .zip(other.values.iter())
                .all(|(a, b)| (a - b).abs() <= epsilon)
    }

    /// Whether two events share the same underlying storage. Derived
    /// populations hold views, so this is how "same event" is expressed.
    pub fn same_storage(&self, other: &Event) -> bool {
        Arc::ptr_eq(&self.values, &other.values)
    }
}

impl From<Vec<f64>> for Event {
    fn from(values: Vec<f64>) -> Self {
        Self::new(values)
    }
}
