//! Core data model: events and populations.

pub mod event;
pub mod population;

pub use event::Event;
pub use population::Population;
