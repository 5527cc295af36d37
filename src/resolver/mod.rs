//! Symbolic reference resolution: parameters, collections and the resolver
//! that maps references to values across multiple collections.

pub mod cycles;
pub mod parameter;
pub mod retriever;

pub use parameter::{
    ChannelParameter, DerivedOp, DerivedParameter, Parameter, ParameterCollection,
    ParameterReference,
};
pub use retriever::Resolver;
