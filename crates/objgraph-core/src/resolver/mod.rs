//! Object-graph resolution
//!
//! [`GraphBuilder`] is the entry point. Each call starts a fresh pass with
//! its own instance cache; nothing is shared between passes.

mod error;
mod cache;
mod outputs;
mod pass;
mod graph_builder;

pub use error::{ResolveError, ResolveResult};
pub use cache::{CacheLookup, InstanceCache};
pub use outputs::{OutputSpec, PassStats, ResolvedGraph};
pub use graph_builder::GraphBuilder;
