//! Core types shared across the resolver
//!
//! This module contains the resolved value model and the parsed forms of
//! the reserved directive keys.

mod instance;
mod construct_ref;
mod directive;

pub use instance::Instance;
pub use construct_ref::{ConstructRef, InvocationKind};
pub use directive::{Directive, ARGS_KEY, ENV_KEY, REF_KEY, REQUIRE_KEY};
