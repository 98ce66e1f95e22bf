//! Environment value sources for `$env` directives
//!
//! This module provides a pluggable lookup for environment variables:
//! - `EnvSource` trait for implementing custom sources
//! - Built-in implementations: `ProcessEnv`, `MemoryEnv`, `ChainEnv`

mod traits;
mod process;
mod memory;
mod chain;

pub use traits::{EnvSource, SharedEnvSource};
pub use process::ProcessEnv;
pub use memory::MemoryEnv;
pub use chain::ChainEnv;
