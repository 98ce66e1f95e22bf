//! Core trait for environment lookups

use std::sync::Arc;

/// Source of environment values consulted by `$env` directives
///
/// Implementations can be:
/// - The host process environment (`ProcessEnv`)
/// - In-memory for testing (`MemoryEnv`)
/// - Chained for fallback behavior (`ChainEnv`)
///
/// A missing variable is never an error: `get` returns `None` and the
/// resolver turns that into `Instance::Absent`.
///
/// # Example
///
/// ```
/// use objgraph_core::env::{EnvSource, MemoryEnv};
///
/// let env = MemoryEnv::new();
/// env.set("TOKEN", "abc");
/// assert_eq!(env.get("TOKEN"), Some("abc".to_string()));
/// ```
pub trait EnvSource: Send + Sync {
    /// Human-readable name of this source
    fn name(&self) -> &str;

    /// Look up a variable by name
    fn get(&self, name: &str) -> Option<String>;

    /// Check if a variable is set
    fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

/// Type alias for an Arc-wrapped environment source
pub type SharedEnvSource = Arc<dyn EnvSource>;
