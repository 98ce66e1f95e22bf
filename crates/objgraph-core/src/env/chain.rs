//! Chained environment source with fallback behavior

use std::sync::Arc;

use super::traits::EnvSource;

/// An environment source that consults several sources in order
///
/// The first source that has the variable wins. Useful for layering
/// test or host-provided overrides on top of the process environment.
///
/// # Example
///
/// ```
/// use objgraph_core::env::{ChainEnv, EnvSource, MemoryEnv, ProcessEnv};
/// use std::sync::Arc;
///
/// let overrides = Arc::new(MemoryEnv::from_pairs([("TOKEN", "local")]));
/// let chain = ChainEnv::new(vec![overrides, Arc::new(ProcessEnv::new())]);
/// assert_eq!(chain.get("TOKEN"), Some("local".to_string()));
/// ```
pub struct ChainEnv {
    sources: Vec<Arc<dyn EnvSource>>,
}

impl ChainEnv {
    /// Create a new chain, consulted in the given order
    pub fn new(sources: Vec<Arc<dyn EnvSource>>) -> Self {
        Self { sources }
    }

    /// Get the sources in this chain
    pub fn sources(&self) -> &[Arc<dyn EnvSource>] {
        &self.sources
    }

    /// Find which source has a variable
    pub fn find_source(&self, name: &str) -> Option<&Arc<dyn EnvSource>> {
        self.sources.iter().find(|source| source.has(name))
    }
}

impl EnvSource for ChainEnv {
    fn name(&self) -> &str {
        "chain"
    }

    fn get(&self, name: &str) -> Option<String> {
        self.sources.iter().find_map(|source| source.get(name))
    }
}

impl std::fmt::Debug for ChainEnv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainEnv")
            .field("sources", &format!("[{} sources]", self.sources.len()))
            .finish()
    }
}
