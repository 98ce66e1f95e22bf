//! In-memory environment source

use std::collections::HashMap;

use parking_lot::RwLock;

use super::traits::EnvSource;

/// In-memory environment for tests and embedding
///
/// Lets a host hand the resolver a fixed set of variables without touching
/// the process environment.
///
/// # Example
///
/// ```
/// use objgraph_core::env::{EnvSource, MemoryEnv};
///
/// let env = MemoryEnv::from_pairs([("REGION", "eu-west-1")]);
/// assert!(env.has("REGION"));
/// ```
#[derive(Debug, Default)]
pub struct MemoryEnv {
    vars: RwLock<HashMap<String, String>>,
}

impl MemoryEnv {
    /// Create a new empty environment
    pub fn new() -> Self {
        Self {
            vars: RwLock::new(HashMap::new()),
        }
    }

    /// Create an environment with initial values
    pub fn with_vars(initial: HashMap<String, String>) -> Self {
        Self {
            vars: RwLock::new(initial),
        }
    }

    /// Create an environment from name/value pairs
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let vars = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self::with_vars(vars)
    }

    /// Set a variable
    pub fn set(&self, name: &str, value: &str) {
        self.vars.write().insert(name.to_string(), value.to_string());
    }

    /// Remove a variable
    pub fn remove(&self, name: &str) -> bool {
        self.vars.write().remove(name).is_some()
    }

    /// Get the number of variables
    pub fn len(&self) -> usize {
        self.vars.read().len()
    }

    /// Check if the environment is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EnvSource for MemoryEnv {
    fn name(&self) -> &str {
        "memory"
    }

    fn get(&self, name: &str) -> Option<String> {
        self.vars.read().get(name).cloned()
    }
}

impl Clone for MemoryEnv {
    fn clone(&self) -> Self {
        Self::with_vars(self.vars.read().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_env_crud() {
        let env = MemoryEnv::new();
        assert!(env.is_empty());
        assert_eq!(env.get("A"), None);

        env.set("A", "1");
        assert_eq!(env.len(), 1);
        assert_eq!(env.get("A"), Some("1".to_string()));

        env.set("A", "2");
        assert_eq!(env.get("A"), Some("2".to_string()));

        assert!(env.remove("A"));
        assert!(!env.remove("A"));
        assert!(env.is_empty());
    }

    #[test]
    fn test_memory_env_from_pairs() {
        let env = MemoryEnv::from_pairs([("A", "1"), ("B", "2")]);
        assert_eq!(env.len(), 2);
        assert_eq!(env.get("B"), Some("2".to_string()));
    }

    #[test]
    fn test_memory_env_clone_is_independent() {
        let env = MemoryEnv::from_pairs([("A", "1")]);
        let cloned = env.clone();
        cloned.set("A", "changed");

        assert_eq!(env.get("A"), Some("1".to_string()));
        assert_eq!(cloned.get("A"), Some("changed".to_string()));
    }
}
