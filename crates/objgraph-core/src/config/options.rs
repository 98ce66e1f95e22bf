//! Resolver options

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::env::{ChainEnv, MemoryEnv, ProcessEnv, SharedEnvSource};

/// Environment variable that overrides the base directory
pub const BASE_DIR_ENV: &str = "OBJGRAPH_BASE_DIR";

/// Options for a [`GraphBuilder`](crate::GraphBuilder)
///
/// Deserializable so a host can keep them in its own configuration file:
///
/// ```
/// use objgraph_core::ResolverOptions;
///
/// let options: ResolverOptions = serde_yaml::from_str(
///     "base_dir: /etc/app\nenv_overrides:\n  REGION: eu-west-1\n",
/// ).unwrap();
/// assert_eq!(options.base_dir.to_str(), Some("/etc/app"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverOptions {
    /// Directory that relative `$require` paths (`./x`, `../x`) are joined to
    pub base_dir: PathBuf,
    /// Fixed values consulted before the process environment
    pub env_overrides: HashMap<String, String>,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            base_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            env_overrides: HashMap::new(),
        }
    }
}

impl ResolverOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults, with the base directory taken from `OBJGRAPH_BASE_DIR` when set
    pub fn from_env() -> Self {
        let mut options = Self::default();
        if let Some(dir) = std::env::var_os(BASE_DIR_ENV).filter(|d| !d.is_empty()) {
            options.base_dir = PathBuf::from(dir);
        }
        options
    }

    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    pub fn with_env_override(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_overrides.insert(name.into(), value.into());
        self
    }

    /// The environment source these options describe: the process
    /// environment, with the overrides layered on top
    pub fn env_source(&self) -> SharedEnvSource {
        if self.env_overrides.is_empty() {
            return Arc::new(ProcessEnv::new());
        }
        Arc::new(ChainEnv::new(vec![
            Arc::new(MemoryEnv::with_vars(self.env_overrides.clone())),
            Arc::new(ProcessEnv::new()),
        ]))
    }
}
