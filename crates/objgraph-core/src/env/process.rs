//! Host process environment

use std::env;

use super::traits::EnvSource;

/// Environment source that reads the host process environment
///
/// Values are read at lookup time, so a variable set after the resolver
/// was built is still observed by the next pass. An empty value counts as
/// set. Variables whose value is not valid unicode are treated as unset.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl ProcessEnv {
    /// Create a new process environment source
    pub fn new() -> Self {
        Self
    }
}

impl EnvSource for ProcessEnv {
    fn name(&self) -> &str {
        "process"
    }

    fn get(&self, name: &str) -> Option<String> {
        env::var(name).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_env_name() {
        assert_eq!(ProcessEnv::new().name(), "process");
    }

    #[test]
    fn test_process_env_get_set_variable() {
        env::set_var("OBJGRAPH_TEST_PROCESS_ENV_VALUE", "value");

        let source = ProcessEnv::new();
        assert_eq!(source.get("OBJGRAPH_TEST_PROCESS_ENV_VALUE"), Some("value".to_string()));
        assert!(source.has("OBJGRAPH_TEST_PROCESS_ENV_VALUE"));

        env::remove_var("OBJGRAPH_TEST_PROCESS_ENV_VALUE");
    }

    #[test]
    fn test_process_env_empty_counts_as_set() {
        env::set_var("OBJGRAPH_TEST_PROCESS_ENV_EMPTY", "");

        let source = ProcessEnv::new();
        assert_eq!(source.get("OBJGRAPH_TEST_PROCESS_ENV_EMPTY"), Some(String::new()));

        env::remove_var("OBJGRAPH_TEST_PROCESS_ENV_EMPTY");
    }

    #[test]
    fn test_process_env_unset() {
        let source = ProcessEnv::new();
        assert_eq!(source.get("OBJGRAPH_TEST_DEFINITELY_UNSET_XYZ"), None);
        assert!(!source.has("OBJGRAPH_TEST_DEFINITELY_UNSET_XYZ"));
    }
}
