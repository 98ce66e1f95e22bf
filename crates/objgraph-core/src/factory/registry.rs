//! Module registry for locating `$require` targets by path

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use super::export::Module;

/// Definition of a registered module
pub struct ModuleDefinition {
    /// Path the module is required by (e.g. `pkg` or `/srv/app/local`)
    pub path: String,
    /// Human-readable description
    pub description: String,
    /// The exports
    pub module: Arc<Module>,
}

impl std::fmt::Debug for ModuleDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleDefinition")
            .field("path", &self.path)
            .field("description", &self.description)
            .field("exports", &self.module.export_names())
            .field("has_default", &self.module.has_default())
            .finish()
    }
}

/// Registry of modules available to `$require`
///
/// Populated at startup, before any resolution pass. Local modules that
/// live next to a configuration file are registered under their absolute
/// path; relative `$require` paths are rewritten against the base
/// directory before lookup.
///
/// # Example
///
/// ```
/// use objgraph_core::factory::{Export, Module, ModuleRegistry};
/// use objgraph_core::Instance;
///
/// let registry = ModuleRegistry::new();
/// registry.register(
///     "settings",
///     "Static settings",
///     Module::new().with_default(Export::object(Instance::from("v1"))),
/// );
/// assert!(registry.contains("settings"));
/// ```
#[derive(Debug, Default)]
pub struct ModuleRegistry {
    modules: RwLock<HashMap<String, ModuleDefinition>>,
}

impl ModuleRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            modules: RwLock::new(HashMap::new()),
        }
    }

    /// Register a module, replacing any module already at `path`
    pub fn register(&self, path: &str, description: &str, module: Module) {
        self.modules.write().insert(
            path.to_string(),
            ModuleDefinition {
                path: path.to_string(),
                description: description.to_string(),
                module: Arc::new(module),
            },
        );
    }

    /// Look up a module by path
    pub fn get(&self, path: &str) -> Option<Arc<Module>> {
        self.modules.read().get(path).map(|def| Arc::clone(&def.module))
    }

    /// Check if a module is registered
    pub fn contains(&self, path: &str) -> bool {
        self.modules.read().contains_key(path)
    }

    /// List registered modules as (path, description) pairs, sorted by path
    pub fn list(&self) -> Vec<(String, String)> {
        let mut modules: Vec<(String, String)> = self
            .modules
            .read()
            .values()
            .map(|def| (def.path.clone(), def.description.clone()))
            .collect();
        modules.sort();
        modules
    }

    /// Remove a module
    pub fn unregister(&self, path: &str) -> bool {
        self.modules.write().remove(path).is_some()
    }

    pub fn len(&self) -> usize {
        self.modules.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Process-wide registry, for registering plugins at startup
static GLOBAL_REGISTRY: Lazy<Arc<ModuleRegistry>> = Lazy::new(|| Arc::new(ModuleRegistry::new()));

/// The process-wide registry
pub fn global_registry() -> Arc<ModuleRegistry> {
    Arc::clone(&GLOBAL_REGISTRY)
}

/// Register a module in the process-wide registry
pub fn register_module(path: &str, description: &str, module: Module) {
    GLOBAL_REGISTRY.register(path, description, module);
}

/// Remove a module from the process-wide registry (mainly for testing)
pub fn unregister_module(path: &str) -> bool {
    GLOBAL_REGISTRY.unregister(path)
}

/// Check if a module is in the process-wide registry
pub fn has_module(path: &str) -> bool {
    GLOBAL_REGISTRY.contains(path)
}

/// List the process-wide registry as (path, description) pairs
pub fn list_modules() -> Vec<(String, String)> {
    GLOBAL_REGISTRY.list()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::Export;
    use crate::types::Instance;

    fn module() -> Module {
        Module::new().with_export("Thing", Export::object(Instance::Null))
    }

    #[test]
    fn test_register_and_get() {
        let registry = ModuleRegistry::new();
        assert!(registry.is_empty());

        registry.register("pkg", "A package", module());
        assert!(registry.contains("pkg"));
        assert_eq!(registry.len(), 1);

        let found = registry.get("pkg").unwrap();
        assert!(found.export(Some("Thing")).is_some());
        assert!(registry.get("other").is_none());
    }

    #[test]
    fn test_register_replaces() {
        let registry = ModuleRegistry::new();
        registry.register("pkg", "first", module());
        registry.register("pkg", "second", Module::new());

        assert_eq!(registry.list(), vec![("pkg".to_string(), "second".to_string())]);
        assert!(registry.get("pkg").unwrap().export(Some("Thing")).is_none());
    }

    #[test]
    fn test_list_sorted_and_unregister() {
        let registry = ModuleRegistry::new();
        registry.register("b", "", module());
        registry.register("a", "", module());

        let paths: Vec<String> = registry.list().into_iter().map(|(p, _)| p).collect();
        assert_eq!(paths, vec!["a", "b"]);

        assert!(registry.unregister("a"));
        assert!(!registry.unregister("a"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_global_registry() {
        register_module("test_global_registry_pkg", "A test module", module());

        assert!(has_module("test_global_registry_pkg"));
        assert!(global_registry().get("test_global_registry_pkg").is_some());
        assert!(list_modules().iter().any(|(p, _)| p == "test_global_registry_pkg"));

        // Clean up
        assert!(unregister_module("test_global_registry_pkg"));
        assert!(!has_module("test_global_registry_pkg"));
    }

    #[test]
    fn test_definition_debug_lists_exports() {
        let def = ModuleDefinition {
            path: "pkg".to_string(),
            description: "d".to_string(),
            module: Arc::new(module()),
        };
        assert!(format!("{:?}", def).contains("Thing"));
    }
}
