//! Factories invoked by `$require` directives
//!
//! Module loading is closed-world: a `$require` can only reach modules that
//! were registered in a [`ModuleRegistry`] before the pass started. Each
//! module exposes named exports (and optionally a default export), each a
//! class constructor, a function, or a plain value.
//!
//! ```rust
//! use objgraph_core::factory::{register_module, Export, Module};
//! use objgraph_core::Instance;
//!
//! register_module(
//!     "greeter",
//!     "Builds greetings",
//!     Module::new().with_export("Hello", Export::function(|args| {
//!         let name = args.first().and_then(Instance::as_str).unwrap_or("world");
//!         Ok(Instance::from(format!("hello {}", name)))
//!     })),
//! );
//! ```

mod export;
mod registry;
mod object_factory;

pub use export::{
    check_arity, string_arg, BoxError, Export, Factory, FactoryError, FactoryResult, Module,
};
pub use registry::{
    global_registry, has_module, list_modules, register_module, unregister_module, ModuleDefinition,
    ModuleRegistry,
};
pub use object_factory::{arguments_from, ObjectFactory};
