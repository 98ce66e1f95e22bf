//! objgraph Core
//!
//! Declarative object-graph resolution. A configuration tree (JSON or YAML)
//! describes which objects to build and how they connect; the resolver turns
//! requested locations of that tree into live values.
//!
//! ## Directives
//!
//! Mappings carrying a reserved key are directives:
//! - `{"$ref": "/pointer"}`: the value at another location of the document
//! - `{"$require": "module#Export?t=class&p=/sub", "$args": [...]}`: build a
//!   value with a registered factory, arguments resolved first
//! - `{"$env": "NAME"}`: an environment variable, absent when unset
//!
//! Everything else is copied through, with nested directives resolved.
//! Within one pass each location is built at most once, so two references
//! to the same location share one instance.
//!
//! ```rust
//! use objgraph_core::factory::{Export, Module, ModuleRegistry};
//! use objgraph_core::{GraphBuilder, Instance, OutputSpec};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let registry = Arc::new(ModuleRegistry::new());
//! registry.register(
//!     "db",
//!     "Database handles",
//!     Module::new().with_export("Pool", Export::class(|args| Ok(Instance::sequence(args)))),
//! );
//!
//! let document = json!({
//!     "pool": {"$require": "db#Pool", "$args": [{"$env": "DATABASE_URL"}]},
//!     "api": {"db": {"$ref": "/pool"}, "port": 8080}
//! });
//! let outputs = OutputSpec::new().with("api", "/api");
//!
//! let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! let graph = runtime
//!     .block_on(GraphBuilder::new(registry).resolve(&document, &outputs))
//!     .unwrap();
//! assert_eq!(graph.get("api").and_then(|api| api.get("port")).and_then(Instance::as_i64), Some(8080));
//! ```

pub mod types;
pub mod pointer;
pub mod env;
pub mod logging;
pub mod config;
pub mod factory;
pub mod resolver;

// Re-export commonly used types
pub use types::{ConstructRef, Directive, Instance, InvocationKind};

pub use pointer::{Pointer, PointerError};

pub use env::{ChainEnv, EnvSource, MemoryEnv, ProcessEnv, SharedEnvSource};

pub use logging::{ConsoleLogger, Logger, NoOpLogger, SharedLogger};

pub use config::{DocumentError, DocumentFile, DocumentFormat, ResolverOptions};

pub use factory::{
    register_module, Export, Factory, FactoryError, FactoryResult, Module, ModuleRegistry,
};

pub use resolver::{GraphBuilder, OutputSpec, PassStats, ResolveError, ResolveResult, ResolvedGraph};
