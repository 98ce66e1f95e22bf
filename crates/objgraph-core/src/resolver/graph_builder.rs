//! Entry point for resolving a document into an object graph

use std::any::Any;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;

use crate::config::{DocumentFile, ResolverOptions};
use crate::env::{EnvSource, SharedEnvSource};
use crate::factory::{global_registry, ModuleRegistry, ObjectFactory};
use crate::logging::{NoOpLogger, SharedLogger};
use crate::pointer::Pointer;
use crate::types::Instance;
use crate::{log_error, log_info};
use super::error::{ResolveError, ResolveResult};
use super::outputs::{OutputSpec, ResolvedGraph};
use super::pass::ResolutionPass;

/// Resolves requested outputs of a configuration document
///
/// A builder holds everything that outlives a pass: the factory registry,
/// the base directory for relative `$require` paths, the environment source
/// and the logger. Every call to [`resolve`](Self::resolve) starts a new
/// pass with an empty instance cache, so calls on one builder (including
/// concurrent ones) never share instances.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use objgraph_core::factory::{Export, Module, ModuleRegistry};
/// use objgraph_core::{GraphBuilder, Instance, OutputSpec};
/// use serde_json::json;
///
/// let registry = Arc::new(ModuleRegistry::new());
/// registry.register(
///     "pkg",
///     "demo",
///     Module::new().with_export("Thing", Export::class(|args| Ok(Instance::sequence(args)))),
/// );
///
/// let document = json!({
///     "a": {"value": 1},
///     "b": {"$ref": "/a"},
///     "svc": {"$require": "pkg#Thing", "$args": ["x"]}
/// });
/// let outputs = OutputSpec::new().with("x", "/a").with("y", "/b").with("svc", "/svc");
///
/// let builder = GraphBuilder::new(registry);
/// let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
/// let graph = runtime.block_on(builder.resolve(&document, &outputs)).unwrap();
/// assert!(graph.get("x").unwrap().same_instance(graph.get("y").unwrap()));
/// ```
#[derive(Clone)]
pub struct GraphBuilder {
    factory: ObjectFactory,
    env: SharedEnvSource,
    logger: SharedLogger,
}

impl GraphBuilder {
    /// A builder over `registry` with default options
    pub fn new(registry: Arc<ModuleRegistry>) -> Self {
        Self::with_options(registry, ResolverOptions::default())
    }

    pub fn with_options(registry: Arc<ModuleRegistry>, options: ResolverOptions) -> Self {
        Self {
            env: options.env_source(),
            factory: ObjectFactory::new(registry, options.base_dir),
            logger: NoOpLogger::shared(),
        }
    }

    /// A builder over the process-wide registry, configured from the environment
    pub fn global() -> Self {
        Self::with_options(global_registry(), ResolverOptions::from_env())
    }

    /// A builder whose relative `$require` paths are resolved against the
    /// directory of `file`
    pub fn for_document_file(registry: Arc<ModuleRegistry>, file: &DocumentFile) -> Self {
        Self::new(registry).with_base_dir(file.base_dir())
    }

    /// Replace the environment source consulted by `$env`
    pub fn with_env(mut self, env: SharedEnvSource) -> Self {
        self.env = env;
        self
    }

    /// Set the logger for pass-level events
    pub fn with_logger(mut self, logger: SharedLogger) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.factory = ObjectFactory::new(self.factory.registry().clone(), base_dir);
        self
    }

    pub fn base_dir(&self) -> &Path {
        self.factory.base_dir()
    }

    pub fn registry(&self) -> &Arc<ModuleRegistry> {
        self.factory.registry()
    }

    pub fn env(&self) -> &dyn EnvSource {
        self.env.as_ref()
    }

    /// Resolve every requested output in one pass
    ///
    /// Outputs are resolved one after another in request order. The first
    /// failure aborts the pass; there is no partial result.
    pub async fn resolve(&self, document: &Value, outputs: &OutputSpec) -> ResolveResult<ResolvedGraph> {
        log_info!(self.logger, "Resolving {} output(s)", outputs.len());

        let mut pass = ResolutionPass::new(document, &self.factory, self.env.as_ref());
        let mut values = Vec::with_capacity(outputs.len());

        for (name, pointer) in outputs.iter() {
            let result = match parse_pointer(pointer) {
                Ok(parsed) => pass.resolve_pointer(parsed).await,
                Err(err) => Err(err),
            };

            match result {
                Ok(instance) => values.push((name.to_string(), instance)),
                Err(err) => {
                    log_error!(self.logger, "Output '{}' failed: {}", name, err);
                    return Err(err);
                }
            }
        }

        let stats = pass.stats();
        log_info!(
            self.logger,
            "Resolved {} output(s): {} construction(s), {} cache hit(s)",
            values.len(),
            stats.constructions,
            stats.cache_hits
        );

        Ok(ResolvedGraph::new(values, stats))
    }

    /// Resolve a single pointer in a fresh pass
    pub async fn resolve_one(&self, document: &Value, pointer: &str) -> ResolveResult<Instance> {
        let parsed = parse_pointer(pointer)?;
        let mut pass = ResolutionPass::new(document, &self.factory, self.env.as_ref());
        pass.resolve_pointer(parsed).await.map_err(|err| {
            log_error!(self.logger, "Pointer '{}' failed: {}", pointer, err);
            err
        })
    }

    /// Resolve a single pointer to an object built by a factory
    ///
    /// Fails with [`ResolveError::UnexpectedType`] when the value is not an
    /// opaque object of type `T`.
    pub async fn resolve_as<T: Any + Send + Sync>(&self, document: &Value, pointer: &str) -> ResolveResult<Arc<T>> {
        let instance = self.resolve_one(document, pointer).await?;
        instance.downcast::<T>().ok_or_else(|| ResolveError::UnexpectedType {
            pointer: pointer.to_string(),
            expected: std::any::type_name::<T>(),
        })
    }
}

impl std::fmt::Debug for GraphBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphBuilder")
            .field("factory", &self.factory)
            .field("env", &self.env.name())
            .finish()
    }
}

fn parse_pointer(pointer: &str) -> ResolveResult<Pointer> {
    Pointer::parse(pointer).map_err(|err| ResolveError::while_resolving(pointer, err.into()))
}
