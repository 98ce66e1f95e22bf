//! One resolution pass: reference resolution over the document

use std::collections::BTreeMap;

use futures::future::BoxFuture;
use futures::FutureExt;
use serde_json::Value;

use crate::env::EnvSource;
use crate::factory::{arguments_from, ObjectFactory};
use crate::logging::file_logger as log;
use crate::pointer::Pointer;
use crate::types::{Directive, Instance, ARGS_KEY};
use super::cache::{CacheLookup, InstanceCache};
use super::error::{ResolveError, ResolveResult};
use super::outputs::PassStats;

/// State of a single pass
///
/// Owns the instance cache and is threaded by `&mut` through every
/// recursive call, so each pass is isolated. All awaits happen one at a
/// time in document order; the cache is checked and marked with no
/// suspension in between, which gives at-most-once construction per
/// pointer without a lock.
pub(crate) struct ResolutionPass<'a> {
    document: &'a Value,
    factory: &'a ObjectFactory,
    env: &'a dyn EnvSource,
    cache: InstanceCache,
    stats: PassStats,
}

impl<'a> ResolutionPass<'a> {
    pub(crate) fn new(document: &'a Value, factory: &'a ObjectFactory, env: &'a dyn EnvSource) -> Self {
        Self {
            document,
            factory,
            env,
            cache: InstanceCache::new(),
            stats: PassStats::default(),
        }
    }

    pub(crate) fn stats(&self) -> PassStats {
        self.stats
    }

    /// Resolve the node at `pointer` (an output or a `$ref` target)
    ///
    /// Failures are wrapped once here with the pointer being resolved.
    pub(crate) fn resolve_pointer<'s>(&'s mut self, pointer: Pointer) -> BoxFuture<'s, ResolveResult<Instance>> {
        async move {
            let key = pointer.to_string();
            let result = match pointer.get(self.document) {
                Some(node) => self.resolve_node(pointer, node).await,
                None => Err(ResolveError::pointer_not_found(key.clone())),
            };

            result.map_err(|err| {
                log::debug("resolver", &format!("failed at '{}': {}", key, err));
                ResolveError::while_resolving(key, err)
            })
        }
        .boxed()
    }

    /// Resolve `node`, which lives at `at` in the document
    ///
    /// Everything except plain scalars goes through the instance cache, so
    /// a location reached both by nesting and by `$ref` is built once.
    fn resolve_node<'s>(&'s mut self, at: Pointer, node: &'a Value) -> BoxFuture<'s, ResolveResult<Instance>> {
        async move {
            let directive = Directive::classify(node, &at)?;
            if let Directive::Scalar(value) = directive {
                return Ok(Instance::from_value(value));
            }

            let key = at.to_string();
            match self.cache.lookup(&key) {
                CacheLookup::Resolved(instance) => {
                    log::trace("resolver", &format!("cache hit '{}'", key));
                    self.stats.cache_hits += 1;
                    return Ok(instance);
                }
                CacheLookup::InProgress => {
                    return Err(ResolveError::CyclicReference {
                        chain: self.cache.cycle_chain(&key),
                    });
                }
                CacheLookup::Miss => {}
            }

            self.cache.begin(&key);
            match self.resolve_directive(&at, directive).await {
                Ok(instance) => {
                    self.cache.complete(&key, instance.clone());
                    self.stats.cached += 1;
                    Ok(instance)
                }
                Err(err) => {
                    self.cache.abandon(&key);
                    Err(err)
                }
            }
        }
        .boxed()
    }

    async fn resolve_directive(&mut self, at: &Pointer, directive: Directive<'a>) -> ResolveResult<Instance> {
        match directive {
            Directive::Scalar(value) => Ok(Instance::from_value(value)),

            Directive::Sequence(items) => {
                let mut resolved = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    resolved.push(self.resolve_node(at.index(index), item).await?);
                }
                Ok(Instance::sequence(resolved))
            }

            Directive::Plain(map) => {
                let mut resolved = BTreeMap::new();
                for (key, value) in map {
                    let instance = self.resolve_node(at.child(key.as_str()), value).await?;
                    resolved.insert(key.clone(), instance);
                }
                Ok(Instance::mapping(resolved))
            }

            Directive::Env(name) => Ok(match self.env.get(name) {
                Some(value) => Instance::String(value),
                None => {
                    log::trace("resolver", &format!("environment variable {} is unset", name));
                    Instance::Absent
                }
            }),

            Directive::Ref(target) => self.resolve_pointer(target).await,

            Directive::Require { target, args } => {
                let args = match args {
                    Some(node) => arguments_from(self.resolve_node(at.child(ARGS_KEY), node).await?),
                    None => Vec::new(),
                };
                self.stats.constructions += 1;
                self.factory.construct(&target, args).await
            }
        }
    }
}
