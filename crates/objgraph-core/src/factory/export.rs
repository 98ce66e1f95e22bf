//! Module exports and the factory trait

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use futures::FutureExt;
use thiserror::Error;

use crate::types::{Instance, InvocationKind};

/// Boxed error type factories can return as a cause
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned by factory invocations
#[derive(Error, Debug)]
pub enum FactoryError {
    #[error("expected {expected} argument(s), got {actual}")]
    Arity { expected: usize, actual: usize },

    #[error("argument {index} must be a {expected}, got {actual}")]
    ArgumentType {
        index: usize,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("export cannot be invoked as a {0}")]
    NotInvocable(InvocationKind),

    #[error("{0}")]
    Other(String),

    #[error("{0}")]
    Failed(#[source] BoxError),
}

impl FactoryError {
    /// Create an error from a message
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }

    /// Wrap any error raised by plugin code
    pub fn failed(error: impl Into<BoxError>) -> Self {
        Self::Failed(error.into())
    }
}

pub type FactoryResult<T> = Result<T, FactoryError>;

/// Fail unless exactly `expected` arguments were passed
pub fn check_arity(args: &[Instance], expected: usize) -> FactoryResult<()> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(FactoryError::Arity {
            expected,
            actual: args.len(),
        })
    }
}

/// Borrow argument `index` as a string
pub fn string_arg(args: &[Instance], index: usize) -> FactoryResult<&str> {
    let arg = args.get(index).ok_or(FactoryError::Arity {
        expected: index + 1,
        actual: args.len(),
    })?;
    arg.as_str().ok_or(FactoryError::ArgumentType {
        index,
        expected: "string",
        actual: arg.kind_name(),
    })
}

/// Something that builds a value from resolved arguments
#[async_trait]
pub trait Factory: Send + Sync {
    async fn invoke(&self, args: Vec<Instance>) -> FactoryResult<Instance>;
}

type SyncFn = dyn Fn(Vec<Instance>) -> FactoryResult<Instance> + Send + Sync;
type AsyncFn = dyn Fn(Vec<Instance>) -> BoxFuture<'static, FactoryResult<Instance>> + Send + Sync;

struct SyncFactory(Box<SyncFn>);

#[async_trait]
impl Factory for SyncFactory {
    async fn invoke(&self, args: Vec<Instance>) -> FactoryResult<Instance> {
        (self.0)(args)
    }
}

struct AsyncFactory(Box<AsyncFn>);

#[async_trait]
impl Factory for AsyncFactory {
    async fn invoke(&self, args: Vec<Instance>) -> FactoryResult<Instance> {
        (self.0)(args).await
    }
}

/// A single export of a module
#[derive(Clone)]
pub enum Export {
    /// Invoked with `t=class` (the default)
    Class(Arc<dyn Factory>),
    /// Invoked with `t=function`
    Function(Arc<dyn Factory>),
    /// A plain value, used with `t=object`
    Object(Instance),
}

impl Export {
    /// A class whose constructor is a synchronous closure
    pub fn class<F>(constructor: F) -> Self
    where
        F: Fn(Vec<Instance>) -> FactoryResult<Instance> + Send + Sync + 'static,
    {
        Export::Class(Arc::new(SyncFactory(Box::new(constructor))))
    }

    /// A class whose constructor suspends
    pub fn class_async<F, Fut>(constructor: F) -> Self
    where
        F: Fn(Vec<Instance>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = FactoryResult<Instance>> + Send + 'static,
    {
        Export::Class(Arc::new(AsyncFactory(Box::new(move |args| constructor(args).boxed()))))
    }

    /// A synchronous function
    pub fn function<F>(function: F) -> Self
    where
        F: Fn(Vec<Instance>) -> FactoryResult<Instance> + Send + Sync + 'static,
    {
        Export::Function(Arc::new(SyncFactory(Box::new(function))))
    }

    /// A function that suspends
    pub fn function_async<F, Fut>(function: F) -> Self
    where
        F: Fn(Vec<Instance>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = FactoryResult<Instance>> + Send + 'static,
    {
        Export::Function(Arc::new(AsyncFactory(Box::new(move |args| function(args).boxed()))))
    }

    /// A plain value
    pub fn object(value: Instance) -> Self {
        Export::Object(value)
    }

    /// Invoke the export the way `kind` asks
    ///
    /// `object` never calls anything: on a callable export it yields an
    /// opaque handle to the export itself. A class or function invocation
    /// of an export that is not of that kind fails with `NotInvocable`.
    pub async fn invoke(&self, kind: InvocationKind, args: Vec<Instance>) -> FactoryResult<Instance> {
        match (kind, self) {
            (InvocationKind::Object, Export::Object(value)) => Ok(value.clone()),
            (InvocationKind::Object, callable) => Ok(Instance::object(callable.clone())),
            (InvocationKind::Class, Export::Class(factory))
            | (InvocationKind::Function, Export::Function(factory)) => factory.invoke(args).await,
            (kind, _) => Err(FactoryError::NotInvocable(kind)),
        }
    }
}

impl std::fmt::Debug for Export {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Export::Class(_) => write!(f, "Export::Class(..)"),
            Export::Function(_) => write!(f, "Export::Function(..)"),
            Export::Object(value) => f.debug_tuple("Export::Object").field(value).finish(),
        }
    }
}

/// A named set of exports
#[derive(Debug, Clone, Default)]
pub struct Module {
    exports: HashMap<String, Export>,
    default_export: Option<Export>,
}

impl Module {
    /// Create an empty module
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a named export
    pub fn with_export(mut self, name: impl Into<String>, export: Export) -> Self {
        self.exports.insert(name.into(), export);
        self
    }

    /// Set the export used when a target names no export
    pub fn with_default(mut self, export: Export) -> Self {
        self.default_export = Some(export);
        self
    }

    /// Select an export by name, or the default export for `None`
    pub fn export(&self, name: Option<&str>) -> Option<&Export> {
        match name {
            Some(name) => self.exports.get(name),
            None => self.default_export.as_ref(),
        }
    }

    /// Names of the named exports, sorted
    pub fn export_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.exports.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn has_default(&self) -> bool {
        self.default_export.is_some()
    }
}
