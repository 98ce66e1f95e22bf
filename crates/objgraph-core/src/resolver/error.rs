//! Resolution error types

use thiserror::Error;

use crate::factory::FactoryError;
use crate::pointer::PointerError;

/// Errors that can occur during a resolution pass
///
/// Every failure raised beneath a pointer (an output or a `$ref` target)
/// is wrapped once in [`ResolveError::WhileResolving`] naming that pointer,
/// so the `source()` chain reads from the outermost request down to the
/// failing construction. An unset environment variable is not an error.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// A requested pointer does not exist in the document
    #[error("Pointer not found: {pointer}")]
    PointerNotFound { pointer: String },

    /// Malformed pointer syntax
    #[error(transparent)]
    InvalidPointer(#[from] PointerError),

    /// A reserved key carries a value of the wrong shape
    #[error("Invalid {directive} directive: {message}")]
    InvalidDirective {
        directive: &'static str,
        message: String,
    },

    /// The module is not in the factory registry
    #[error("Module not registered: {module}")]
    ModuleLoad { module: String },

    /// The module has no export with this name
    #[error("Export '{export}' not found in module {module}")]
    ExportNotFound { module: String, export: String },

    /// The factory failed
    #[error("Failed to construct {module}#{export}: {cause}")]
    Construction {
        module: String,
        export: String,
        #[source]
        cause: FactoryError,
    },

    /// The post-construction pointer could not be applied
    #[error("Cannot apply pointer '{pointer}' to the value built by {module}#{export}: {message}")]
    PostConstructionPointer {
        module: String,
        export: String,
        pointer: String,
        message: String,
    },

    /// A pointer depends on itself
    ///
    /// `chain` lists every document location entered between the first
    /// visit and the repeat, nested mappings, sequences and `$args`
    /// included, e.g. `/svc -> /svc/$args -> /svc/$args/0 -> /svc`.
    #[error("Cyclic reference: {}", .chain.join(" -> "))]
    CyclicReference { chain: Vec<String> },

    /// The resolved value is not of the type the caller asked for
    #[error("Value at '{pointer}' is not a {expected}")]
    UnexpectedType {
        pointer: String,
        expected: &'static str,
    },

    /// Context: the error happened while resolving `pointer`
    #[error("Failed to resolve '{pointer}': {source}")]
    WhileResolving {
        pointer: String,
        #[source]
        source: Box<ResolveError>,
    },
}

impl ResolveError {
    /// Create a pointer-not-found error
    pub fn pointer_not_found(pointer: impl Into<String>) -> Self {
        Self::PointerNotFound {
            pointer: pointer.into(),
        }
    }

    /// Create a construction error
    pub fn construction(module: impl Into<String>, export: impl Into<String>, cause: FactoryError) -> Self {
        Self::Construction {
            module: module.into(),
            export: export.into(),
            cause,
        }
    }

    /// Wrap an error with the pointer being resolved
    pub fn while_resolving(pointer: impl Into<String>, source: ResolveError) -> Self {
        Self::WhileResolving {
            pointer: pointer.into(),
            source: Box::new(source),
        }
    }

    /// The innermost error, with all context wrappers removed
    pub fn root_cause(&self) -> &ResolveError {
        let mut current = self;
        while let ResolveError::WhileResolving { source, .. } = current {
            current = source.as_ref();
        }
        current
    }

    /// Pointers named by the context wrappers, outermost first
    pub fn pointer_trail(&self) -> Vec<&str> {
        let mut trail = Vec::new();
        let mut current = self;
        while let ResolveError::WhileResolving { pointer, source } = current {
            trail.push(pointer.as_str());
            current = source.as_ref();
        }
        trail
    }
}

pub type ResolveResult<T> = Result<T, ResolveError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_context_chain() {
        let err = ResolveError::while_resolving(
            "/b",
            ResolveError::while_resolving("/a", ResolveError::pointer_not_found("/missing")),
        );

        assert!(matches!(err.root_cause(), ResolveError::PointerNotFound { pointer } if pointer == "/missing"));
        assert_eq!(err.pointer_trail(), vec!["/b", "/a"]);
        assert_eq!(
            err.to_string(),
            "Failed to resolve '/b': Failed to resolve '/a': Pointer not found: /missing"
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn test_construction_exposes_cause() {
        let err = ResolveError::construction("pkg", "Thing", FactoryError::other("boom"));
        assert_eq!(err.to_string(), "Failed to construct pkg#Thing: boom");
        assert_eq!(err.source().map(|s| s.to_string()), Some("boom".to_string()));
    }

    #[test]
    fn test_cycle_message() {
        let err = ResolveError::CyclicReference {
            chain: vec!["/a".to_string(), "/b".to_string(), "/a".to_string()],
        };
        assert_eq!(err.to_string(), "Cyclic reference: /a -> /b -> /a");
    }
}
