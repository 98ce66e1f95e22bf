//! Configuration for the resolver and loading of documents
//!
//! - `ResolverOptions`: base directory and environment overrides
//! - `DocumentFile`: a YAML or JSON document loaded from disk

mod options;
mod file;

pub use options::{ResolverOptions, BASE_DIR_ENV};
pub use file::{DocumentError, DocumentFile, DocumentFormat, DocumentResult, OUTPUTS_KEY};
