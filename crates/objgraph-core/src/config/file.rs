//! Loading configuration documents from disk (YAML or JSON)
//!
//! Parsing is delegated to `serde_yaml` / `serde_json`; the resolver itself
//! only ever sees the resulting `serde_json::Value` tree.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::resolver::OutputSpec;

/// Top-level key that may hold the outputs a document wants resolved
pub const OUTPUTS_KEY: &str = "outputs";

/// Errors that can occur while loading a document
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid '{key}' section: {message}")]
    InvalidOutputs { key: &'static str, message: String },
}

pub type DocumentResult<T> = Result<T, DocumentError>;

/// Document serialization format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Json,
}

impl DocumentFormat {
    /// Pick a format from the file extension; anything but `.json` is YAML
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => DocumentFormat::Json,
            _ => DocumentFormat::Yaml,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentFormat::Yaml => "yaml",
            DocumentFormat::Json => "json",
        }
    }

    /// Parse document text in this format
    pub fn parse(&self, content: &str) -> DocumentResult<Value> {
        match self {
            DocumentFormat::Yaml => Ok(serde_yaml::from_str(content)?),
            DocumentFormat::Json => Ok(serde_json::from_str(content)?),
        }
    }
}

/// A configuration document loaded from a file
///
/// The file's directory becomes the base directory for relative
/// `$require` paths when the builder is created with
/// [`GraphBuilder::for_document_file`](crate::GraphBuilder::for_document_file).
///
/// # Example
///
/// ```no_run
/// use objgraph_core::DocumentFile;
///
/// let file = DocumentFile::load("/etc/app/wiring.yaml").unwrap();
/// assert_eq!(file.base_dir().to_str(), Some("/etc/app"));
/// ```
#[derive(Debug, Clone)]
pub struct DocumentFile {
    path: PathBuf,
    format: DocumentFormat,
    document: Value,
}

impl DocumentFile {
    /// Load and parse a document
    ///
    /// A relative path is made absolute against the current directory so
    /// the base directory is stable.
    pub fn load(path: impl AsRef<Path>) -> DocumentResult<Self> {
        let path = absolute(path.as_ref())?;
        let format = DocumentFormat::from_path(&path);
        let document = read(&path, format)?;
        Ok(Self { path, format, document })
    }

    /// Load and parse a document without blocking the runtime
    pub async fn load_async(path: impl AsRef<Path>) -> DocumentResult<Self> {
        let path = absolute(path.as_ref())?;
        let format = DocumentFormat::from_path(&path);
        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| DocumentError::Io {
                path: path.clone(),
                source,
            })?;
        let document = format.parse(&content)?;
        Ok(Self { path, format, document })
    }

    /// Get the document file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> DocumentFormat {
        self.format
    }

    /// The directory containing the document
    pub fn base_dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("/"))
    }

    /// The parsed tree
    pub fn document(&self) -> &Value {
        &self.document
    }

    pub fn into_document(self) -> Value {
        self.document
    }

    /// Re-read the file from disk
    pub fn reload(&mut self) -> DocumentResult<&Value> {
        self.document = read(&self.path, self.format)?;
        Ok(&self.document)
    }

    /// The `outputs` section, if the document has one
    pub fn outputs(&self) -> DocumentResult<Option<OutputSpec>> {
        let Some(section) = self.document.get(OUTPUTS_KEY) else {
            return Ok(None);
        };
        let outputs = OutputSpec::deserialize(section).map_err(|e| DocumentError::InvalidOutputs {
            key: OUTPUTS_KEY,
            message: e.to_string(),
        })?;
        Ok(Some(outputs))
    }
}

fn read(path: &Path, format: DocumentFormat) -> DocumentResult<Value> {
    let content = fs::read_to_string(path).map_err(|source| DocumentError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    format.parse(&content)
}

fn absolute(path: &Path) -> DocumentResult<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().map_err(|source| DocumentError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(cwd.join(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(DocumentFormat::from_path(Path::new("a.json")), DocumentFormat::Json);
        assert_eq!(DocumentFormat::from_path(Path::new("a.JSON")), DocumentFormat::Json);
        assert_eq!(DocumentFormat::from_path(Path::new("a.yaml")), DocumentFormat::Yaml);
        assert_eq!(DocumentFormat::from_path(Path::new("a.yml")), DocumentFormat::Yaml);
        assert_eq!(DocumentFormat::from_path(Path::new("wiring")), DocumentFormat::Yaml);
    }

    #[test]
    fn test_load_yaml() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "wiring.yaml",
            "svc:\n  $require: pkg#Thing\n  $args:\n    - $env: TOKEN\nlist: [1, 2]\n",
        );

        let file = DocumentFile::load(&path).unwrap();
        assert_eq!(file.format(), DocumentFormat::Yaml);
        assert_eq!(file.base_dir(), dir.path());
        assert_eq!(
            file.document(),
            &json!({"svc": {"$require": "pkg#Thing", "$args": [{"$env": "TOKEN"}]}, "list": [1, 2]})
        );
    }

    #[test]
    fn test_load_json_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "wiring.json", r#"{"a": 1}"#);

        let mut file = DocumentFile::load(&path).unwrap();
        assert_eq!(file.document(), &json!({"a": 1}));

        fs::write(&path, r#"{"a": 2}"#).unwrap();
        assert_eq!(file.reload().unwrap(), &json!({"a": 2}));
        assert_eq!(file.into_document(), json!({"a": 2}));
    }

    #[test]
    fn test_outputs_section() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "wiring.yaml", "outputs:\n  db: /db\n  api: /api\ndb: {}\napi: {}\n");

        let outputs = DocumentFile::load(&path).unwrap().outputs().unwrap().unwrap();
        assert_eq!(outputs.iter().collect::<Vec<_>>(), vec![("db", "/db"), ("api", "/api")]);

        let bad = write(&dir, "bad.yaml", "outputs: [1, 2]\n");
        assert!(matches!(
            DocumentFile::load(&bad).unwrap().outputs(),
            Err(DocumentError::InvalidOutputs { .. })
        ));

        let none = write(&dir, "none.yaml", "a: 1\n");
        assert!(DocumentFile::load(&none).unwrap().outputs().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_load_async() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "wiring.yml", "a:\n  $ref: /b\nb: 1\n");

        let file = DocumentFile::load_async(&path).await.unwrap();
        assert_eq!(file.path(), path.as_path());
        assert_eq!(file.document(), &json!({"a": {"$ref": "/b"}, "b": 1}));

        assert!(matches!(
            DocumentFile::load_async(dir.path().join("missing.json")).await,
            Err(DocumentError::Io { .. })
        ));
    }

    #[test]
    fn test_load_errors() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            DocumentFile::load(dir.path().join("missing.yaml")),
            Err(DocumentError::Io { .. })
        ));

        let broken = write(&dir, "broken.json", "{not json");
        assert!(matches!(DocumentFile::load(&broken), Err(DocumentError::Json(_))));

        let broken_yaml = write(&dir, "broken.yaml", "a: [1, 2\n");
        assert!(matches!(DocumentFile::load(&broken_yaml), Err(DocumentError::Yaml(_))));
    }
}
