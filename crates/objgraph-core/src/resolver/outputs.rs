//! Requested outputs and pass results

use std::collections::HashMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use crate::types::Instance;

/// The caller's request: output name -> pointer, in request order
///
/// Outputs are resolved in the order they were inserted. Inserting a name
/// twice replaces the pointer but keeps the original position.
///
/// # Example
///
/// ```
/// use objgraph_core::OutputSpec;
///
/// let outputs = OutputSpec::new().with("db", "/services/db").with("api", "/services/api");
/// assert_eq!(outputs.get("db"), Some("/services/db"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputSpec {
    entries: Vec<(String, String)>,
}

impl OutputSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request `name` from `pointer`
    pub fn insert(&mut self, name: impl Into<String>, pointer: impl Into<String>) {
        let name = name.into();
        let pointer = pointer.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = pointer,
            None => self.entries.push((name, pointer)),
        }
    }

    /// Builder form of [`insert`](Self::insert)
    pub fn with(mut self, name: impl Into<String>, pointer: impl Into<String>) -> Self {
        self.insert(name, pointer);
        self
    }

    /// Pointer requested for `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, p)| p.as_str())
    }

    /// (name, pointer) pairs in request order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, p)| (n.as_str(), p.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for OutputSpec {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut spec = OutputSpec::new();
        for (name, pointer) in iter {
            spec.insert(name, pointer);
        }
        spec
    }
}

/// Deserializes from a mapping of name -> pointer, keeping document order
impl<'de> Deserialize<'de> for OutputSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OutputSpecVisitor;

        impl<'de> Visitor<'de> for OutputSpecVisitor {
            type Value = OutputSpec;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping of output names to pointers")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<OutputSpec, A::Error> {
                let mut spec = OutputSpec::new();
                while let Some((name, pointer)) = map.next_entry::<String, String>()? {
                    spec.insert(name, pointer);
                }
                Ok(spec)
            }
        }

        deserializer.deserialize_map(OutputSpecVisitor)
    }
}

/// Counters collected during one pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassStats {
    /// Entries written to the instance cache
    pub cached: usize,
    /// Lookups answered from the instance cache
    pub cache_hits: usize,
    /// Factory invocations
    pub constructions: usize,
}

/// Output of a successful pass: output name -> instance
#[derive(Debug, Clone, Default)]
pub struct ResolvedGraph {
    values: Vec<(String, Instance)>,
    stats: PassStats,
}

impl ResolvedGraph {
    pub(crate) fn new(values: Vec<(String, Instance)>, stats: PassStats) -> Self {
        Self { values, stats }
    }

    pub fn get(&self, name: &str) -> Option<&Instance> {
        self.values.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Output names in request order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Instance)> {
        self.values.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn stats(&self) -> PassStats {
        self.stats
    }

    pub fn into_map(self) -> HashMap<String, Instance> {
        self.values.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_position() {
        let mut spec = OutputSpec::new().with("b", "/b").with("a", "/a");
        spec.insert("b", "/other");

        let pairs: Vec<_> = spec.iter().collect();
        assert_eq!(pairs, vec![("b", "/other"), ("a", "/a")]);
        assert_eq!(spec.len(), 2);
    }

    #[test]
    fn test_from_iterator() {
        let spec: OutputSpec = [("x", "/a"), ("y", "/b")].into_iter().collect();
        assert_eq!(spec.get("y"), Some("/b"));
        assert_eq!(spec.get("z"), None);
    }

    #[test]
    fn test_deserialize_keeps_order() {
        let spec: OutputSpec = serde_yaml::from_str("zeta: /z\nalpha: /a\n").unwrap();
        let names: Vec<_> = spec.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);

        let spec: OutputSpec = serde_json::from_str(r#"{"x": "/a"}"#).unwrap();
        assert_eq!(spec.get("x"), Some("/a"));

        assert!(serde_json::from_str::<OutputSpec>(r#"{"x": 1}"#).is_err());
    }

    #[test]
    fn test_resolved_graph_accessors() {
        let graph = ResolvedGraph::new(
            vec![("x".to_string(), Instance::from(1i64)), ("y".to_string(), Instance::Absent)],
            PassStats::default(),
        );

        assert_eq!(graph.names().collect::<Vec<_>>(), vec!["x", "y"]);
        assert_eq!(graph.get("x").and_then(Instance::as_i64), Some(1));
        assert!(graph.get("y").map(Instance::is_absent).unwrap_or(false));
        assert_eq!(graph.into_map().len(), 2);
    }
}
