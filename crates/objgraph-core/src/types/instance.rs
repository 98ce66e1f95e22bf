//! Resolved values

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::{Number, Value};

/// A value produced by resolving a configuration node
///
/// Scalars are held by value. Sequences, mappings and factory-built
/// objects are reference counted, so every `$ref` to the same pointer
/// hands out the same allocation; use [`Instance::same_instance`] to
/// observe that.
#[derive(Clone)]
pub enum Instance {
    /// An unset environment variable or a factory that produced nothing
    Absent,
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Sequence(Arc<Vec<Instance>>),
    Mapping(Arc<BTreeMap<String, Instance>>),
    /// An opaque value built by a factory
    Object(Arc<dyn Any + Send + Sync>),
}

impl Instance {
    /// Wrap a factory-built value
    pub fn object<T: Any + Send + Sync>(value: T) -> Self {
        Instance::Object(Arc::new(value))
    }

    /// Wrap an already shared factory-built value without re-allocating
    pub fn from_arc<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        Instance::Object(value)
    }

    /// Build a sequence instance
    pub fn sequence(items: Vec<Instance>) -> Self {
        Instance::Sequence(Arc::new(items))
    }

    /// Build a mapping instance
    pub fn mapping(entries: BTreeMap<String, Instance>) -> Self {
        Instance::Mapping(Arc::new(entries))
    }

    /// Deep-copy a literal configuration node
    ///
    /// Directive keys are copied verbatim; no resolution happens here.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Null => Instance::Null,
            Value::Bool(b) => Instance::Bool(*b),
            Value::Number(n) => Instance::Number(n.clone()),
            Value::String(s) => Instance::String(s.clone()),
            Value::Array(items) => Instance::sequence(items.iter().map(Instance::from_value).collect()),
            Value::Object(map) => Instance::mapping(
                map.iter()
                    .map(|(k, v)| (k.clone(), Instance::from_value(v)))
                    .collect(),
            ),
        }
    }

    /// Convert back to a plain JSON value
    ///
    /// Returns `None` if the instance contains an opaque object. `Absent`
    /// becomes `null`.
    pub fn to_value(&self) -> Option<Value> {
        Some(match self {
            Instance::Absent | Instance::Null => Value::Null,
            Instance::Bool(b) => Value::Bool(*b),
            Instance::Number(n) => Value::Number(n.clone()),
            Instance::String(s) => Value::String(s.clone()),
            Instance::Sequence(items) => Value::Array(
                items.iter().map(Instance::to_value).collect::<Option<Vec<_>>>()?,
            ),
            Instance::Mapping(map) => {
                let mut out = serde_json::Map::new();
                for (k, v) in map.iter() {
                    out.insert(k.clone(), v.to_value()?);
                }
                Value::Object(out)
            }
            Instance::Object(_) => return None,
        })
    }

    /// Short name of the variant, used in error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            Instance::Absent => "absent",
            Instance::Null => "null",
            Instance::Bool(_) => "bool",
            Instance::Number(_) => "number",
            Instance::String(_) => "string",
            Instance::Sequence(_) => "sequence",
            Instance::Mapping(_) => "mapping",
            Instance::Object(_) => "object",
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Instance::Absent)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Instance::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Instance::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Instance::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Instance::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Instance]> {
        match self {
            Instance::Sequence(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&BTreeMap<String, Instance>> {
        match self {
            Instance::Mapping(map) => Some(map.as_ref()),
            _ => None,
        }
    }

    /// Look up a key in a mapping instance
    pub fn get(&self, key: &str) -> Option<&Instance> {
        self.as_mapping().and_then(|map| map.get(key))
    }

    /// Borrow the opaque object as a concrete type
    pub fn downcast_ref<T: Any + Send + Sync>(&self) -> Option<&T> {
        match self {
            Instance::Object(obj) => obj.downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Get a shared handle to the opaque object as a concrete type
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        match self {
            Instance::Object(obj) => Arc::clone(obj).downcast::<T>().ok(),
            _ => None,
        }
    }

    /// Check whether two instances are the same allocation
    ///
    /// Reference-typed values (sequences, mappings, objects) compare by
    /// identity. Scalars have no identity and compare by value.
    pub fn same_instance(&self, other: &Instance) -> bool {
        match (self, other) {
            (Instance::Sequence(a), Instance::Sequence(b)) => Arc::ptr_eq(a, b),
            (Instance::Mapping(a), Instance::Mapping(b)) => Arc::ptr_eq(a, b),
            (Instance::Object(a), Instance::Object(b)) => {
                Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
            }
            (Instance::Sequence(_), _)
            | (Instance::Mapping(_), _)
            | (Instance::Object(_), _) => false,
            (a, b) => a == b,
        }
    }
}

/// Structural equality; opaque objects are equal only when identical
impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Instance::Absent, Instance::Absent) => true,
            (Instance::Null, Instance::Null) => true,
            (Instance::Bool(a), Instance::Bool(b)) => a == b,
            (Instance::Number(a), Instance::Number(b)) => a == b,
            (Instance::String(a), Instance::String(b)) => a == b,
            (Instance::Sequence(a), Instance::Sequence(b)) => a == b,
            (Instance::Mapping(a), Instance::Mapping(b)) => a == b,
            (Instance::Object(_), Instance::Object(_)) => self.same_instance(other),
            _ => false,
        }
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instance::Absent => write!(f, "Absent"),
            Instance::Null => write!(f, "Null"),
            Instance::Bool(b) => write!(f, "Bool({})", b),
            Instance::Number(n) => write!(f, "Number({})", n),
            Instance::String(s) => write!(f, "String({:?})", s),
            Instance::Sequence(items) => f.debug_list().entries(items.iter()).finish(),
            Instance::Mapping(map) => f.debug_map().entries(map.iter()).finish(),
            Instance::Object(_) => write!(f, "Object(..)"),
        }
    }
}

impl Default for Instance {
    fn default() -> Self {
        Instance::Absent
    }
}

impl From<&Value> for Instance {
    fn from(value: &Value) -> Self {
        Instance::from_value(value)
    }
}

impl From<&str> for Instance {
    fn from(s: &str) -> Self {
        Instance::String(s.to_string())
    }
}

impl From<String> for Instance {
    fn from(s: String) -> Self {
        Instance::String(s)
    }
}

impl From<bool> for Instance {
    fn from(b: bool) -> Self {
        Instance::Bool(b)
    }
}

impl From<i64> for Instance {
    fn from(n: i64) -> Self {
        Instance::Number(n.into())
    }
}

impl From<u64> for Instance {
    fn from(n: u64) -> Self {
        Instance::Number(n.into())
    }
}

impl From<Vec<Instance>> for Instance {
    fn from(items: Vec<Instance>) -> Self {
        Instance::sequence(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_round_trips_literals() {
        let doc = json!({"a": [1, "two", true, null], "b": {"c": 1.5}});
        let instance = Instance::from_value(&doc);

        assert_eq!(instance.get("a").and_then(|a| a.as_sequence()).map(|s| s.len()), Some(4));
        assert_eq!(instance.get("b").and_then(|b| b.get("c")).and_then(Instance::as_f64), Some(1.5));
        assert_eq!(instance.to_value(), Some(doc));
    }

    #[test]
    fn test_same_instance_tracks_identity() {
        let a = Instance::from_value(&json!({"value": 1}));
        let shared = a.clone();
        let copy = Instance::from_value(&json!({"value": 1}));

        assert!(a.same_instance(&shared));
        assert!(!a.same_instance(&copy));
        assert_eq!(a, copy);
    }

    #[test]
    fn test_scalars_compare_by_value() {
        assert!(Instance::from(42i64).same_instance(&Instance::from(42i64)));
        assert!(!Instance::from("a").same_instance(&Instance::from("b")));
        assert!(Instance::Absent.same_instance(&Instance::Absent));
        assert_ne!(Instance::Absent, Instance::Null);
    }

    #[test]
    fn test_object_downcast() {
        #[derive(Debug, PartialEq)]
        struct Service {
            token: String,
        }

        let instance = Instance::object(Service { token: "abc".to_string() });
        assert_eq!(instance.downcast_ref::<Service>().map(|s| s.token.as_str()), Some("abc"));
        assert!(instance.downcast_ref::<String>().is_none());

        let handle = instance.downcast::<Service>().unwrap();
        assert!(instance.same_instance(&Instance::from_arc(handle)));
        assert_eq!(instance.to_value(), None);
        assert_eq!(instance.kind_name(), "object");
    }
}
