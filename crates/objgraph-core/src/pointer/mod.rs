//! JSON Pointer (RFC 6901) addressing
//!
//! Pointers address locations inside the configuration document
//! (`/services/db/0`) and, after construction, inside resolved values.
//! `~0` and `~1` escape `~` and `/` inside a segment. A leading `#` (the URI
//! fragment spelling, `#/a/b`) is accepted and ignored, so both spellings
//! name the same location.

use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::types::Instance;

/// Errors that can occur while parsing or applying a pointer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PointerError {
    #[error("Invalid pointer '{pointer}': {reason}")]
    Invalid { pointer: String, reason: String },

    #[error("Cannot set '{pointer}': {reason}")]
    Unassignable { pointer: String, reason: String },
}

pub type PointerResult<T> = Result<T, PointerError>;

/// A parsed JSON Pointer
///
/// # Example
///
/// ```
/// use objgraph_core::pointer::Pointer;
/// use serde_json::json;
///
/// let doc = json!({"a/b": [10, 20]});
/// let pointer = Pointer::parse("/a~1b/1").unwrap();
/// assert_eq!(pointer.get(&doc), Some(&json!(20)));
/// assert_eq!(pointer.to_string(), "/a~1b/1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Pointer {
    segments: Vec<String>,
}

impl Pointer {
    /// The pointer to the whole document
    pub fn root() -> Self {
        Self { segments: Vec::new() }
    }

    /// Parse RFC 6901 syntax
    pub fn parse(text: &str) -> PointerResult<Self> {
        let body = text.strip_prefix('#').unwrap_or(text);
        if body.is_empty() {
            return Ok(Self::root());
        }

        let Some(rest) = body.strip_prefix('/') else {
            return Err(PointerError::Invalid {
                pointer: text.to_string(),
                reason: "must be empty or start with '/'".to_string(),
            });
        };

        let segments = rest
            .split('/')
            .map(|raw| {
                unescape(raw).ok_or_else(|| PointerError::Invalid {
                    pointer: text.to_string(),
                    reason: format!("bad escape in segment '{}'", raw),
                })
            })
            .collect::<PointerResult<Vec<_>>>()?;

        Ok(Self { segments })
    }

    /// Build a pointer from unescaped segments
    pub fn from_segments<S: Into<String>>(segments: impl IntoIterator<Item = S>) -> Self {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Pointer to a child key of this location
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self { segments }
    }

    /// Pointer to an element of the sequence at this location
    pub fn index(&self, index: usize) -> Self {
        self.child(index.to_string())
    }

    /// Read the node at this location, `None` if the path does not exist
    pub fn get<'v>(&self, root: &'v Value) -> Option<&'v Value> {
        let mut current = root;
        for segment in &self.segments {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(parse_index(segment)?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Read the resolved value at this location
    ///
    /// Traverses mappings and sequences only; opaque objects have no
    /// addressable children.
    pub fn get_instance(&self, root: &Instance) -> Option<Instance> {
        let mut current = root;
        for segment in &self.segments {
            current = match current {
                Instance::Mapping(map) => map.get(segment)?,
                Instance::Sequence(items) => items.get(parse_index(segment)?)?,
                _ => return None,
            };
        }
        Some(current.clone())
    }

    /// Write `value` at this location, creating intermediate containers
    ///
    /// A missing intermediate becomes an array when the segment used to
    /// index into it is a number or `-`, and an object otherwise. On
    /// arrays, `-` or an index equal to the length appends.
    pub fn set(&self, root: &mut Value, value: Value) -> PointerResult<()> {
        let mut current = root;
        for segment in &self.segments {
            current = slot(current, segment).map_err(|reason| PointerError::Unassignable {
                pointer: self.to_string(),
                reason,
            })?;
        }
        *current = value;
        Ok(())
    }
}

fn slot<'v>(node: &'v mut Value, segment: &str) -> Result<&'v mut Value, String> {
    if node.is_null() {
        *node = if is_array_segment(segment) {
            Value::Array(Vec::new())
        } else {
            Value::Object(Map::new())
        };
    }

    match node {
        Value::Object(map) => Ok(map.entry(segment.to_string()).or_insert(Value::Null)),
        Value::Array(items) => {
            let index = if segment == "-" {
                items.len()
            } else {
                parse_index(segment)
                    .ok_or_else(|| format!("'{}' is not an array index", segment))?
            };
            if index > items.len() {
                return Err(format!(
                    "index {} is out of bounds for an array of length {}",
                    index,
                    items.len()
                ));
            }
            if index == items.len() {
                items.push(Value::Null);
            }
            Ok(&mut items[index])
        }
        other => Err(format!("cannot descend into {}", scalar_name(other))),
    }
}

fn scalar_name(value: &Value) -> &'static str {
    match value {
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        _ => "a scalar",
    }
}

fn is_array_segment(segment: &str) -> bool {
    segment == "-" || parse_index(segment).is_some()
}

/// RFC 6901 array index: `0` or digits without a leading zero
fn parse_index(segment: &str) -> Option<usize> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if segment.len() > 1 && segment.starts_with('0') {
        return None;
    }
    segment.parse().ok()
}

fn unescape(raw: &str) -> Option<String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c == '~' {
            match chars.next() {
                Some('0') => out.push('~'),
                Some('1') => out.push('/'),
                _ => return None,
            }
        } else {
            out.push(c);
        }
    }
    Some(out)
}

fn escape(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

impl fmt::Display for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, "/{}", escape(segment))?;
        }
        Ok(())
    }
}

impl FromStr for Pointer {
    type Err = PointerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Pointer::parse(s)
    }
}
