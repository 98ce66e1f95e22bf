//! Classification of configuration nodes by their reserved keys

use serde_json::{Map, Value};

use crate::pointer::Pointer;
use crate::resolver::{ResolveError, ResolveResult};
use super::construct_ref::ConstructRef;

/// Reference to another location in the same document
pub const REF_KEY: &str = "$ref";
/// Construction target
pub const REQUIRE_KEY: &str = "$require";
/// Arguments for a `$require` target
pub const ARGS_KEY: &str = "$args";
/// Environment variable lookup
pub const ENV_KEY: &str = "$env";

const KIND_ALIAS_KEY: &str = "t";
const POINTER_ALIAS_KEY: &str = "p";

/// What a configuration node asks the resolver to do
///
/// Decoded once per node by [`Directive::classify`]. On mappings the
/// reserved keys are exclusive, checked in order: `$require` (only its
/// `$args` and the `t`/`p` aliases are read), then `$ref`, then `$env`.
/// Any other sibling keys on a directive mapping are ignored.
#[derive(Debug)]
pub enum Directive<'a> {
    Ref(Pointer),
    Require {
        target: ConstructRef,
        args: Option<&'a Value>,
    },
    Env(&'a str),
    /// A mapping without reserved keys; every value is resolved
    Plain(&'a Map<String, Value>),
    Sequence(&'a [Value]),
    Scalar(&'a Value),
}

impl<'a> Directive<'a> {
    /// Classify `node`, located at `at` in the document
    pub fn classify(node: &'a Value, at: &Pointer) -> ResolveResult<Self> {
        let map = match node {
            Value::Object(map) => map,
            Value::Array(items) => return Ok(Directive::Sequence(items)),
            scalar => return Ok(Directive::Scalar(scalar)),
        };

        if let Some(target) = map.get(REQUIRE_KEY) {
            let target = expect_str(REQUIRE_KEY, target, at)?;
            let kind_alias = optional_str(KIND_ALIAS_KEY, map, at)?;
            let pointer_alias = optional_str(POINTER_ALIAS_KEY, map, at)?;
            return Ok(Directive::Require {
                target: ConstructRef::parse_with_aliases(target, kind_alias, pointer_alias)?,
                args: map.get(ARGS_KEY),
            });
        }

        if let Some(pointer) = map.get(REF_KEY) {
            let pointer = expect_str(REF_KEY, pointer, at)?;
            return Ok(Directive::Ref(Pointer::parse(pointer)?));
        }

        if let Some(name) = map.get(ENV_KEY) {
            return Ok(Directive::Env(expect_str(ENV_KEY, name, at)?));
        }

        Ok(Directive::Plain(map))
    }
}

fn expect_str<'a>(key: &'static str, value: &'a Value, at: &Pointer) -> ResolveResult<&'a str> {
    value.as_str().ok_or_else(|| ResolveError::InvalidDirective {
        directive: key,
        message: format!("value at '{}' must be a string", at.child(key)),
    })
}

fn optional_str<'a>(
    key: &'static str,
    map: &'a Map<String, Value>,
    at: &Pointer,
) -> ResolveResult<Option<&'a str>> {
    map.get(key).map(|value| expect_str(key, value, at)).transpose()
}
