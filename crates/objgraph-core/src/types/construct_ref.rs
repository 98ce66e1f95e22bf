//! Parsed `$require` targets

use std::fmt;

use crate::pointer::Pointer;
use crate::resolver::{ResolveError, ResolveResult};

/// How a factory export is invoked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InvocationKind {
    /// Construct a new instance from the export's constructor
    #[default]
    Class,
    /// Call the export and use its return value
    Function,
    /// Use the export value itself, ignoring arguments
    Object,
}

impl InvocationKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "class" => Some(InvocationKind::Class),
            "function" => Some(InvocationKind::Function),
            "object" => Some(InvocationKind::Object),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InvocationKind::Class => "class",
            InvocationKind::Function => "function",
            InvocationKind::Object => "object",
        }
    }
}

impl fmt::Display for InvocationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A construction target: `<module>[#export][?t=class|function|object&p=<pointer>]`
///
/// # Example
///
/// ```
/// use objgraph_core::{ConstructRef, InvocationKind};
///
/// let target = ConstructRef::parse("./db#Pool?t=function&p=/primary").unwrap();
/// assert_eq!(target.module_path, "./db");
/// assert_eq!(target.export_name.as_deref(), Some("Pool"));
/// assert_eq!(target.kind, InvocationKind::Function);
/// assert!(target.is_relative());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructRef {
    pub module_path: String,
    /// `None` selects the module's default export
    pub export_name: Option<String>,
    pub kind: InvocationKind,
    /// Sub-value of the constructed value to hand out instead of the whole
    pub pointer: Option<Pointer>,
}

impl ConstructRef {
    /// Parse a target string
    pub fn parse(target: &str) -> ResolveResult<Self> {
        let (parsed, _, _) = Self::parse_parts(target)?;
        Ok(parsed)
    }

    /// Parse a target string, filling `t`/`p` from sibling keys when the
    /// query string does not set them
    pub(crate) fn parse_with_aliases(
        target: &str,
        kind_alias: Option<&str>,
        pointer_alias: Option<&str>,
    ) -> ResolveResult<Self> {
        let (mut parsed, has_kind, has_pointer) = Self::parse_parts(target)?;

        if !has_kind {
            if let Some(kind) = kind_alias {
                parsed.kind = parse_kind(target, kind)?;
            }
        }
        if !has_pointer {
            if let Some(pointer) = pointer_alias {
                parsed.pointer = Some(Pointer::parse(pointer)?);
            }
        }

        Ok(parsed)
    }

    fn parse_parts(target: &str) -> ResolveResult<(Self, bool, bool)> {
        let (location, query) = match target.split_once('?') {
            Some((location, query)) => (location, Some(query)),
            None => (target, None),
        };

        let (module_path, export_name) = match location.split_once('#') {
            Some((module, export)) => (module, Some(export)),
            None => (location, None),
        };

        if module_path.is_empty() {
            return Err(invalid(target, "module path is empty"));
        }
        if export_name == Some("") {
            return Err(invalid(target, "export name after '#' is empty"));
        }

        let mut kind = None;
        let mut pointer = None;
        for pair in query.unwrap_or_default().split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            match key {
                "t" => kind = Some(parse_kind(target, value)?),
                "p" => pointer = Some(Pointer::parse(value)?),
                _ => {}
            }
        }

        let has_kind = kind.is_some();
        let has_pointer = pointer.is_some();
        Ok((
            Self {
                module_path: module_path.to_string(),
                export_name: export_name.map(str::to_string),
                kind: kind.unwrap_or_default(),
                pointer,
            },
            has_kind,
            has_pointer,
        ))
    }

    /// Whether the module path is relative to the configured base directory
    pub fn is_relative(&self) -> bool {
        self.module_path.starts_with("./") || self.module_path.starts_with("../")
    }

    /// Export name used in messages (`default` when none was given)
    pub fn export_label(&self) -> &str {
        self.export_name.as_deref().unwrap_or("default")
    }
}

fn parse_kind(target: &str, value: &str) -> ResolveResult<InvocationKind> {
    InvocationKind::parse(value).ok_or_else(|| {
        invalid(
            target,
            &format!("unknown invocation kind '{}' (expected class, function or object)", value),
        )
    })
}

fn invalid(target: &str, message: &str) -> ResolveError {
    ResolveError::InvalidDirective {
        directive: "$require",
        message: format!("'{}': {}", target, message),
    }
}

impl fmt::Display for ConstructRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.module_path)?;
        if let Some(export) = &self.export_name {
            write!(f, "#{}", export)?;
        }
        write!(f, "?t={}", self.kind)?;
        if let Some(pointer) = &self.pointer {
            write!(f, "&p={}", pointer)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_module_only() {
        let target = ConstructRef::parse("pkg").unwrap();
        assert_eq!(target.module_path, "pkg");
        assert_eq!(target.export_name, None);
        assert_eq!(target.kind, InvocationKind::Class);
        assert_eq!(target.pointer, None);
        assert_eq!(target.export_label(), "default");
        assert!(!target.is_relative());
    }

    #[test]
    fn test_parse_full_target() {
        let target = ConstructRef::parse("../plugins/db#Pool?t=object&p=/inner/0").unwrap();
        assert_eq!(target.module_path, "../plugins/db");
        assert_eq!(target.export_name.as_deref(), Some("Pool"));
        assert_eq!(target.kind, InvocationKind::Object);
        assert_eq!(target.pointer.as_ref().map(|p| p.to_string()), Some("/inner/0".to_string()));
        assert!(target.is_relative());
    }

    #[test]
    fn test_unknown_query_params_ignored() {
        let target = ConstructRef::parse("pkg#Thing?x=1&t=function&&").unwrap();
        assert_eq!(target.kind, InvocationKind::Function);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(ConstructRef::parse(""), Err(ResolveError::InvalidDirective { .. })));
        assert!(matches!(ConstructRef::parse("#Thing"), Err(ResolveError::InvalidDirective { .. })));
        assert!(matches!(ConstructRef::parse("pkg#"), Err(ResolveError::InvalidDirective { .. })));
        assert!(matches!(ConstructRef::parse("pkg?t=singleton"), Err(ResolveError::InvalidDirective { .. })));
        assert!(matches!(ConstructRef::parse("pkg?p=inner"), Err(ResolveError::InvalidPointer(_))));
    }

    #[test]
    fn test_aliases_fill_missing_query_params() {
        let target = ConstructRef::parse_with_aliases("pkg#Thing", Some("object"), Some("/inner")).unwrap();
        assert_eq!(target.kind, InvocationKind::Object);
        assert_eq!(target.pointer, Some(Pointer::parse("/inner").unwrap()));

        let query_wins =
            ConstructRef::parse_with_aliases("pkg#Thing?t=function&p=/a", Some("object"), Some("/b")).unwrap();
        assert_eq!(query_wins.kind, InvocationKind::Function);
        assert_eq!(query_wins.pointer, Some(Pointer::parse("/a").unwrap()));
    }

    #[test]
    fn test_display() {
        let target = ConstructRef::parse("pkg#Thing?p=/x").unwrap();
        assert_eq!(target.to_string(), "pkg#Thing?t=class&p=/x");
    }
}
