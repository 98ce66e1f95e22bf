//! Construction of `$require` targets

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use crate::logging::file_logger as log;
use crate::resolver::{ResolveError, ResolveResult};
use crate::types::{ConstructRef, Instance};
use super::registry::ModuleRegistry;

/// Locates and invokes the export named by a [`ConstructRef`]
///
/// Arguments arrive already resolved; the resolution pass resolves the
/// `$args` node before calling [`ObjectFactory::construct`], so anything
/// nested in the arguments is built first.
#[derive(Debug, Clone)]
pub struct ObjectFactory {
    registry: Arc<ModuleRegistry>,
    base_dir: PathBuf,
}

impl ObjectFactory {
    pub fn new(registry: Arc<ModuleRegistry>, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            registry,
            base_dir: base_dir.into(),
        }
    }

    pub fn registry(&self) -> &Arc<ModuleRegistry> {
        &self.registry
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Registry key for a target: relative paths are joined onto the base
    /// directory and normalized lexically, other paths are used as-is
    pub fn module_key(&self, target: &ConstructRef) -> String {
        if target.is_relative() {
            normalize(&self.base_dir.join(&target.module_path))
                .to_string_lossy()
                .into_owned()
        } else {
            target.module_path.clone()
        }
    }

    /// Build the value for `target` from resolved `args`
    pub async fn construct(&self, target: &ConstructRef, args: Vec<Instance>) -> ResolveResult<Instance> {
        let module_key = self.module_key(target);
        let export_label = target.export_label();

        let module = self
            .registry
            .get(&module_key)
            .ok_or_else(|| ResolveError::ModuleLoad {
                module: module_key.clone(),
            })?;

        let export = module
            .export(target.export_name.as_deref())
            .cloned()
            .ok_or_else(|| ResolveError::ExportNotFound {
                module: module_key.clone(),
                export: export_label.to_string(),
            })?;

        log::debug(
            "object_factory",
            &format!("invoking {}#{} as {} with {} argument(s)", module_key, export_label, target.kind, args.len()),
        );

        let built = export
            .invoke(target.kind, args)
            .await
            .map_err(|cause| ResolveError::construction(&module_key, export_label, cause))?;

        let Some(pointer) = &target.pointer else {
            return Ok(built);
        };

        let post_pointer_error = |message: String| ResolveError::PostConstructionPointer {
            module: module_key.clone(),
            export: export_label.to_string(),
            pointer: pointer.to_string(),
            message,
        };

        if built.is_absent() {
            return Err(post_pointer_error("the constructed value is absent".to_string()));
        }

        pointer.get_instance(&built).ok_or_else(|| {
            post_pointer_error(format!("no such path in the constructed {}", built.kind_name()))
        })
    }
}

/// Turn a resolved `$args` value into an argument list
///
/// A sequence spreads into the list, `Absent` and `null` (an empty `$args:`
/// in YAML) give no arguments, and any other value is passed as the single
/// argument.
pub fn arguments_from(resolved: Instance) -> Vec<Instance> {
    match resolved {
        Instance::Absent | Instance::Null => Vec::new(),
        Instance::Sequence(items) => Arc::try_unwrap(items).unwrap_or_else(|shared| shared.as_ref().clone()),
        other => vec![other],
    }
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::{Export, Module};
    use serde_json::json;

    fn factory() -> ObjectFactory {
        let registry = Arc::new(ModuleRegistry::new());
        registry.register(
            "pkg",
            "test package",
            Module::new()
                .with_export("Thing", Export::class(|args| Ok(Instance::sequence(args))))
                .with_export("Inner", Export::object(Instance::from_value(&json!({"inner": 42}))))
                .with_export("Nothing", Export::function(|_| Ok(Instance::Absent)))
                .with_export("Broken", Export::class(|_| Err(crate::factory::FactoryError::other("boom"))))
                .with_default(Export::object(Instance::from("default"))),
        );
        registry.register(
            "/srv/conf/local",
            "local module",
            Module::new().with_export("Thing", Export::object(Instance::from("local"))),
        );
        ObjectFactory::new(registry, "/srv/conf")
    }

    #[test]
    fn test_module_key_rewrites_relative_paths() {
        let factory = factory();
        let key = |t: &str| factory.module_key(&ConstructRef::parse(t).unwrap());

        assert_eq!(key("pkg#Thing"), "pkg");
        assert_eq!(key("./local#Thing"), "/srv/conf/local");
        assert_eq!(key("./plugins/../local"), "/srv/conf/local");
        assert_eq!(key("../shared/db"), "/srv/shared/db");
    }

    #[tokio::test]
    async fn test_construct_class_with_args() {
        let target = ConstructRef::parse("pkg#Thing").unwrap();
        let built = factory().construct(&target, vec![Instance::from("abc")]).await.unwrap();
        assert_eq!(built.as_sequence().and_then(|s| s[0].as_str()), Some("abc"));
    }

    #[tokio::test]
    async fn test_construct_default_export() {
        let target = ConstructRef::parse("pkg?t=object").unwrap();
        let built = factory().construct(&target, vec![]).await.unwrap();
        assert_eq!(built.as_str(), Some("default"));
    }

    #[tokio::test]
    async fn test_construct_relative_module() {
        let target = ConstructRef::parse("./local#Thing?t=object").unwrap();
        let built = factory().construct(&target, vec![]).await.unwrap();
        assert_eq!(built.as_str(), Some("local"));
    }

    #[tokio::test]
    async fn test_missing_module_and_export() {
        let factory = factory();

        let missing_module = ConstructRef::parse("nope#Thing").unwrap();
        assert!(matches!(
            factory.construct(&missing_module, vec![]).await,
            Err(ResolveError::ModuleLoad { module }) if module == "nope"
        ));

        let missing_export = ConstructRef::parse("pkg#Nope").unwrap();
        assert!(matches!(
            factory.construct(&missing_export, vec![]).await,
            Err(ResolveError::ExportNotFound { export, .. }) if export == "Nope"
        ));
    }

    #[tokio::test]
    async fn test_construction_errors_are_wrapped() {
        let factory = factory();

        let broken = ConstructRef::parse("pkg#Broken").unwrap();
        let err = factory.construct(&broken, vec![]).await.unwrap_err();
        assert!(matches!(&err, ResolveError::Construction { module, export, .. } if module == "pkg" && export == "Broken"));
        assert!(err.to_string().contains("boom"));

        let wrong_kind = ConstructRef::parse("pkg#Inner?t=function").unwrap();
        assert!(matches!(
            factory.construct(&wrong_kind, vec![]).await,
            Err(ResolveError::Construction { .. })
        ));
    }

    #[tokio::test]
    async fn test_post_construction_pointer() {
        let factory = factory();

        let projected = ConstructRef::parse("pkg#Inner?t=object&p=/inner").unwrap();
        let value = factory.construct(&projected, vec![]).await.unwrap();
        assert_eq!(value.as_i64(), Some(42));

        let absent = ConstructRef::parse("pkg#Nothing?t=function&p=/inner").unwrap();
        assert!(matches!(
            factory.construct(&absent, vec![]).await,
            Err(ResolveError::PostConstructionPointer { .. })
        ));

        let missing_path = ConstructRef::parse("pkg#Inner?t=object&p=/other").unwrap();
        assert!(matches!(
            factory.construct(&missing_path, vec![]).await,
            Err(ResolveError::PostConstructionPointer { .. })
        ));
    }

    #[test]
    fn test_arguments_from() {
        assert!(arguments_from(Instance::Absent).is_empty());
        assert!(arguments_from(Instance::Null).is_empty());
        assert_eq!(arguments_from(Instance::from_value(&json!([1, 2]))).len(), 2);
        assert_eq!(arguments_from(Instance::from("solo")), vec![Instance::from("solo")]);
    }
}
