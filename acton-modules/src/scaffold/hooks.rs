//! Post-generation hooks

use super::write_file;
use crate::error::RegistryResult;
use crate::registry::Registry;
use serde::Serialize;
use std::path::PathBuf;

/// Manifest file written by [`ManifestCache`], relative to the modules root
pub const MANIFEST_FILE: &str = "modules.cache.json";

/// Work to run after a module has been scaffolded
///
/// Failures are logged by the generator and never reach the caller.
pub trait OptimizeHook {
    /// Run the hook
    ///
    /// # Errors
    ///
    /// Any error is reported as a warning by the generator.
    fn optimize(&self, registry: &Registry) -> RegistryResult<()>;
}

/// Hook that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHook;

impl OptimizeHook for NoopHook {
    fn optimize(&self, _registry: &Registry) -> RegistryResult<()> {
        Ok(())
    }
}

/// Rebuilds `modules.cache.json`, a flat manifest of every module
///
/// Host applications can load the manifest at boot instead of querying the
/// repository.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManifestCache;

#[derive(Debug, Serialize)]
struct ManifestEntry {
    slug: String,
    name: String,
    namespace: String,
    path: PathBuf,
    enabled: bool,
}

impl OptimizeHook for ManifestCache {
    fn optimize(&self, registry: &Registry) -> RegistryResult<()> {
        let entries: Vec<ManifestEntry> = registry
            .all()?
            .into_iter()
            .map(|module| ManifestEntry {
                namespace: registry.module_namespace(module.slug()),
                path: registry.paths().module_dir(module.slug()),
                enabled: module.is_enabled(),
                name: module.name(),
                slug: module.slug().to_string(),
            })
            .collect();

        let mut json = serde_json::to_string_pretty(&entries)?;
        json.push('\n');

        let path = registry.root_path().join(MANIFEST_FILE);
        write_file(&path, &json)?;
        tracing::debug!(path = %path.display(), modules = entries.len(), "Module manifest rebuilt");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModulesConfig;
    use crate::module::Slug;
    use crate::scaffold::ScaffoldGenerator;
    use serde_json::Value;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_manifest_lists_modules() {
        let dir = tempdir().unwrap();
        let registry = Registry::new(ModulesConfig::new(dir.path())).unwrap();
        let generator = ScaffoldGenerator::new(&registry).with_hook(NoopHook);
        generator.generate("blog").unwrap();
        generator.generate("shop").unwrap();
        registry.disable(&Slug::parse("shop").unwrap()).unwrap();

        ManifestCache.optimize(&registry).unwrap();

        let manifest: Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join(MANIFEST_FILE)).unwrap()).unwrap();
        let entries = manifest.as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["slug"], "blog");
        assert_eq!(entries[0]["namespace"], "crate::modules::blog");
        assert_eq!(entries[1]["name"], "Shop");
        assert_eq!(entries[1]["enabled"], false);
    }

    #[test]
    fn test_default_generator_writes_manifest() {
        let dir = tempdir().unwrap();
        let registry = Registry::new(ModulesConfig::new(dir.path())).unwrap();
        ScaffoldGenerator::new(&registry).generate("blog").unwrap();

        assert!(dir.path().join(MANIFEST_FILE).is_file());
    }

    #[test]
    fn test_manifest_is_not_a_module() {
        let dir = tempdir().unwrap();
        let registry = Registry::new(ModulesConfig::new(dir.path())).unwrap();
        ScaffoldGenerator::new(&registry).generate("blog").unwrap();
        ManifestCache.optimize(&registry).unwrap();

        assert_eq!(registry.count().unwrap(), 1);
    }
}
