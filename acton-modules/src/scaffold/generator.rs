//! Module skeleton generator

use super::hooks::{ManifestCache, OptimizeHook};
use super::{create_dir, write_file};
use crate::error::{RegistryError, RegistryResult};
use crate::module::{Module, Properties, Slug};
use crate::paths::DESCRIPTOR_FILE;
use crate::registry::Registry;
use crate::template::{Bindings, Placeholder, Stub, StubStore, TemplateRenderer};
use std::path::PathBuf;

/// Subfolders created in every new module, in creation order
pub const SUBFOLDERS: [&str; 12] = [
    "console",
    "database",
    "database/migrations",
    "database/seeds",
    "http",
    "http/controllers",
    "http/middleware",
    "http/requests",
    "providers",
    "resources",
    "resources/lang",
    "resources/views",
];

/// Files rendered into every new module; paths are templates too
const FILES: [(&str, Stub); 5] = [
    ("database/seeds/{{slug}}_database_seeder.rs", Stub::Seeder),
    ("http/routes.rs", Stub::Routes),
    ("providers/{{slug}}_service_provider.rs", Stub::ModuleServiceProvider),
    ("providers/route_service_provider.rs", Stub::RouteServiceProvider),
    (DESCRIPTOR_FILE, Stub::Descriptor),
];

const GITKEEP: &str = ".gitkeep";

/// Outcome of a successful scaffold
#[derive(Debug, Clone)]
pub struct ScaffoldReport {
    /// The registered module
    pub module: Module,
    /// Directories created (or already present), module directory first
    pub directories: Vec<PathBuf>,
    /// Files written, in write order
    pub files: Vec<PathBuf>,
}

/// Creates new modules
///
/// # Examples
///
/// ```rust,no_run
/// use acton_modules::{ModulesConfig, Registry, ScaffoldGenerator};
///
/// let registry = Registry::new(ModulesConfig::new("modules"))?;
/// let report = ScaffoldGenerator::new(&registry).generate("blog")?;
///
/// println!("Created {} files", report.files.len());
/// # Ok::<(), acton_modules::RegistryError>(())
/// ```
pub struct ScaffoldGenerator<'a> {
    registry: &'a Registry,
    stubs: StubStore,
    hook: Box<dyn OptimizeHook + 'a>,
}

impl<'a> ScaffoldGenerator<'a> {
    /// Create a generator using the configured stub overrides and the manifest
    /// cache hook
    #[must_use]
    pub fn new(registry: &'a Registry) -> Self {
        Self {
            registry,
            stubs: StubStore::new(registry.config().stubs_path.clone()),
            hook: Box::new(ManifestCache),
        }
    }

    /// Replace the post-generation hook
    #[must_use]
    pub fn with_hook(mut self, hook: impl OptimizeHook + 'a) -> Self {
        self.hook = Box::new(hook);
        self
    }

    /// Scaffold a new module named `name`
    ///
    /// # Errors
    ///
    /// - [`RegistryError::InvalidSlug`] if `name` cannot be normalised
    /// - [`RegistryError::AlreadyExists`] if the module exists; nothing is
    ///   written
    /// - [`RegistryError::Io`] (or a storage error) if a step fails; earlier
    ///   steps are not undone
    pub fn generate(&self, name: &str) -> RegistryResult<ScaffoldReport> {
        let slug = Slug::parse(name)?;
        if self.registry.exists(&slug)? {
            return Err(RegistryError::AlreadyExists(slug.to_string()));
        }

        let module_dir = self.registry.resolve_path(&slug, true)?;
        create_dir(self.registry.root_path())?;
        create_dir(&module_dir)?;

        let mut directories = vec![module_dir.clone()];
        for folder in SUBFOLDERS {
            let path = module_dir.join(folder);
            create_dir(&path)?;
            directories.push(path);
        }

        let mut files = Vec::with_capacity(SUBFOLDERS.len() + FILES.len());
        for folder in &directories[1..] {
            let path = folder.join(GITKEEP);
            write_file(&path, "")?;
            files.push(path);
        }

        let bindings = Bindings::new()
            .with(Placeholder::Slug, slug.as_str())
            .with(Placeholder::Name, slug.name())
            .with(Placeholder::Namespace, self.registry.namespace_prefix());

        let mut descriptor = String::new();
        for (relative, stub) in FILES {
            let path = module_dir.join(TemplateRenderer::render(relative, &bindings));
            let contents = TemplateRenderer::render(&self.stubs.load(stub)?, &bindings);
            write_file(&path, &contents)?;
            files.push(path);

            if stub == Stub::Descriptor {
                descriptor = contents;
            }
        }

        let properties: Properties = serde_json::from_str(&descriptor)?;
        self.registry.register(&slug, properties.clone())?;

        tracing::info!(
            module = %slug,
            path = %module_dir.display(),
            files = files.len(),
            "Module created successfully"
        );

        if let Err(e) = self.hook.optimize(self.registry) {
            tracing::warn!(module = %slug, error = %e, "Post-generation hook failed");
        }

        Ok(ScaffoldReport {
            module: Module::new(slug, properties),
            directories,
            files,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModulesConfig;
    use crate::scaffold::NoopHook;
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::{tempdir, TempDir};

    fn setup() -> (TempDir, Registry) {
        let dir = tempdir().unwrap();
        let registry = Registry::new(ModulesConfig::new(dir.path().join("modules"))).unwrap();
        (dir, registry)
    }

    #[test]
    fn test_generate_creates_tree() {
        let (dir, registry) = setup();
        let report = ScaffoldGenerator::new(&registry).generate("Blog").unwrap();

        let module_dir = dir.path().join("modules/Blog");
        assert_eq!(report.directories[0], module_dir);
        assert_eq!(report.directories.len(), SUBFOLDERS.len() + 1);
        for folder in SUBFOLDERS {
            assert!(module_dir.join(folder).is_dir(), "missing {folder}");
            assert!(module_dir.join(folder).join(".gitkeep").is_file());
        }

        assert!(module_dir.join("database/seeds/blog_database_seeder.rs").is_file());
        assert!(module_dir.join("http/routes.rs").is_file());
        assert!(module_dir.join("providers/blog_service_provider.rs").is_file());
        assert!(module_dir.join("providers/route_service_provider.rs").is_file());
        assert_eq!(report.files.len(), SUBFOLDERS.len() + 5);

        assert_eq!(report.module.slug().as_str(), "blog");
        assert!(registry.exists(report.module.slug()).unwrap());
        assert!(registry.is_enabled(report.module.slug()).unwrap());
    }

    #[test]
    fn test_generated_files_are_rendered() {
        let (dir, registry) = setup();
        ScaffoldGenerator::new(&registry).generate("user_profiles").unwrap();

        let module_dir = dir.path().join("modules/UserProfiles");
        let provider =
            fs::read_to_string(module_dir.join("providers/user_profiles_service_provider.rs")).unwrap();
        assert!(provider.contains("pub struct UserProfilesServiceProvider;"));
        assert!(provider.contains("use crate::modules::user_profiles::providers"));
        assert!(!provider.contains("{{"));

        let descriptor = fs::read_to_string(module_dir.join("module.json")).unwrap();
        assert!(descriptor.contains("\"name\": \"UserProfiles\""));
        assert!(descriptor.contains("\"slug\": \"user_profiles\""));
    }

    #[test]
    fn test_existing_module_is_untouched() {
        let (dir, registry) = setup();
        let generator = ScaffoldGenerator::new(&registry);
        generator.generate("blog").unwrap();

        let routes = dir.path().join("modules/Blog/http/routes.rs");
        fs::write(&routes, "// edited").unwrap();

        let result = generator.generate("blog");
        assert!(matches!(result, Err(RegistryError::AlreadyExists(s)) if s == "blog"));
        assert_eq!(fs::read_to_string(&routes).unwrap(), "// edited");
    }

    #[test]
    fn test_invalid_name_writes_nothing() {
        let (dir, registry) = setup();
        let result = ScaffoldGenerator::new(&registry).generate("my blog");

        assert!(matches!(result, Err(RegistryError::InvalidSlug(_))));
        assert!(!dir.path().join("modules").exists());
    }

    #[test]
    fn test_partial_failure_keeps_created_directories() {
        let (dir, registry) = setup();
        // A directory where a file should go makes that write fail
        fs::create_dir_all(dir.path().join("modules/Blog/http/routes.rs")).unwrap();

        let result = ScaffoldGenerator::new(&registry).generate("blog");

        assert!(matches!(result, Err(RegistryError::Io { ref path, .. }) if path.ends_with("routes.rs")));
        let module_dir = dir.path().join("modules/Blog");
        assert!(module_dir.join("console").is_dir());
        assert!(module_dir.join("resources/views/.gitkeep").is_file());
        assert!(module_dir.join("database/seeds/blog_database_seeder.rs").is_file());
        assert!(!module_dir.join("module.json").exists());
        assert!(!registry.exists(&Slug::parse("blog").unwrap()).unwrap());
    }

    #[test]
    fn test_stub_override_is_used() {
        let dir = tempdir().unwrap();
        let stubs = dir.path().join("stubs");
        fs::create_dir_all(&stubs).unwrap();
        fs::write(stubs.join("routes.stub"), "// routes for {{name}} at /{{slug}}\n").unwrap();

        let config = ModulesConfig::new(dir.path().join("modules")).with_stubs_path(&stubs);
        let registry = Registry::new(config).unwrap();
        ScaffoldGenerator::new(&registry).generate("blog").unwrap();

        let routes = fs::read_to_string(dir.path().join("modules/Blog/http/routes.rs")).unwrap();
        assert_eq!(routes, "// routes for Blog at /blog\n");
    }

    struct CountingHook<'a>(&'a AtomicUsize);

    impl OptimizeHook for CountingHook<'_> {
        fn optimize(&self, _registry: &Registry) -> RegistryResult<()> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Err(RegistryError::Configuration("cache unavailable".into()))
        }
    }

    #[test]
    fn test_hook_failure_is_not_returned() {
        let (_dir, registry) = setup();
        let calls = AtomicUsize::new(0);

        let report = ScaffoldGenerator::new(&registry)
            .with_hook(CountingHook(&calls))
            .generate("blog");

        assert!(report.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_hook_not_run_when_module_exists() {
        let (_dir, registry) = setup();
        ScaffoldGenerator::new(&registry)
            .with_hook(NoopHook)
            .generate("blog")
            .unwrap();

        let calls = AtomicUsize::new(0);
        let result = ScaffoldGenerator::new(&registry)
            .with_hook(CountingHook(&calls))
            .generate("blog");

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
