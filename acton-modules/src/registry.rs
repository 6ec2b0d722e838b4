//! Registry facade
//!
//! [`Registry`] pairs the configured [`ModuleRepository`] with the
//! [`PathResolver`] so callers (generators, CLI commands, middleware) hold one
//! handle for both "where does a module live" and "what do we know about it".

use crate::config::ModulesConfig;
use crate::error::RegistryResult;
use crate::module::{Module, Properties, Slug};
use crate::paths::PathResolver;
use crate::repository::{self, ModuleRepository};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

/// Module registry
///
/// # Examples
///
/// ```rust,no_run
/// use acton_modules::{ModulesConfig, Registry, Slug};
///
/// let registry = Registry::new(ModulesConfig::load()?)?;
/// let blog = Slug::parse("blog")?;
///
/// if registry.exists(&blog)? && registry.is_disabled(&blog)? {
///     registry.enable(&blog)?;
/// }
/// # Ok::<(), acton_modules::RegistryError>(())
/// ```
pub struct Registry {
    config: ModulesConfig,
    paths: PathResolver,
    repository: Box<dyn ModuleRepository>,
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("config", &self.config)
            .field("paths", &self.paths)
            .finish_non_exhaustive()
    }
}

impl Registry {
    /// Create a registry using the backend named by `config.driver`
    ///
    /// # Errors
    ///
    /// Returns a configuration error for the `custom` driver (use
    /// [`Registry::with_repository`]) or a storage error if the backend cannot be
    /// opened.
    pub fn new(config: ModulesConfig) -> RegistryResult<Self> {
        let repository = repository::from_config(&config, None)?;
        Ok(Self::with_repository(config, repository))
    }

    /// Create a registry around an explicit repository
    #[must_use]
    pub fn with_repository(config: ModulesConfig, repository: Box<dyn ModuleRepository>) -> Self {
        let paths = PathResolver::new(&config);
        Self {
            config,
            paths,
            repository,
        }
    }

    /// Configuration the registry was built from
    #[must_use]
    pub const fn config(&self) -> &ModulesConfig {
        &self.config
    }

    /// Path and namespace resolver
    #[must_use]
    pub const fn paths(&self) -> &PathResolver {
        &self.paths
    }

    /// Underlying repository
    #[must_use]
    pub fn repository(&self) -> &dyn ModuleRepository {
        self.repository.as_ref()
    }

    /// Modules root directory
    #[must_use]
    pub fn root_path(&self) -> &Path {
        self.paths.root_path()
    }

    /// Configured base namespace
    #[must_use]
    pub fn namespace_prefix(&self) -> &str {
        self.paths.namespace_prefix()
    }

    /// Namespace of a module
    #[must_use]
    pub fn module_namespace(&self, slug: &Slug) -> String {
        self.paths.module_namespace(slug)
    }

    /// Canonical directory for a module
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the directory is missing and `allow_missing` is
    /// false.
    pub fn resolve_path(&self, slug: &Slug, allow_missing: bool) -> RegistryResult<PathBuf> {
        self.paths.resolve_path(slug, allow_missing)
    }

    /// Whether a module is registered
    ///
    /// # Errors
    ///
    /// Returns a storage error if the repository cannot be read.
    pub fn exists(&self, slug: &Slug) -> RegistryResult<bool> {
        self.repository.exists(slug)
    }

    /// Every known module
    ///
    /// # Errors
    ///
    /// Returns a storage error if the repository cannot be read.
    pub fn all(&self) -> RegistryResult<Vec<Module>> {
        self.repository.all()
    }

    /// Slugs of every known module
    ///
    /// # Errors
    ///
    /// Returns a storage error if the repository cannot be read.
    pub fn slugs(&self) -> RegistryResult<BTreeSet<Slug>> {
        self.repository.slugs()
    }

    /// Modules whose property `key` equals `value`
    ///
    /// # Errors
    ///
    /// Returns a storage error if the repository cannot be read.
    pub fn where_eq(&self, key: &str, value: &Value) -> RegistryResult<Vec<Module>> {
        self.repository.where_eq(key, value)
    }

    /// Modules sorted ascending by `key`
    ///
    /// # Errors
    ///
    /// Returns a storage error if the repository cannot be read.
    pub fn sort_by(&self, key: &str) -> RegistryResult<Vec<Module>> {
        self.repository.sort_by(key)
    }

    /// Modules sorted descending by `key`
    ///
    /// # Errors
    ///
    /// Returns a storage error if the repository cannot be read.
    pub fn sort_by_desc(&self, key: &str) -> RegistryResult<Vec<Module>> {
        self.repository.sort_by_desc(key)
    }

    /// Number of known modules
    ///
    /// # Errors
    ///
    /// Returns a storage error if the repository cannot be read.
    pub fn count(&self) -> RegistryResult<usize> {
        self.repository.count()
    }

    /// Stored properties of a module
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown modules.
    pub fn properties(&self, slug: &Slug) -> RegistryResult<Properties> {
        self.repository.properties(slug)
    }

    /// Look up a property (`"blog::order"` or a global key), or `default`
    ///
    /// # Errors
    ///
    /// Returns an error if the property name is malformed or the repository
    /// cannot be read.
    pub fn property(&self, property: &str, default: Value) -> RegistryResult<Value> {
        self.repository.property_or(property, default)
    }

    /// Persist a property
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for module-scoped writes to unknown modules, or a
    /// storage error.
    pub fn set_property(&self, property: &str, value: Value) -> RegistryResult<()> {
        self.repository.set_property(property, value)
    }

    /// Record a freshly scaffolded module
    ///
    /// # Errors
    ///
    /// Returns a storage error if the write fails.
    pub fn register(&self, slug: &Slug, properties: Properties) -> RegistryResult<()> {
        self.repository.register(slug, properties)
    }

    /// Enabled modules
    ///
    /// # Errors
    ///
    /// Returns a storage error if the repository cannot be read.
    pub fn enabled(&self) -> RegistryResult<Vec<Module>> {
        self.repository.enabled()
    }

    /// Disabled modules
    ///
    /// # Errors
    ///
    /// Returns a storage error if the repository cannot be read.
    pub fn disabled(&self) -> RegistryResult<Vec<Module>> {
        self.repository.disabled()
    }

    /// Whether a module is enabled
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown modules.
    pub fn is_enabled(&self, slug: &Slug) -> RegistryResult<bool> {
        self.repository.is_enabled(slug)
    }

    /// Whether a module is disabled
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown modules.
    pub fn is_disabled(&self, slug: &Slug) -> RegistryResult<bool> {
        self.repository.is_disabled(slug)
    }

    /// Enable a module
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown modules.
    pub fn enable(&self, slug: &Slug) -> RegistryResult<()> {
        self.repository.enable(slug)?;
        tracing::info!(module = %slug, "Module enabled");
        Ok(())
    }

    /// Disable a module
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown modules.
    pub fn disable(&self, slug: &Slug) -> RegistryResult<()> {
        self.repository.disable(slug)?;
        tracing::info!(module = %slug, "Module disabled");
        Ok(())
    }
}
