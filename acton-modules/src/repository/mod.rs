//! Module repository abstraction and backends
//!
//! [`ModuleRepository`] is the single source of truth for which modules exist
//! and what their properties are. The generators and the registry only ever talk
//! to this trait, so the storage mechanism can vary freely:
//!
//! - [`FileModuleRepository`]: one `module.json` per module directory
//! - [`DatabaseModuleRepository`]: SQLite tables through sqlx
//! - any host-provided implementation (the `custom` driver)
//!
//! The backend is chosen once, at initialisation, by [`from_config`].
//!
//! # Property addressing
//!
//! [`ModuleRepository::property`] and [`ModuleRepository::set_property`] accept
//! either a module-scoped name (`"blog::enabled"`) or a global name
//! (`"default_locale"`). Global properties live in a backend-defined settings
//! store shared by all modules.

mod database;
mod file;

pub use database::DatabaseModuleRepository;
pub use file::FileModuleRepository;

use crate::config::{ModulesConfig, RepositoryDriver};
use crate::error::{RegistryError, RegistryResult};
use crate::module::{enabled_flag, sort_modules, Module, Properties, PropertyKey, Slug, ENABLED_KEY};
use serde_json::Value;
use std::collections::BTreeSet;

/// Storage backend for module metadata
///
/// Only the first six methods touch storage; the rest are derived queries that
/// backends may override with something cheaper.
///
/// # Implementation Requirements
///
/// Implementations must:
/// - Persist `set_property` and `register` before returning
/// - Report unknown slugs as [`RegistryError::NotFound`] from `properties`
/// - Treat a missing `enabled` property as `true`
#[cfg_attr(test, mockall::automock)]
pub trait ModuleRepository: Send + Sync {
    /// Every known module, in backend order
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn all(&self) -> RegistryResult<Vec<Module>>;

    /// Whether a module is registered
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn exists(&self, slug: &Slug) -> RegistryResult<bool>;

    /// Stored properties of a module
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] if the module is not registered.
    fn properties(&self, slug: &Slug) -> RegistryResult<Properties>;

    /// Look up a module-scoped or global property
    ///
    /// Unknown modules and unset keys both yield `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the property name is malformed or the store cannot be
    /// read.
    fn property(&self, property: &str) -> RegistryResult<Option<Value>>;

    /// Persist a module-scoped or global property
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] for module-scoped writes to unknown
    /// modules, or a storage error if the write fails.
    fn set_property(&self, property: &str, value: Value) -> RegistryResult<()>;

    /// Record a freshly scaffolded module
    ///
    /// Registering a module that is already present leaves it untouched.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the write fails.
    fn register(&self, slug: &Slug, properties: Properties) -> RegistryResult<()>;

    /// Slugs of every known module
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn slugs(&self) -> RegistryResult<BTreeSet<Slug>> {
        Ok(self.all()?.into_iter().map(|m| m.slug().clone()).collect())
    }

    /// Modules whose property `key` equals `value`
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn where_eq(&self, key: &str, value: &Value) -> RegistryResult<Vec<Module>> {
        Ok(self
            .all()?
            .into_iter()
            .filter(|m| m.property(key) == Some(value))
            .collect())
    }

    /// Modules sorted ascending by property `key`, missing values last
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn sort_by(&self, key: &str) -> RegistryResult<Vec<Module>> {
        let mut modules = self.all()?;
        sort_modules(&mut modules, key, false);
        Ok(modules)
    }

    /// Modules sorted descending by property `key`, missing values last
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn sort_by_desc(&self, key: &str) -> RegistryResult<Vec<Module>> {
        let mut modules = self.all()?;
        sort_modules(&mut modules, key, true);
        Ok(modules)
    }

    /// Number of known modules
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn count(&self) -> RegistryResult<usize> {
        Ok(self.all()?.len())
    }

    /// Look up a property, falling back to `default`
    ///
    /// # Errors
    ///
    /// See [`ModuleRepository::property`].
    fn property_or(&self, property: &str, default: Value) -> RegistryResult<Value> {
        Ok(self.property(property)?.unwrap_or(default))
    }

    /// Modules whose `enabled` property is not `false`
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn enabled(&self) -> RegistryResult<Vec<Module>> {
        Ok(self.all()?.into_iter().filter(Module::is_enabled).collect())
    }

    /// Modules whose `enabled` property is `false`
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn disabled(&self) -> RegistryResult<Vec<Module>> {
        Ok(self.all()?.into_iter().filter(|m| !m.is_enabled()).collect())
    }

    /// Whether a module is enabled
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] if the module is not registered.
    fn is_enabled(&self, slug: &Slug) -> RegistryResult<bool> {
        Ok(enabled_flag(&self.properties(slug)?))
    }

    /// Whether a module is disabled
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] if the module is not registered.
    fn is_disabled(&self, slug: &Slug) -> RegistryResult<bool> {
        Ok(!self.is_enabled(slug)?)
    }

    /// Enable a module (idempotent)
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] if the module is not registered.
    fn enable(&self, slug: &Slug) -> RegistryResult<()> {
        self.set_property(&PropertyKey::module(slug, ENABLED_KEY), Value::Bool(true))
    }

    /// Disable a module (idempotent)
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] if the module is not registered.
    fn disable(&self, slug: &Slug) -> RegistryResult<()> {
        self.set_property(&PropertyKey::module(slug, ENABLED_KEY), Value::Bool(false))
    }
}

/// Build the repository selected by `config.driver`
///
/// `custom` is only consulted for [`RepositoryDriver::Custom`].
///
/// # Errors
///
/// Returns [`RegistryError::Configuration`] if the custom driver is selected
/// without an injected repository, or a storage error if the database backend
/// cannot be opened.
pub fn from_config(
    config: &ModulesConfig,
    custom: Option<Box<dyn ModuleRepository>>,
) -> RegistryResult<Box<dyn ModuleRepository>> {
    tracing::debug!(driver = ?config.driver, "Initialising module repository");

    match config.driver {
        RepositoryDriver::File => Ok(Box::new(FileModuleRepository::new(config))),
        RepositoryDriver::Database => {
            Ok(Box::new(DatabaseModuleRepository::connect(&config.database.url)?))
        }
        RepositoryDriver::Custom => custom.ok_or_else(|| {
            RegistryError::Configuration(
                "driver \"custom\" requires a repository supplied by the host application"
                    .to_string(),
            )
        }),
    }
}
