//! Configuration management for acton-modules
//!
//! Configuration is loaded from multiple sources with clear precedence:
//!
//! 1. Environment variables (highest priority, `ACTON_MODULES_` prefix, `__` for nesting)
//! 2. `./modules.toml` (or an explicit file passed to [`ModulesConfig::load_from`])
//! 3. `~/.config/acton-modules/config.toml` (user config, XDG)
//! 4. `/etc/acton-modules/config.toml` (system config)
//! 5. Hardcoded defaults (fallback)
//!
//! # Example Configuration
//!
//! ```toml
//! # modules.toml
//! path = "./modules"
//! namespace = "crate::modules"
//! driver = "database"
//! stubs_path = "./stubs"
//!
//! [database]
//! url = "sqlite://modules.db"
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use acton_modules::config::ModulesConfig;
//!
//! # fn example() -> acton_modules::RegistryResult<()> {
//! let config = ModulesConfig::load()?;
//! println!("modules live in {}", config.path.display());
//! # Ok(())
//! # }
//! ```

use crate::error::{RegistryError, RegistryResult};
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Storage backend selected at initialisation
///
/// Serialised lower-case; `File` and `FILE` style spellings are accepted too.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepositoryDriver {
    /// One `module.json` descriptor per module directory
    #[default]
    #[serde(alias = "File", alias = "FILE")]
    File,
    /// SQLite tables via sqlx
    #[serde(alias = "Database", alias = "DATABASE")]
    Database,
    /// Repository injected by the host application
    #[serde(alias = "Custom", alias = "CUSTOM")]
    Custom,
}

/// Database backend settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// SQLite connection URL
    pub url: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: "sqlite://modules.db".to_string(),
        }
    }
}

/// Complete acton-modules configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModulesConfig {
    /// Modules root directory
    pub path: PathBuf,

    /// Base namespace generated code lives under
    pub namespace: String,

    /// Repository backend
    pub driver: RepositoryDriver,

    /// Database backend settings (used when `driver = "database"`)
    pub database: DatabaseSettings,

    /// Directory with `*.stub` files overriding the built-in templates
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stubs_path: Option<PathBuf>,
}

impl Default for ModulesConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("modules"),
            namespace: "crate::modules".to_string(),
            driver: RepositoryDriver::File,
            database: DatabaseSettings::default(),
            stubs_path: None,
        }
    }
}

impl ModulesConfig {
    /// Default configuration rooted at `path`
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Override the base namespace
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Override the repository backend
    #[must_use]
    pub const fn with_driver(mut self, driver: RepositoryDriver) -> Self {
        self.driver = driver;
        self
    }

    /// Override the database URL
    #[must_use]
    pub fn with_database_url(mut self, url: impl Into<String>) -> Self {
        self.database.url = url.into();
        self
    }

    /// Override the stub directory
    #[must_use]
    pub fn with_stubs_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.stubs_path = Some(path.into());
        self
    }

    /// Load configuration from the standard locations
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Configuration`] if a configuration file cannot be
    /// parsed or a value has the wrong type (including an unsupported `driver`).
    pub fn load() -> RegistryResult<Self> {
        let mut figment = Self::defaults()?;

        let system_config = PathBuf::from("/etc/acton-modules/config.toml");
        if system_config.exists() {
            figment = figment.merge(Toml::file(&system_config));
        }

        let user_config = Self::recommended_path();
        if user_config.exists() {
            figment = figment.merge(Toml::file(&user_config));
        }

        let local_config = PathBuf::from("./modules.toml");
        if local_config.exists() {
            figment = figment.merge(Toml::file(&local_config));
        }

        Ok(Self::with_env(figment).extract()?)
    }

    /// Load configuration from a specific file
    ///
    /// Defaults fill in missing keys and environment variables still override.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Configuration`] if the file does not exist, is not
    /// valid TOML, or contains invalid values.
    pub fn load_from(path: impl AsRef<Path>) -> RegistryResult<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(RegistryError::Configuration(format!(
                "configuration file not found: {}",
                path.display()
            )));
        }

        let figment = Self::defaults()?.merge(Toml::file(path));
        Ok(Self::with_env(figment).extract()?)
    }

    /// Get the recommended XDG config path
    ///
    /// Returns `~/.config/acton-modules/config.toml` on Linux.
    #[must_use]
    pub fn recommended_path() -> PathBuf {
        dirs::config_dir().map_or_else(
            || PathBuf::from("./modules.toml"),
            |config_dir| config_dir.join("acton-modules").join("config.toml"),
        )
    }

    fn defaults() -> RegistryResult<Figment> {
        let defaults = toml::to_string(&Self::default())
            .map_err(|e| RegistryError::Configuration(e.to_string()))?;
        Ok(Figment::new().merge(Toml::string(&defaults)))
    }

    fn with_env(figment: Figment) -> Figment {
        figment.merge(Env::prefixed("ACTON_MODULES_").split("__").lowercase(true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = ModulesConfig::default();
        assert_eq!(config.path, PathBuf::from("modules"));
        assert_eq!(config.namespace, "crate::modules");
        assert_eq!(config.driver, RepositoryDriver::File);
        assert_eq!(config.database.url, "sqlite://modules.db");
        assert!(config.stubs_path.is_none());
    }

    #[test]
    fn test_builder() {
        let config = ModulesConfig::new("/srv/app/modules")
            .with_namespace("app::modules")
            .with_driver(RepositoryDriver::Database)
            .with_database_url("sqlite::memory:");

        assert_eq!(config.path, PathBuf::from("/srv/app/modules"));
        assert_eq!(config.namespace, "app::modules");
        assert_eq!(config.driver, RepositoryDriver::Database);
        assert_eq!(config.database.url, "sqlite::memory:");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("modules.toml");
        fs::write(
            &file,
            "path = \"./app/modules\"\ndriver = \"database\"\n\n[database]\nurl = \"sqlite://app.db\"\n",
        )
        .unwrap();

        let config = ModulesConfig::load_from(&file).unwrap();
        assert_eq!(config.path, PathBuf::from("./app/modules"));
        assert_eq!(config.driver, RepositoryDriver::Database);
        assert_eq!(config.database.url, "sqlite://app.db");
        // Missing keys fall back to defaults
        assert_eq!(config.namespace, "crate::modules");
    }

    #[test]
    fn test_driver_names_are_case_insensitive() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("modules.toml");

        for (name, expected) in [
            ("File", RepositoryDriver::File),
            ("Database", RepositoryDriver::Database),
            ("Custom", RepositoryDriver::Custom),
            ("DATABASE", RepositoryDriver::Database),
            ("file", RepositoryDriver::File),
        ] {
            fs::write(&file, format!("driver = \"{name}\"\n")).unwrap();
            let config = ModulesConfig::load_from(&file).unwrap();
            assert_eq!(config.driver, expected, "driver = {name:?}");
        }
    }

    #[test]
    fn test_unknown_driver_is_configuration_error() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("modules.toml");
        fs::write(&file, "driver = \"redis\"\n").unwrap();

        let result = ModulesConfig::load_from(&file);
        assert!(matches!(result, Err(RegistryError::Configuration(_))));
    }

    #[test]
    fn test_missing_file_is_configuration_error() {
        let result = ModulesConfig::load_from("/definitely/not/here.toml");
        assert!(matches!(result, Err(RegistryError::Configuration(_))));
    }
}
