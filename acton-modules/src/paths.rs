//! Filesystem paths and namespaces derived from a slug
//!
//! Nothing here is persisted: a module's directory is always
//! `<root>/<DisplayName>` and its namespace is always `<prefix>::<slug>`, so the
//! two can never drift from the slug.

use crate::config::ModulesConfig;
use crate::error::{RegistryError, RegistryResult};
use crate::module::Slug;
use std::path::{Path, PathBuf};

/// Descriptor file name inside every module directory
pub const DESCRIPTOR_FILE: &str = "module.json";

/// Separator between namespace segments
pub const NAMESPACE_SEPARATOR: &str = "::";

/// Derives module directories and namespaces
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathResolver {
    root: PathBuf,
    namespace: String,
}

impl PathResolver {
    /// Create a resolver from configuration
    ///
    /// A relative root is anchored at the current working directory.
    #[must_use]
    pub fn new(config: &ModulesConfig) -> Self {
        let root = std::path::absolute(&config.path).unwrap_or_else(|_| config.path.clone());
        Self {
            root,
            namespace: config.namespace.clone(),
        }
    }

    /// Modules root directory
    #[must_use]
    pub fn root_path(&self) -> &Path {
        &self.root
    }

    /// Configured base namespace
    #[must_use]
    pub fn namespace_prefix(&self) -> &str {
        &self.namespace
    }

    /// Directory for a module, whether or not it exists
    #[must_use]
    pub fn module_dir(&self, slug: &Slug) -> PathBuf {
        self.root.join(slug.name())
    }

    /// Descriptor path for a module
    #[must_use]
    pub fn descriptor_path(&self, slug: &Slug) -> PathBuf {
        self.module_dir(slug).join(DESCRIPTOR_FILE)
    }

    /// Canonical directory for a module
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] if the directory does not exist and
    /// `allow_missing` is false.
    pub fn resolve_path(&self, slug: &Slug, allow_missing: bool) -> RegistryResult<PathBuf> {
        let path = self.module_dir(slug);
        if !allow_missing && !path.is_dir() {
            return Err(RegistryError::NotFound(slug.to_string()));
        }
        Ok(path)
    }

    /// Namespace of a module (`crate::modules::blog`)
    #[must_use]
    pub fn module_namespace(&self, slug: &Slug) -> String {
        format!("{}{NAMESPACE_SEPARATOR}{slug}", self.namespace)
    }

    /// Namespace of an artifact inside a module
    ///
    /// # Examples
    ///
    /// ```
    /// use acton_modules::config::ModulesConfig;
    /// use acton_modules::module::Slug;
    /// use acton_modules::paths::PathResolver;
    ///
    /// let paths = PathResolver::new(&ModulesConfig::new("modules"));
    /// let slug = Slug::parse("blog").unwrap();
    /// assert_eq!(
    ///     paths.artifact_namespace(&slug, &["http", "controllers"]),
    ///     "crate::modules::blog::http::controllers"
    /// );
    /// ```
    #[must_use]
    pub fn artifact_namespace(&self, slug: &Slug, segments: &[&str]) -> String {
        std::iter::once(self.module_namespace(slug))
            .chain(segments.iter().map(ToString::to_string))
            .collect::<Vec<_>>()
            .join(NAMESPACE_SEPARATOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn slug(s: &str) -> Slug {
        Slug::parse(s).unwrap()
    }

    #[test]
    fn test_module_dir_uses_display_name() {
        let paths = PathResolver::new(&ModulesConfig::new("/srv/app/modules"));
        assert_eq!(paths.module_dir(&slug("blog")), PathBuf::from("/srv/app/modules/Blog"));
        assert_eq!(
            paths.descriptor_path(&slug("user_profiles")),
            PathBuf::from("/srv/app/modules/UserProfiles/module.json")
        );
    }

    #[test]
    fn test_relative_root_is_made_absolute() {
        let paths = PathResolver::new(&ModulesConfig::new("modules"));
        assert!(paths.root_path().is_absolute());
        assert!(paths.root_path().ends_with("modules"));
    }

    #[test]
    fn test_resolve_path_missing() {
        let dir = tempdir().unwrap();
        let paths = PathResolver::new(&ModulesConfig::new(dir.path()));

        let result = paths.resolve_path(&slug("blog"), false);
        assert!(matches!(result, Err(RegistryError::NotFound(s)) if s == "blog"));

        let allowed = paths.resolve_path(&slug("blog"), true).unwrap();
        assert_eq!(allowed, dir.path().join("Blog"));
    }

    #[test]
    fn test_resolve_path_existing() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("Blog")).unwrap();
        let paths = PathResolver::new(&ModulesConfig::new(dir.path()));

        assert_eq!(paths.resolve_path(&slug("blog"), false).unwrap(), dir.path().join("Blog"));
    }

    #[test]
    fn test_namespaces() {
        let config = ModulesConfig::new("modules").with_namespace("app::modules");
        let paths = PathResolver::new(&config);
        assert_eq!(paths.namespace_prefix(), "app::modules");
        assert_eq!(paths.module_namespace(&slug("blog")), "app::modules::blog");
        assert_eq!(paths.artifact_namespace(&slug("blog"), &[]), "app::modules::blog");
    }
}
