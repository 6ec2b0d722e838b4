//! Filesystem-backed module repository

use super::ModuleRepository;
use crate::config::ModulesConfig;
use crate::error::{RegistryError, RegistryResult};
use crate::module::{Module, Properties, PropertyKey, Slug};
use crate::naming::Naming;
use crate::paths::{PathResolver, DESCRIPTOR_FILE};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File holding global (non module-scoped) settings, relative to the root
pub const SETTINGS_FILE: &str = "modules.json";

/// Module repository reading `module.json` descriptors from disk
///
/// Each direct subdirectory of the modules root that contains a descriptor is a
/// module. Global properties are kept in `modules.json` at the root.
///
/// # Directory Structure
///
/// ```text
/// modules/
/// ├── modules.json          # global settings
/// ├── Blog/
/// │   └── module.json       # {"slug": "blog", "enabled": true, ...}
/// └── UserProfiles/
///     └── module.json
/// ```
///
/// Listing order is the lexical order of directory names.
#[derive(Debug, Clone)]
pub struct FileModuleRepository {
    paths: PathResolver,
}

impl FileModuleRepository {
    /// Create a repository rooted at `config.path`
    ///
    /// The root does not have to exist yet; an absent root simply holds no
    /// modules.
    #[must_use]
    pub fn new(config: &ModulesConfig) -> Self {
        Self {
            paths: PathResolver::new(config),
        }
    }

    fn settings_path(&self) -> PathBuf {
        self.paths.root_path().join(SETTINGS_FILE)
    }

    /// Slug a descriptor belongs to, if it lives in the right directory
    fn slug_for(dir_name: &str, properties: &Properties) -> Option<Slug> {
        let slug = properties
            .get("slug")
            .and_then(Value::as_str)
            .map_or_else(|| Slug::parse(&Naming::snake(dir_name)), Slug::parse)
            .ok()?;

        (slug.name() == dir_name).then_some(slug)
    }
}

fn read_json(path: &Path) -> RegistryResult<Properties> {
    let contents = fs::read_to_string(path).map_err(|e| RegistryError::io(path, e))?;
    Ok(serde_json::from_str(&contents)?)
}

/// Write through a sibling temp file so readers never see a half-written file
fn write_json(path: &Path, properties: &Properties) -> RegistryResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| RegistryError::io(parent, e))?;
    }

    let mut contents = serde_json::to_string_pretty(properties)?;
    contents.push('\n');

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, contents).map_err(|e| RegistryError::io(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| RegistryError::io(path, e))
}

impl ModuleRepository for FileModuleRepository {
    fn all(&self) -> RegistryResult<Vec<Module>> {
        let root = self.paths.root_path();
        if !root.is_dir() {
            return Ok(Vec::new());
        }

        let mut modules = Vec::new();
        for entry in WalkDir::new(root)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| RegistryError::io(root, e.into()))?;
            if !entry.file_type().is_dir() {
                continue;
            }

            let descriptor = entry.path().join(DESCRIPTOR_FILE);
            if !descriptor.is_file() {
                continue;
            }

            let dir_name = entry.file_name().to_string_lossy();
            let properties = read_json(&descriptor)?;
            match Self::slug_for(&dir_name, &properties) {
                Some(slug) => modules.push(Module::new(slug, properties)),
                None => tracing::warn!(
                    path = %descriptor.display(),
                    "Skipping descriptor whose slug does not match its directory"
                ),
            }
        }

        Ok(modules)
    }

    fn exists(&self, slug: &Slug) -> RegistryResult<bool> {
        Ok(self.paths.descriptor_path(slug).is_file())
    }

    fn properties(&self, slug: &Slug) -> RegistryResult<Properties> {
        let path = self.paths.descriptor_path(slug);
        if !path.is_file() {
            return Err(RegistryError::NotFound(slug.to_string()));
        }
        read_json(&path)
    }

    fn property(&self, property: &str) -> RegistryResult<Option<Value>> {
        match PropertyKey::parse(property)? {
            PropertyKey::Module { slug, key } => {
                if !self.exists(&slug)? {
                    return Ok(None);
                }
                Ok(self.properties(&slug)?.remove(&key))
            }
            PropertyKey::Global(key) => {
                let path = self.settings_path();
                if !path.is_file() {
                    return Ok(None);
                }
                Ok(read_json(&path)?.remove(&key))
            }
        }
    }

    fn set_property(&self, property: &str, value: Value) -> RegistryResult<()> {
        match PropertyKey::parse(property)? {
            PropertyKey::Module { slug, key } => {
                let mut properties = self.properties(&slug)?;
                tracing::debug!(module = %slug, key = %key, value = %value, "Setting module property");
                properties.insert(key, value);
                write_json(&self.paths.descriptor_path(&slug), &properties)
            }
            PropertyKey::Global(key) => {
                let path = self.settings_path();
                let mut settings = if path.is_file() {
                    read_json(&path)?
                } else {
                    Properties::new()
                };
                tracing::debug!(key = %key, value = %value, "Setting global property");
                settings.insert(key, value);
                write_json(&path, &settings)
            }
        }
    }

    fn register(&self, slug: &Slug, properties: Properties) -> RegistryResult<()> {
        let path = self.paths.descriptor_path(slug);
        if path.is_file() {
            return Ok(());
        }
        write_json(&path, &properties)
    }
}
